#![deny(warnings, dead_code, unused_variables, unused_imports)]

pub mod color;
pub mod consistency;
pub mod derive;
pub mod foundation;
pub mod merge;
pub mod orchestrator;

pub use consistency::ConsistencyEngine;
pub use foundation::{DocumentRef, Foundation, References};
pub use merge::{merge, Merged, Provenance};
pub use orchestrator::{HybridOrchestrator, Recommendation};
