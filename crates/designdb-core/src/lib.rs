#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod document_source;
pub mod error;
pub mod tokens;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
