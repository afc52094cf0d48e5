pub mod builtin;
pub mod repository;

pub use builtin::builtin_patterns;
pub use repository::PatternRepository;
