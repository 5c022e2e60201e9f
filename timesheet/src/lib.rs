mod error;
mod ingest;

pub mod domain;

pub use error::*;
pub use ingest::*;
