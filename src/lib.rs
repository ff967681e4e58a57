pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod eval;
pub mod filter;
pub mod index;
pub mod labels;
pub mod matcher;
pub mod profile;
pub mod trainer;
pub mod utils;

pub use config::Opts;
pub use error::{Error, Result};
pub use index::{DigestIndex, DigestRecord, DuplicatePolicy};
pub use matcher::{Matcher, PredictionRecord, WorkItem};
