pub mod cli;
pub mod error;
pub mod gpu;
pub mod k8s;

pub use error::{Result, TaggerError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
