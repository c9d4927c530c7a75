mod config;
mod error;
mod plan;

pub use config::*;
pub use error::InitError;
pub use plan::{Plan, Step, bootstrap};
