pub mod config;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod series;

pub use error::{FrostsightError, Result};
