//! Data types for the grid: the dataset and its configuration.

mod config;
mod dataset;

pub use config::*;
pub use dataset::*;
