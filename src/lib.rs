pub mod config;
pub mod error;
pub mod grid;
pub mod logging;
pub mod utils;

pub use config::{BenchEnv, GpuPreset, Precision, RunConfig, SpecialMode};
pub use error::ConfigError;
