use burn::prelude::*;

use crate::config::constants::{DATA_DIR, RESULT_DIR};

#[derive(Config, Debug)]
pub struct PathsConfig {
    #[config(default = "DATA_DIR.to_string()")]
    pub data_dir: String,
    #[config(default = "RESULT_DIR.to_string()")]
    pub result_dir: String,
}

/// Options forwarded to the driver's dataset loader.
#[derive(Config, Debug)]
pub struct DatasetConfig {
    /// Directory holding the `.tfrecords` shards, one per level of detail.
    pub tfrecord_dir: String,
}

impl DatasetConfig {
    pub fn from_paths(paths: &PathsConfig) -> Self {
        Self::new(paths.data_dir.clone())
    }
}
