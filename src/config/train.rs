use burn::prelude::*;

use crate::config::constants::TRAIN_FUNC;

/// Options for the driver's main training function.
#[derive(Config, Debug)]
pub struct TrainConfig {
    #[config(default = "TRAIN_FUNC.to_string()")]
    pub func: String,

    /// Total training length in thousands of images.
    pub total_kimg: u64,

    #[config(default = false)]
    pub mirror_augment: bool,

    /// Dynamic range used when feeding images to the networks.
    #[config(default = "[-1.0, 1.0]")]
    pub drange_net: [f64; 2],

    #[config(default = 1)]
    pub image_snapshot_ticks: u32,

    #[config(default = 10)]
    pub network_snapshot_ticks: u32,

    #[config(default = false)]
    pub save_graph: bool,

    #[config(default = false)]
    pub save_weight_histograms: bool,

    pub resume_run_id: Option<u32>,

    #[config(default = 0.0)]
    pub resume_kimg: f64,

    #[config(default = 1)]
    pub d_repeats: u32,

    #[config(default = 4)]
    pub minibatch_repeats: u32,

    /// Decay of the generator weight moving average.
    #[config(default = 0.999)]
    pub g_smoothing: f64,
}
