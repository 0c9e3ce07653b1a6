// Paths
pub const DATA_DIR: &str = "/root/CProGAN-ME/datasets/person";
pub const RESULT_DIR: &str = "results";
pub const CONFIG_FILE_NAME: &str = "config.json";

// Benchmark environment
pub const ENV_GPUS: &str = "BMARK_GPUS";
pub const ENV_KIMG: &str = "BMARK_KIMG";

// Run description
pub const DESC_BASE: &str = "pgan";
pub const DESC_DATASET: &str = "-syn256rgb_conditional";

pub const RANDOM_SEED: u64 = 1000;

// Driver entry points
pub const TRAIN_FUNC: &str = "train.train_progressive_gan";
pub const G_FUNC: &str = "networks.G_paper";
pub const D_FUNC: &str = "networks.D_paper";
pub const G_LOSS_FUNC: &str = "loss.G_wgan_acgan";
pub const D_LOSS_FUNC: &str = "loss.D_wgangp_acgan";

pub const LOD_INITIAL_RESOLUTION: u32 = 32;

// Half precision
pub const FP16_PIXELNORM_EPSILON: f64 = 1e-4;
