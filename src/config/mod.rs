//! Typed run configuration for the progressive GAN training driver.
//!
//! A [`RunConfig`] is assembled in a fixed order: base option groups, the
//! dataset step, a [`GpuPreset`], a [`Precision`], then any number of
//! [`SpecialMode`]s. Every step appends its tag to `desc`, which names the
//! result directory of the run.

pub mod constants;
pub mod dataset;
pub mod env;
pub mod network;
pub mod optimizer;
pub mod preset;
pub mod schedule;
pub mod session;
pub mod train;

use std::path::{Path, PathBuf};

use burn::prelude::*;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::grid::GridConfig;

pub use dataset::{DatasetConfig, PathsConfig};
pub use env::BenchEnv;
pub use network::{Dtype, NetworkConfig};
pub use optimizer::{LossConfig, OptimizerConfig};
pub use preset::{GpuPreset, Precision, Resume, SpecialMode};
pub use schedule::{ResolutionMap, ScheduleConfig, TrainingPhase};
pub use session::SessionConfig;
pub use train::TrainConfig;

use constants::{
    CONFIG_FILE_NAME, DESC_BASE, DESC_DATASET, LOD_INITIAL_RESOLUTION, RANDOM_SEED,
};

#[derive(Config, Debug)]
pub struct RunConfig {
    /// Included in the result directory name.
    pub desc: String,
    #[config(default = "RANDOM_SEED")]
    pub random_seed: u64,
    pub num_gpus: usize,
    pub paths: PathsConfig,
    pub session: SessionConfig,
    pub dataset: DatasetConfig,
    pub train: TrainConfig,
    pub g: NetworkConfig,
    pub d: NetworkConfig,
    pub g_opt: OptimizerConfig,
    pub d_opt: OptimizerConfig,
    pub g_loss: LossConfig,
    pub d_loss: LossConfig,
    pub sched: ScheduleConfig,
    pub grid: GridConfig,
}

impl RunConfig {
    pub fn assemble(preset: GpuPreset, total_kimg: u64, precision: Precision) -> Self {
        let paths = PathsConfig::new();
        let dataset = DatasetConfig::from_paths(&paths);

        let mut config = Self::new(
            format!("{DESC_BASE}{DESC_DATASET}"),
            preset.num_gpus(),
            paths,
            SessionConfig::new(),
            dataset,
            TrainConfig::new(total_kimg),
            NetworkConfig::generator(),
            NetworkConfig::discriminator(),
            OptimizerConfig::new(),
            OptimizerConfig::new(),
            LossConfig::generator(),
            LossConfig::discriminator(),
            ScheduleConfig::new().with_lod_initial_resolution(LOD_INITIAL_RESOLUTION),
            GridConfig::new(),
        );
        debug!(tfrecord_dir = %config.dataset.tfrecord_dir, "applied dataset");

        preset.apply(&mut config, total_kimg);
        precision.apply(&mut config);

        info!(desc = %config.desc, num_gpus = config.num_gpus, total_kimg, "assembled run config");
        config
    }

    /// The benchmark run: the preset picked by `BMARK_GPUS`, full precision.
    pub fn benchmark(env: &BenchEnv) -> Self {
        let preset = env
            .gpus
            .map_or(GpuPreset::EightGpus, GpuPreset::for_gpu_count);
        Self::assemble(preset, env.total_kimg, Precision::Fp32)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let env = BenchEnv::from_env()?;
        Ok(Self::benchmark(&env))
    }

    pub fn apply_mode(mut self, mode: SpecialMode) -> Self {
        mode.apply(&mut self);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_gpus == 0 {
            return Err(ConfigError::invalid("num_gpus", "must be at least 1"));
        }
        if self.train.total_kimg == 0 {
            return Err(ConfigError::invalid("train.total_kimg", "must be positive"));
        }

        let sched = &self.sched;
        if !sched.lod_initial_resolution.is_power_of_two() {
            return Err(ConfigError::invalid(
                "sched.lod_initial_resolution",
                format!("{} is not a power of two", sched.lod_initial_resolution),
            ));
        }
        if sched.minibatch_base == 0 {
            return Err(ConfigError::invalid("sched.minibatch_base", "must be positive"));
        }
        for (name, map) in [
            ("sched.minibatch_dict", &sched.minibatch_dict),
            ("sched.max_minibatch_per_gpu", &sched.max_minibatch_per_gpu),
        ] {
            if let Some((res, _)) = map.iter().find(|&(_, &value)| value == 0) {
                return Err(ConfigError::invalid(format!("{name}[{res}]"), "must be positive"));
            }
        }

        for (name, kimg) in [
            ("sched.lod_training_kimg", sched.lod_training_kimg),
            ("sched.lod_transition_kimg", sched.lod_transition_kimg),
        ] {
            if !(kimg.is_finite() && kimg >= 0.0) {
                return Err(ConfigError::invalid(name, format!("{kimg} is not a non-negative kimg count")));
            }
        }
        let ticks = std::iter::once(("sched.tick_kimg_base".to_string(), sched.tick_kimg_base)).chain(
            sched
                .tick_kimg_dict
                .iter()
                .map(|(res, &kimg)| (format!("sched.tick_kimg_dict[{res}]"), kimg)),
        );
        for (name, kimg) in ticks {
            if !(kimg.is_finite() && kimg > 0.0) {
                return Err(ConfigError::invalid(name, format!("{kimg} is not a positive tick length")));
            }
        }

        let rates = [
            ("sched.g_lrate_base", sched.g_lrate_base),
            ("sched.d_lrate_base", sched.d_lrate_base),
        ]
        .into_iter()
        .map(|(name, rate)| (name.to_string(), rate))
        .chain(
            sched
                .g_lrate_dict
                .iter()
                .map(|(res, &rate)| (format!("sched.g_lrate_dict[{res}]"), rate)),
        )
        .chain(
            sched
                .d_lrate_dict
                .iter()
                .map(|(res, &rate)| (format!("sched.d_lrate_dict[{res}]"), rate)),
        );
        for (name, rate) in rates {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigError::invalid(name, format!("{rate} is not a positive learning rate")));
            }
        }

        Ok(())
    }

    pub fn run_dir(&self) -> PathBuf {
        Path::new(&self.paths.result_dir).join(&self.desc)
    }

    /// Writes `config.json` into [`run_dir`](Self::run_dir), creating it first.
    pub fn save_to_run_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = self.run_dir();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(CONFIG_FILE_NAME);
        self.save(&path)?;
        info!(path = %path.display(), "saved run config");
        Ok(path)
    }

    /// Phase of the schedule after `cur_nimg` images on a dataset of
    /// resolution `2^resolution_log2`.
    pub fn phase_at(&self, cur_nimg: u64, resolution_log2: u32) -> Result<TrainingPhase, ConfigError> {
        self.sched.evaluate(cur_nimg, resolution_log2, self.num_gpus)
    }
}
