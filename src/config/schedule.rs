use std::collections::BTreeMap;

use burn::prelude::*;

use crate::error::ConfigError;

/// Resolution-keyed lookup table. Keys are output resolutions (4, 8, ... 1024).
pub type ResolutionMap<V> = BTreeMap<u32, V>;

/// Options for the driver's progressive training schedule.
#[derive(Config, Debug)]
pub struct ScheduleConfig {
    /// Resolution trained first.
    #[config(default = 4)]
    pub lod_initial_resolution: u32,
    /// Thousands of images to show at a stable resolution.
    #[config(default = 600.0)]
    pub lod_training_kimg: f64,
    /// Thousands of images spent fading in the next resolution.
    #[config(default = 600.0)]
    pub lod_transition_kimg: f64,
    #[config(default = 16)]
    pub minibatch_base: usize,
    #[config(default = "ResolutionMap::new()")]
    pub minibatch_dict: ResolutionMap<usize>,
    #[config(default = "ResolutionMap::new()")]
    pub max_minibatch_per_gpu: ResolutionMap<usize>,
    #[config(default = 0.001)]
    pub g_lrate_base: f64,
    #[config(default = "ResolutionMap::new()")]
    pub g_lrate_dict: ResolutionMap<f64>,
    #[config(default = 0.001)]
    pub d_lrate_base: f64,
    #[config(default = "ResolutionMap::new()")]
    pub d_lrate_dict: ResolutionMap<f64>,
    /// Progress report interval, in kimg.
    #[config(default = 160.0)]
    pub tick_kimg_base: f64,
    #[config(default = "default_tick_kimg_dict()")]
    pub tick_kimg_dict: ResolutionMap<f64>,
}

pub fn default_tick_kimg_dict() -> ResolutionMap<f64> {
    ResolutionMap::from([
        (4, 160.0),
        (8, 140.0),
        (16, 120.0),
        (32, 100.0),
        (64, 80.0),
        (128, 60.0),
        (256, 40.0),
        (512, 20.0),
        (1024, 10.0),
    ])
}

/// The schedule resolved at one point of training.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingPhase {
    pub kimg: f64,
    pub lod: f64,
    pub resolution: u32,
    pub minibatch: usize,
    pub g_lrate: f64,
    pub d_lrate: f64,
    pub tick_kimg: f64,
}

impl ScheduleConfig {
    /// Resolves the schedule after `cur_nimg` training images for a dataset
    /// whose full resolution is `2^resolution_log2`.
    ///
    /// `num_gpus` must be non-zero and `lod_initial_resolution` positive;
    /// [`RunConfig::validate`](crate::config::RunConfig::validate) checks both.
    /// Fails when `2^resolution_log2` does not fit in a `u32`.
    pub fn evaluate(
        &self,
        cur_nimg: u64,
        resolution_log2: u32,
        num_gpus: usize,
    ) -> Result<TrainingPhase, ConfigError> {
        if resolution_log2 >= u32::BITS {
            return Err(ConfigError::invalid(
                "resolution_log2",
                format!("2^{resolution_log2} does not fit in a u32 resolution"),
            ));
        }

        let kimg = cur_nimg as f64 / 1000.0;
        let phase_dur = self.lod_training_kimg + self.lod_transition_kimg;
        let phase_idx = if phase_dur > 0.0 {
            (kimg / phase_dur).floor()
        } else {
            0.0
        };
        let phase_kimg = kimg - phase_idx * phase_dur;

        let mut lod = resolution_log2 as f64
            - self.lod_initial_resolution.max(1).ilog2() as f64
            - phase_idx;
        if self.lod_transition_kimg > 0.0 {
            lod -= (phase_kimg - self.lod_training_kimg).max(0.0) / self.lod_transition_kimg;
        }
        let lod = lod.max(0.0);

        let resolution = 1u32 << resolution_log2.saturating_sub(lod.floor() as u32);

        let num_gpus = num_gpus.max(1);
        let mut minibatch = self
            .minibatch_dict
            .get(&resolution)
            .copied()
            .unwrap_or(self.minibatch_base);
        minibatch -= minibatch % num_gpus;
        if let Some(per_gpu) = self.max_minibatch_per_gpu.get(&resolution) {
            minibatch = minibatch.min(per_gpu.saturating_mul(num_gpus));
        }

        Ok(TrainingPhase {
            kimg,
            lod,
            resolution,
            minibatch,
            g_lrate: lookup(&self.g_lrate_dict, resolution, self.g_lrate_base),
            d_lrate: lookup(&self.d_lrate_dict, resolution, self.d_lrate_base),
            tick_kimg: lookup(&self.tick_kimg_dict, resolution, self.tick_kimg_base),
        })
    }
}

fn lookup(map: &ResolutionMap<f64>, resolution: u32, base: f64) -> f64 {
    map.get(&resolution).copied().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> ScheduleConfig {
        ScheduleConfig::new()
            .with_lod_initial_resolution(32)
            .with_minibatch_base(4)
            .with_minibatch_dict(ResolutionMap::from([(32, 32), (64, 16), (128, 8), (256, 4)]))
            .with_g_lrate_dict(ResolutionMap::from([(256, 0.0015)]))
            .with_max_minibatch_per_gpu(ResolutionMap::from([(256, 8)]))
    }

    #[test]
    fn starts_at_initial_resolution() {
        let phase = schedule().evaluate(0, 8, 1).unwrap();

        assert_eq!(phase.resolution, 32);
        assert_eq!(phase.lod, 3.0);
        assert_eq!(phase.minibatch, 32);
        assert_eq!(phase.g_lrate, 0.001);
        assert_eq!(phase.tick_kimg, 100.0);
    }

    #[test]
    fn transition_fades_lod_linearly() {
        // halfway through the first transition window
        let phase = schedule().evaluate(900_000, 8, 1).unwrap();

        assert_eq!(phase.kimg, 900.0);
        assert!((phase.lod - 2.5).abs() < 1e-9);
        assert_eq!(phase.resolution, 64);
        assert_eq!(phase.minibatch, 16);
    }

    #[test]
    fn stable_phase_holds_resolution() {
        // second phase, still in its training window
        let phase = schedule().evaluate(1_300_000, 8, 1).unwrap();

        assert_eq!(phase.lod, 2.0);
        assert_eq!(phase.resolution, 64);
    }

    #[test]
    fn lod_clamps_at_full_resolution() {
        let phase = schedule().evaluate(50_000_000, 8, 1).unwrap();

        assert_eq!(phase.lod, 0.0);
        assert_eq!(phase.resolution, 256);
        assert_eq!(phase.g_lrate, 0.0015);
        assert_eq!(phase.d_lrate, 0.001);
        assert_eq!(phase.tick_kimg, 40.0);
    }

    #[test]
    fn minibatch_divides_across_gpus_and_respects_cap() {
        let sched = schedule().with_minibatch_dict(ResolutionMap::from([(32, 30), (256, 64)]));

        assert_eq!(sched.evaluate(0, 8, 4).unwrap().minibatch, 28);
        // 64 capped at 8 per gpu
        assert_eq!(sched.evaluate(50_000_000, 8, 2).unwrap().minibatch, 16);
    }

    #[test]
    fn zero_length_phases_never_grow() {
        let sched = schedule()
            .with_lod_training_kimg(0.0)
            .with_lod_transition_kimg(0.0);
        let phase = sched.evaluate(10_000, 8, 1).unwrap();

        assert_eq!(phase.lod, 3.0);
        assert_eq!(phase.resolution, 32);
    }

    #[test]
    fn largest_representable_resolution() {
        let sched = ScheduleConfig::new();

        let phase = sched.evaluate(u64::MAX, 31, 1).unwrap();
        assert_eq!(phase.lod, 0.0);
        assert_eq!(phase.resolution, 1 << 31);

        for log2 in [32, 40, u32::MAX] {
            let err = sched.evaluate(u64::MAX, log2, 1).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "resolution_log2"));
        }
    }

    #[test]
    fn per_gpu_cap_saturates() {
        let sched = ScheduleConfig::new()
            .with_minibatch_base(64)
            .with_max_minibatch_per_gpu(ResolutionMap::from([(4, usize::MAX)]));

        assert_eq!(sched.evaluate(0, 2, 8).unwrap().minibatch, 64);
    }
}
