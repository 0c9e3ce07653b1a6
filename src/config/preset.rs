use tracing::debug;

use crate::config::RunConfig;
use crate::config::constants::FP16_PIXELNORM_EPSILON;
use crate::config::network::Dtype;
use crate::config::schedule::ResolutionMap;

/// Hardware preset, selected by the number of GPUs in the benchmark run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GpuPreset {
    OneGpu,
    TwoGpus,
    FourGpus,
    EightGpus,
}

impl GpuPreset {
    /// Counts without a dedicated preset fall back to the 8-GPU one.
    pub fn for_gpu_count(gpus: i64) -> Self {
        match gpus {
            1 => GpuPreset::OneGpu,
            2 => GpuPreset::TwoGpus,
            4 => GpuPreset::FourGpus,
            _ => GpuPreset::EightGpus,
        }
    }

    pub fn num_gpus(self) -> usize {
        match self {
            GpuPreset::OneGpu => 1,
            GpuPreset::TwoGpus => 2,
            GpuPreset::FourGpus => 4,
            GpuPreset::EightGpus => 8,
        }
    }

    pub fn desc_suffix(self) -> &'static str {
        match self {
            GpuPreset::OneGpu => "-preset-v2-1gpu",
            GpuPreset::TwoGpus => "-preset-v2-2gpus",
            GpuPreset::FourGpus => "-preset-v2-4gpus",
            GpuPreset::EightGpus => "-preset-v2-8gpus",
        }
    }

    pub fn minibatch_base(self) -> usize {
        match self {
            GpuPreset::OneGpu => 4,
            GpuPreset::TwoGpus | GpuPreset::FourGpus => 16,
            GpuPreset::EightGpus => 32,
        }
    }

    pub fn minibatch_dict(self) -> ResolutionMap<usize> {
        let entries: &[(u32, usize)] = match self {
            GpuPreset::OneGpu => &[
                (4, 64),
                (8, 64),
                (16, 64),
                (32, 32),
                (64, 16),
                (128, 8),
                (256, 4),
                (512, 2),
            ],
            GpuPreset::TwoGpus => &[
                (4, 256),
                (8, 256),
                (16, 128),
                (32, 64),
                (64, 32),
                (128, 16),
                (256, 8),
            ],
            GpuPreset::FourGpus => &[(4, 512), (8, 256), (16, 128), (32, 64), (64, 32), (128, 16)],
            GpuPreset::EightGpus => &[(4, 512), (8, 256), (16, 128), (32, 64), (64, 32)],
        };
        entries.iter().copied().collect()
    }

    pub fn lrate_dict(self) -> ResolutionMap<f64> {
        let entries: &[(u32, f64)] = match self {
            GpuPreset::OneGpu => &[(1024, 0.0015)],
            GpuPreset::TwoGpus => &[(512, 0.0015), (1024, 0.002)],
            GpuPreset::FourGpus => &[(256, 0.0015), (512, 0.002), (1024, 0.003)],
            GpuPreset::EightGpus => &[(128, 0.0015), (256, 0.002), (512, 0.003), (1024, 0.003)],
        };
        entries.iter().copied().collect()
    }

    /// `(lod_training_kimg, lod_transition_kimg)` overrides, if any.
    pub fn lod_kimg(self) -> Option<(f64, f64)> {
        match self {
            GpuPreset::TwoGpus | GpuPreset::FourGpus => Some((300.0, 1500.0)),
            GpuPreset::OneGpu | GpuPreset::EightGpus => None,
        }
    }

    pub fn mbstd_group_size(self) -> Option<usize> {
        match self {
            GpuPreset::TwoGpus => Some(16),
            _ => None,
        }
    }

    pub(crate) fn apply(self, config: &mut RunConfig, total_kimg: u64) {
        config.desc.push_str(self.desc_suffix());
        config.num_gpus = self.num_gpus();

        if let Some(group_size) = self.mbstd_group_size() {
            config.d.mbstd_group_size = Some(group_size);
        }

        let sched = &mut config.sched;
        sched.minibatch_base = self.minibatch_base();
        sched.minibatch_dict = self.minibatch_dict();
        sched.g_lrate_dict = self.lrate_dict();
        sched.d_lrate_dict = sched.g_lrate_dict.clone();
        if let Some((training, transition)) = self.lod_kimg() {
            sched.lod_training_kimg = training;
            sched.lod_transition_kimg = transition;
        }

        config.train.total_kimg = total_kimg;
        debug!(preset = ?self, num_gpus = config.num_gpus, total_kimg, "applied gpu preset");
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precision {
    #[default]
    Fp32,
    Fp16,
}

impl Precision {
    pub fn desc_suffix(self) -> &'static str {
        match self {
            Precision::Fp32 => "-fp32",
            Precision::Fp16 => "-fp16",
        }
    }

    pub(crate) fn apply(self, config: &mut RunConfig) {
        config.desc.push_str(self.desc_suffix());
        match self {
            Precision::Fp32 => {
                config.sched.max_minibatch_per_gpu =
                    ResolutionMap::from([(256, 8), (512, 4), (1024, 2)]);
            }
            Precision::Fp16 => {
                config.g.dtype = Dtype::Float16;
                config.d.dtype = Dtype::Float16;
                config.g.pixelnorm_epsilon = Some(FP16_PIXELNORM_EPSILON);
                config.g_opt.use_loss_scaling = Some(true);
                config.d_opt.use_loss_scaling = Some(true);
                config.sched.max_minibatch_per_gpu = ResolutionMap::new();
            }
        }
        debug!(precision = ?self, "applied precision");
    }
}

/// Resume point of an earlier run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resume {
    pub run_id: u32,
    pub kimg: f64,
}

/// Diagnostic modes layered on top of a preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpecialMode {
    /// Ticks every kimg with custom snapshot intervals.
    Verbose {
        image_snapshot_ticks: u32,
        network_snapshot_ticks: u32,
        resume: Option<Resume>,
    },
    /// Dump the training graph.
    Graph,
    /// Record weight histograms.
    Histograms,
}

impl SpecialMode {
    pub fn verbose_resume() -> Self {
        SpecialMode::Verbose {
            image_snapshot_ticks: 10,
            network_snapshot_ticks: 140,
            resume: Some(Resume {
                run_id: 15,
                kimg: 6163.0,
            }),
        }
    }

    pub fn verbose_fresh() -> Self {
        SpecialMode::Verbose {
            image_snapshot_ticks: 1,
            network_snapshot_ticks: 100,
            resume: None,
        }
    }

    pub fn desc_suffix(&self) -> &'static str {
        match self {
            SpecialMode::Verbose { .. } => "-VERBOSE",
            SpecialMode::Graph => "-GRAPH",
            SpecialMode::Histograms => "-HIST",
        }
    }

    pub(crate) fn apply(&self, config: &mut RunConfig) {
        config.desc.push_str(self.desc_suffix());
        match *self {
            SpecialMode::Verbose {
                image_snapshot_ticks,
                network_snapshot_ticks,
                resume,
            } => {
                config.sched.tick_kimg_base = 1.0;
                config.sched.tick_kimg_dict = ResolutionMap::new();
                config.train.image_snapshot_ticks = image_snapshot_ticks;
                config.train.network_snapshot_ticks = network_snapshot_ticks;
                if let Some(resume) = resume {
                    config.train.resume_run_id = Some(resume.run_id);
                    config.train.resume_kimg = resume.kimg;
                }
            }
            SpecialMode::Graph => config.train.save_graph = true,
            SpecialMode::Histograms => config.train.save_weight_histograms = true,
        }
        debug!(mode = ?self, "applied special mode");
    }
}
