use burn::optim::AdamConfig;
use burn::prelude::*;

use crate::config::constants::{D_LOSS_FUNC, G_LOSS_FUNC};

/// Adam moments shared by both networks' optimizers.
#[derive(Config, Debug)]
pub struct OptimizerConfig {
    #[config(default = 0.0)]
    pub beta1: f64,
    #[config(default = 0.99)]
    pub beta2: f64,
    #[config(default = 1e-8)]
    pub epsilon: f64,
    /// Dynamic loss scaling, needed for half-precision gradients.
    pub use_loss_scaling: Option<bool>,
}

impl OptimizerConfig {
    pub fn to_adam(&self) -> AdamConfig {
        AdamConfig::new()
            .with_beta_1(self.beta1 as f32)
            .with_beta_2(self.beta2 as f32)
            .with_epsilon(self.epsilon as f32)
    }
}

#[derive(Config, Debug)]
pub struct LossConfig {
    pub func: String,
}

impl LossConfig {
    pub fn generator() -> Self {
        Self::new(G_LOSS_FUNC.to_string())
    }

    pub fn discriminator() -> Self {
        Self::new(D_LOSS_FUNC.to_string())
    }
}
