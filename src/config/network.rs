use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::constants::{D_FUNC, G_FUNC};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    #[default]
    Float32,
    Float16,
}

/// Options for one of the two networks. Unset optional fields leave the
/// driver's own default in place.
#[derive(Config, Debug)]
pub struct NetworkConfig {
    /// Network builder entry point in the driver.
    pub func: String,
    #[config(default = "Dtype::Float32")]
    pub dtype: Dtype,
    pub pixelnorm_epsilon: Option<f64>,
    /// Minibatch standard-deviation group size (discriminator only).
    pub mbstd_group_size: Option<usize>,
}

impl NetworkConfig {
    pub fn generator() -> Self {
        Self::new(G_FUNC.to_string())
    }

    pub fn discriminator() -> Self {
        Self::new(D_FUNC.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_networks_leave_overrides_unset() {
        let g = NetworkConfig::generator();
        let d = NetworkConfig::discriminator();

        assert_eq!(g.func, "networks.G_paper");
        assert_eq!(d.func, "networks.D_paper");
        assert_eq!(g.dtype, Dtype::Float32);
        assert_eq!(g.pixelnorm_epsilon, None);
        assert_eq!(d.mbstd_group_size, None);
    }
}
