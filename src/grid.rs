use burn::prelude::*;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::utils::tile_images;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridSize {
    #[default]
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "4k")]
    Uhd4k,
}

impl GridSize {
    /// Target canvas in pixels and the minimum columns and rows.
    fn bounds(self) -> (usize, usize, usize, usize) {
        match self {
            GridSize::FullHd => (1920, 1080, 3, 2),
            GridSize::Uhd4k => (3840, 2160, 7, 4),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridLayout {
    #[default]
    Random,
    RowPerClass,
    ColPerClass,
}

const MAX_GRID_DIM: usize = 32;

/// Options for the snapshot image grid the driver writes at each tick.
#[derive(Config, Debug)]
pub struct GridConfig {
    #[config(default = "GridSize::FullHd")]
    pub size: GridSize,
    #[config(default = "GridLayout::Random")]
    pub layout: GridLayout,
}

impl GridConfig {
    /// Columns and rows of the grid for images of the given size.
    pub fn shape(&self, image_width: usize, image_height: usize) -> (usize, usize) {
        let (canvas_w, canvas_h, min_w, min_h) = self.size.bounds();
        let gw = (canvas_w / image_width.max(1)).clamp(min_w, MAX_GRID_DIM);
        let gh = (canvas_h / image_height.max(1)).clamp(min_h, MAX_GRID_DIM);
        (gw, gh)
    }

    /// Tiles snapshot images into a single grid image.
    pub fn compose(
        &self,
        images: &[Vec<f32>],
        width: usize,
        height: usize,
    ) -> Result<DynamicImage, ConfigError> {
        let (gw, gh) = self.shape(width, height);
        tile_images(images, height, width, gw, gh)
    }
}
