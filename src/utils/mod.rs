use image::{DynamicImage, ImageBuffer, Rgb, RgbImage, imageops};

use crate::error::ConfigError;

pub const CHANNELS: usize = 3;

/// Converts interleaved RGB floats in the network range `[-1, 1]` into an image.
pub fn float_vec_to_image(data: &[f32], height: usize, width: usize) -> Result<RgbImage, ConfigError> {
    let expected = width * height * CHANNELS;
    if data.len() != expected {
        return Err(ConfigError::ImageSize {
            expected,
            got: data.len(),
        });
    }

    let raw_pixels: Vec<u8> = data
        .iter()
        .map(|&val| {
            // (val + 1.0) * 127.5 maps [-1, 1] back onto [0, 255]
            let denormalized = (val + 1.0) * 127.5;
            denormalized.clamp(0.0, 255.0) as u8
        })
        .collect();

    ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(width as u32, height as u32, raw_pixels).ok_or(
        ConfigError::ImageSize {
            expected,
            got: data.len(),
        },
    )
}

/// Tiles `cols * rows` equally sized images row-major into one image.
pub fn tile_images(
    images: &[Vec<f32>],
    height: usize,
    width: usize,
    cols: usize,
    rows: usize,
) -> Result<DynamicImage, ConfigError> {
    let needed = cols * rows;
    if images.len() < needed {
        return Err(ConfigError::GridUnderfilled {
            needed,
            got: images.len(),
        });
    }

    let mut canvas = RgbImage::new((cols * width) as u32, (rows * height) as u32);
    for (idx, data) in images.iter().take(needed).enumerate() {
        let tile = float_vec_to_image(data, height, width)?;
        let x = (idx % cols) * width;
        let y = (idx / cols) * height;
        imageops::replace(&mut canvas, &tile, x as i64, y as i64);
    }

    Ok(DynamicImage::ImageRgb8(canvas))
}
