use crate::{
    error::{Error, Result},
    SAMPLE_HEIGHT, SAMPLE_WIDTH,
};
use image::{imageops::FilterType, RgbImage};
use std::path::Path;

/// Decode the image at `path` and turn it into a sample set of [`SAMPLE_WIDTH`] × [`SAMPLE_HEIGHT`] pixels.
///
/// The image is stretched to the sample dimensions regardless of its aspect ratio, so every image yields the same
/// number of samples.
pub fn load_samples<P>(path: P) -> Result<Vec<(u8, u8, u8)>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let resized = resize(&image.to_rgb8(), (SAMPLE_WIDTH, SAMPLE_HEIGHT));
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "loaded image"
    );

    Ok(samples_of(&resized))
}

/// Convert raw numeric channel triples into pixels, rejecting values that are not valid 8-bit channels.
///
/// Values inside `0..=255` are rounded to the nearest integer. NaN, infinities and anything out of range fail with
/// [`Error::NonFiniteInput`] carrying the index of the offending sample.
pub fn pixels_from_channels<T>(channels: &[[T; 3]]) -> Result<Vec<(u8, u8, u8)>>
where
    T: Copy + Into<f64>,
{
    channels
        .iter()
        .enumerate()
        .map(|(index, &[r, g, b])| -> Result<(u8, u8, u8)> {
            let channel = |value: T| {
                let value: f64 = value.into();

                if value.is_finite() && (0.0..=255.0).contains(&value) {
                    Ok(value.round() as u8)
                } else {
                    Err(Error::NonFiniteInput { index, value })
                }
            };

            Ok((channel(r)?, channel(g)?, channel(b)?))
        })
        .collect()
}

pub(crate) fn resize(image: &RgbImage, (width, height): (u32, u32)) -> RgbImage {
    if image.dimensions() == (width, height) {
        image.clone()
    } else {
        image::imageops::resize(image, width, height, FilterType::Triangle)
    }
}

pub(crate) fn samples_of(image: &RgbImage) -> Vec<(u8, u8, u8)> {
    image.pixels().map(|pixel| (pixel.0[0], pixel.0[1], pixel.0[2])).collect()
}
