// Copyright 2022 Spanfile
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A library to extract a palette of the most prevalent colors from an image.
//!
//! The pixels of the image are clustered in RGB space with k-means. Every cluster becomes a [`Swatch`] holding the
//! mean color of the cluster and the number of pixels in it, and the swatches are ranked from the most to the least
//! populated.
//!
//! Clustering is seeded with k-means++ from a fixed seed, so the same pixels and color count always produce the same
//! palette.
//!
//! ```
//! let pixels = [(255, 0, 0), (255, 0, 0), (0, 0, 255), (0, 0, 255), (250, 5, 5)];
//! let swatches = prevalent::extract(&pixels, 2)?;
//!
//! assert_eq!(swatches[0].rgb(), (253, 2, 2));
//! assert_eq!(swatches[0].population(), 3);
//! assert_eq!(swatches[1].hex(), "#0000ff");
//! # Ok::<(), prevalent::Error>(())
//! ```

mod error;
mod hex;
mod kmeans;
mod sampling;
mod swatch;

pub const DEFAULT_COLOR_COUNT: usize = 5;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
pub const SAMPLE_WIDTH: u32 = 600;
pub const SAMPLE_HEIGHT: u32 = 400;

pub use crate::{
    error::{Error, Result},
    hex::to_hex,
    sampling::{load_samples, pixels_from_channels},
    swatch::Swatch,
};
pub use image;

use image::{ImageBuffer, RgbImage};
use kmeans::KMeansQuantizer;
use std::path::Path;

/// Extract `k` colors from `pixels` with the default seed and iteration cap.
///
/// The returned swatches are ordered by population, most populated first. Swatches with equal populations keep the
/// order their clusters were seeded in.
///
/// # Errors
///
/// [`Error::EmptyInput`] if `pixels` is empty, and [`Error::InvalidParameter`] if `k` is zero or larger than the number
/// of distinct colors in `pixels`.
pub fn extract(pixels: &[(u8, u8, u8)], k: usize) -> Result<Vec<Swatch>> {
    KMeansQuantizer::new(pixels, k, DEFAULT_SEED, DEFAULT_MAX_ITERATIONS)
        .get_quantized_colors()
        .map(|quantized| quantized.swatches)
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    swatches: Vec<Swatch>,
    iterations: usize,
    converged: bool,
}

pub struct PaletteBuilder {
    source: Source,
    color_count: usize,
    seed: u64,
    max_iterations: usize,
    resize: Option<(u32, u32)>,
}

enum Source {
    Pixels(Vec<(u8, u8, u8)>),
    Image(RgbImage),
}

impl Palette {
    pub fn from_pixels(pixels: Vec<(u8, u8, u8)>) -> PaletteBuilder {
        PaletteBuilder::from_pixels(pixels)
    }

    pub fn from_image<P>(image: ImageBuffer<P, Vec<u8>>) -> PaletteBuilder
    where
        P: image::Pixel<Subpixel = u8>,
    {
        PaletteBuilder::from_image(image)
    }

    /// Load the image at `path` into a builder, already resized to [`SAMPLE_WIDTH`] × [`SAMPLE_HEIGHT`].
    pub fn open<P>(path: P) -> Result<PaletteBuilder>
    where
        P: AsRef<Path>,
    {
        load_samples(path).map(PaletteBuilder::from_pixels)
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn colors(&self) -> Vec<(u8, u8, u8)> {
        self.swatches.iter().map(|swatch| swatch.rgb()).collect()
    }

    pub fn hex_codes(&self) -> Vec<String> {
        self.swatches.iter().map(|swatch| swatch.hex()).collect()
    }

    /// The color of the first swatch; swatches are kept sorted by population, most populated first.
    pub fn most_prominent_color(&self) -> Option<(u8, u8, u8)> {
        self.swatches.first().map(|swatch| swatch.rgb())
    }

    /// The number of assignment passes the clustering ran.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the clustering settled before hitting the iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl PaletteBuilder {
    pub fn from_pixels(pixels: Vec<(u8, u8, u8)>) -> Self {
        Self {
            source: Source::Pixels(pixels),
            color_count: DEFAULT_COLOR_COUNT,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            resize: None,
        }
    }

    /// Start from an image. The image is resized to [`SAMPLE_WIDTH`] × [`SAMPLE_HEIGHT`] before clustering unless
    /// told otherwise with [`PaletteBuilder::resize`] or [`PaletteBuilder::clear_resize`].
    pub fn from_image<P>(image: ImageBuffer<P, Vec<u8>>) -> Self
    where
        P: image::Pixel<Subpixel = u8>,
    {
        let (width, height) = image.dimensions();
        let rgb = RgbImage::from_fn(width, height, |x, y| image.get_pixel(x, y).to_rgb());

        Self {
            source: Source::Image(rgb),
            resize: Some((SAMPLE_WIDTH, SAMPLE_HEIGHT)),
            ..Self::from_pixels(Vec::new())
        }
    }

    pub fn color_count(self, color_count: usize) -> Self {
        Self { color_count, ..self }
    }

    pub fn seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self { max_iterations, ..self }
    }

    /// Resize an image source to `width` × `height` before clustering. Has no effect on a pixel source.
    pub fn resize(self, width: u32, height: u32) -> Self {
        Self {
            resize: Some((width, height)),
            ..self
        }
    }

    pub fn clear_resize(self) -> Self {
        Self { resize: None, ..self }
    }

    pub fn generate(self) -> Result<Palette> {
        let pixels = match self.source {
            Source::Pixels(pixels) => pixels,
            Source::Image(image) => match self.resize {
                Some(dimensions) => sampling::samples_of(&sampling::resize(&image, dimensions)),
                None => sampling::samples_of(&image),
            },
        };

        let quantized =
            KMeansQuantizer::new(&pixels, self.color_count, self.seed, self.max_iterations).get_quantized_colors()?;

        Ok(Palette {
            swatches: quantized.swatches,
            iterations: quantized.iterations,
            converged: quantized.converged,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    #[test]
    fn builder_defaults_match_extract() {
        let pixels = (0..=255u8).map(|i| (i, 255 - i, i / 3)).collect::<Vec<_>>();

        let palette = Palette::from_pixels(pixels.clone()).generate().unwrap();

        assert_eq!(palette.swatches().to_vec(), extract(&pixels, DEFAULT_COLOR_COUNT).unwrap());
        assert!(palette.converged());
        assert!(palette.iterations() >= 1);
    }

    #[test]
    fn image_source_is_resized_by_default() {
        let image = RgbImage::from_fn(30, 20, |x, _| if x < 10 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) });

        let palette = Palette::from_image(image).color_count(1).generate().unwrap();

        assert_eq!(
            palette.swatches()[0].population(),
            SAMPLE_WIDTH * SAMPLE_HEIGHT
        );
    }

    #[test]
    fn image_source_without_resize_keeps_every_pixel() {
        let image = RgbaImage::from_fn(4, 3, |x, _| if x == 0 { Rgba([0, 255, 0, 255]) } else { Rgba([0, 0, 0, 255]) });

        let palette = Palette::from_image(image)
            .clear_resize()
            .color_count(2)
            .generate()
            .unwrap();

        assert_eq!(palette.colors(), vec![(0, 0, 0), (0, 255, 0)]);
        assert_eq!(
            palette.swatches().iter().map(|s| s.population()).collect::<Vec<_>>(),
            vec![9, 3]
        );
        assert_eq!(palette.hex_codes(), vec!["#000000", "#00ff00"]);
        assert_eq!(palette.most_prominent_color(), Some((0, 0, 0)));
    }

    #[test]
    fn custom_resize_changes_sample_count() {
        let image = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));

        let palette = Palette::from_image(image)
            .resize(5, 2)
            .color_count(1)
            .generate()
            .unwrap();

        assert_eq!(palette.swatches().to_vec(), vec![Swatch::new((10, 20, 30), 10)]);
    }

    #[test]
    fn open_loads_and_clusters_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("halves.png");
        RgbImage::from_fn(60, 40, |_, y| if y < 30 { Rgb([200, 30, 30]) } else { Rgb([20, 20, 120]) })
            .save(&path)
            .unwrap();

        let palette = Palette::open(&path).unwrap().color_count(2).generate().unwrap();

        assert_eq!(palette.swatches().len(), 2);
        assert!(palette.swatches()[0].population() > palette.swatches()[1].population());
        assert_eq!(
            palette.swatches().iter().map(|s| s.population()).sum::<u32>(),
            SAMPLE_WIDTH * SAMPLE_HEIGHT
        );
    }

    #[test]
    fn seed_is_configurable() {
        let pixels = (0..64u8).map(|i| (i * 4, i, 255 - i * 2)).collect::<Vec<_>>();

        let first = Palette::from_pixels(pixels.clone()).seed(7).color_count(6).generate().unwrap();
        let second = Palette::from_pixels(pixels).seed(7).color_count(6).generate().unwrap();

        assert_eq!(first, second);
    }
}
