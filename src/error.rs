use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned while building a sample set or extracting a palette from it.
#[derive(Debug, Error)]
pub enum Error {
    /// The sample set has no pixels.
    #[error("cannot extract a palette from an empty sample set")]
    EmptyInput,

    /// The requested color count is zero or exceeds the number of distinct colors in the sample set.
    #[error("cannot extract {k} colors from {samples} samples with {distinct} distinct colors")]
    InvalidParameter { k: usize, samples: usize, distinct: usize },

    /// A raw channel value is NaN, infinite or outside `0..=255`.
    #[error("sample {index} has invalid channel value {value}")]
    NonFiniteInput { index: usize, value: f64 },

    /// The image could not be opened or decoded.
    #[error("failed to load image {}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
