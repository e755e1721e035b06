//! Sampling configuration.
//!
//! [`SamplerOptions`] is a builder carrying the sampling interval, the
//! output encoding, and progress settings into
//! [`FrameSampler`](crate::FrameSampler). Options live for one invocation
//! and are never persisted.
//!
//! # Example
//!
//! ```
//! use framesnap::{OutputFormat, SamplerOptions};
//!
//! let options = SamplerOptions::new()
//!     .with_interval(15)
//!     .with_format(OutputFormat::Png)
//!     .with_file_prefix("still_");
//! assert_eq!(options.interval(), 15);
//! assert_eq!(options.file_name(7), "still_00007.png");
//! ```

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::Arc;

use crate::progress::{NoOpProgress, ProgressCallback};

/// Frames to advance between saved images when no interval is given.
pub const DEFAULT_INTERVAL: u64 = 30;

/// JPEG quality used when none is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Prefix of every saved image's file name.
pub const DEFAULT_FILE_PREFIX: &str = "frame_";

/// Digits in the zero-padded image sequence number.
pub const SEQUENCE_WIDTH: usize = 5;

/// Image encoding for saved frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Baseline JPEG. This is the default.
    #[default]
    Jpeg,
    /// Lossless PNG.
    Png,
    /// Uncompressed BMP.
    Bmp,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
        }
    }

    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "bmp" => Ok(OutputFormat::Bmp),
            other => Err(format!("unsupported image format: {other}")),
        }
    }
}

/// Settings for a sampling pass.
///
/// A default-constructed value samples every 30th frame into
/// `frame_NNNNN.jpg` files at JPEG quality 95 with no progress callback.
#[derive(Clone)]
pub struct SamplerOptions {
    pub(crate) interval: u64,
    pub(crate) format: OutputFormat,
    pub(crate) jpeg_quality: u8,
    pub(crate) file_prefix: String,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) batch_size: u64,
}

impl Debug for SamplerOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SamplerOptions")
            .field("interval", &self.interval)
            .field("format", &self.format)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("file_prefix", &self.file_prefix)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerOptions {
    /// Create options with the documented defaults.
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            format: OutputFormat::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Save one image every `interval` decoded frames. `1` saves every frame.
    ///
    /// Zero is accepted here and rejected with
    /// [`SamplerError::InvalidInterval`](crate::SamplerError::InvalidInterval)
    /// when extraction starts.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    /// Set the image encoding of saved frames.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the JPEG quality, clamped to `1..=100`. Ignored by other formats.
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Set the prefix placed before the sequence number in file names.
    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Fire the progress callback every `size` decoded frames, minimum 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// The sampling interval in frames.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// The image encoding of saved frames.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The JPEG quality.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// File name of the image with sequence number `saved_index`.
    pub fn file_name(&self, saved_index: u64) -> String {
        format!(
            "{}{saved_index:0width$}.{}",
            self.file_prefix,
            self.format.extension(),
            width = SEQUENCE_WIDTH,
        )
    }
}
