//! Error types for the `framesnap` crate.
//!
//! [`SamplerError`] is returned by every fallible operation. The variants
//! that mean "the video could not be opened" are grouped by
//! [`SamplerError::is_not_openable`] so callers can end a run quietly
//! instead of treating it as a fault.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framesnap` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SamplerError {
    /// The video file could not be opened by the decoding layer.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file opened but contains no video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The video path has no file name to derive a destination folder from.
    #[error("Cannot derive a folder name from {0}")]
    InvalidSourceName(PathBuf),

    /// A sampling interval of zero was provided.
    #[error("Sampling interval must be greater than zero")]
    InvalidInterval,

    /// A decoded frame could not be turned into an image.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while creating folders or writing images.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while encoding a saved frame.
    #[error("Image encoding error: {0}")]
    ImageError(#[from] ImageError),

    /// An interactive prompt failed.
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl SamplerError {
    /// Returns `true` when the error means the source could not be opened
    /// as a video, as opposed to a failure while writing output.
    pub fn is_not_openable(&self) -> bool {
        matches!(
            self,
            SamplerError::FileOpen { .. }
                | SamplerError::NoVideoStream
                | SamplerError::InvalidSourceName(_)
        )
    }
}

impl From<FfmpegError> for SamplerError {
    fn from(error: FfmpegError) -> Self {
        SamplerError::FfmpegError(error.to_string())
    }
}
