//! # framesnap
//!
//! Sample still frames from a video at a fixed interval and save them as
//! numbered images.
//!
//! A pass opens the video through FFmpeg (via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)), decodes every
//! frame in order, and writes every Nth one into a folder named after the
//! video:
//!
//! ```text
//! <output root>/<video stem>/frame_00000.jpg
//!                            frame_00001.jpg
//!                            ...
//! ```
//!
//! Image numbers are consecutive from zero no matter which source frames
//! were picked, so a pass over `n` frames at interval `k` always produces
//! `ceil(n / k)` files.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framesnap::{FrameSampler, SamplerOptions};
//!
//! // One image per second of 30 fps footage.
//! let sampler = FrameSampler::new(SamplerOptions::new().with_interval(30));
//! let result = sampler.extract("input.mp4", "frames")?;
//! println!(
//!     "{} of {} frames saved to {}",
//!     result.saved_image_count,
//!     result.total_frames_seen,
//!     result.destination_folder.display(),
//! );
//! # Ok::<(), framesnap::SamplerError>(())
//! ```
//!
//! ## Interactive runs
//!
//! [`run_session`] asks a [`Picker`] for the two inputs, samples, and then
//! hands the destination to a [`FolderOpener`]. The `framesnap` binary
//! drives it with [`TerminalPicker`] and [`SystemFolderOpener`].
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

mod conversion;

pub mod configuration;
pub mod error;
pub mod ffmpeg;
pub mod interactive;
pub mod metadata;
pub mod opener;
pub mod progress;
pub mod sampler;
pub mod session;
pub mod source;

pub use configuration::{
    DEFAULT_FILE_PREFIX, DEFAULT_INTERVAL, DEFAULT_JPEG_QUALITY, OutputFormat, SEQUENCE_WIDTH,
    SamplerOptions,
};
pub use error::SamplerError;
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use interactive::{Picker, TerminalPicker, VIDEO_EXTENSIONS, has_video_extension};
pub use metadata::{SourceReport, VideoMetadata};
pub use opener::{FolderOpener, NoOpOpener, SystemFolderOpener};
pub use progress::{ProgressCallback, ProgressInfo};
pub use sampler::{ExtractionResult, FrameSampler, expected_image_count, source_name};
pub use session::{SessionOutcome, run_session};
pub use source::{FrameSource, VideoSource};
