//! Video decode sessions.
//!
//! [`FrameSource`] is the seam between the sampling loop and the decoding
//! layer: anything that can hand out frames in decode order and describe
//! itself with [`VideoMetadata`] can be sampled. [`VideoSource`] is the
//! FFmpeg-backed implementation.
//!
//! A source never distinguishes a clean end of stream from a read or decode
//! error part-way through: both make [`FrameSource::next_frame`] return
//! `None` from then on.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::context::Input,
    frame::Video as VideoFrame,
    media::Type,
};
use image::RgbImage;

use crate::{
    conversion::{self, RgbConverter},
    error::SamplerError,
    metadata::VideoMetadata,
};

/// A sequential supply of decoded frames.
pub trait FrameSource {
    /// Metadata describing the stream.
    fn metadata(&self) -> &VideoMetadata;

    /// Decode the next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> Option<RgbImage>;
}

/// An open FFmpeg decode session over the best video stream of a file.
///
/// The session is released when the value is dropped.
///
/// # Example
///
/// ```no_run
/// use framesnap::{FrameSource, VideoSource};
///
/// let mut source = VideoSource::open("input.mp4")?;
/// let mut decoded = 0;
/// while let Some(_frame) = source.next_frame() {
///     decoded += 1;
/// }
/// println!("decoded {decoded} frames");
/// # Ok::<(), framesnap::SamplerError>(())
/// ```
pub struct VideoSource {
    input_context: Input,
    decoder: VideoDecoder,
    video_stream_index: usize,
    metadata: VideoMetadata,
    converter: RgbConverter,
    decoded_frame: VideoFrame,
    eof_sent: bool,
    exhausted: bool,
    path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("video_stream_index", &self.video_stream_index)
            .field("metadata", &self.metadata)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open `path` as a decodable video stream.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::FileOpen`] if FFmpeg cannot open the file or build
    ///   a decoder for its video stream.
    /// - [`SamplerError::NoVideoStream`] if the file has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SamplerError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |reason: String| SamplerError::FileOpen {
            path: path.clone(),
            reason,
        };

        log::debug!("Opening decode session: {}", path.display());

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let container_duration = match input_context.duration() {
            micros if micros > 0 => Duration::from_micros(micros as u64),
            _ => Duration::ZERO,
        };

        let (video_stream_index, decoder, frames_per_second, declared_frames) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or(SamplerError::NoVideoStream)?;

            let frames_per_second = conversion::rational_to_rate(stream.avg_frame_rate())
                .or_else(|| conversion::rational_to_rate(stream.rate()))
                .unwrap_or(0.0);

            let decoder = CodecContext::from_parameters(stream.parameters())
                .and_then(|context| context.decoder().video())
                .map_err(|error| open_error(format!("Failed to create video decoder: {error}")))?;

            (stream.index(), decoder, frames_per_second, stream.frames())
        };

        let frame_count = if declared_frames > 0 {
            declared_frames as u64
        } else if frames_per_second > 0.0 {
            (container_duration.as_secs_f64() * frames_per_second) as u64
        } else {
            0
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            frame_count,
            duration: container_duration,
            codec,
        };

        log::debug!(
            "Video stream {}: {}x{}, {:.2} fps, codec={}, ~{} frames",
            video_stream_index,
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.codec,
            metadata.frame_count,
        );

        Ok(Self {
            input_context,
            decoder,
            video_stream_index,
            metadata,
            converter: RgbConverter::new(),
            decoded_frame: VideoFrame::empty(),
            eof_sent: false,
            exhausted: false,
            path,
        })
    }

    /// Path this session was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stop(&mut self, reason: impl std::fmt::Display) -> Option<RgbImage> {
        log::debug!("Stream ended for {}: {reason}", self.path.display());
        self.exhausted = true;
        None
    }
}

impl FrameSource for VideoSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Option<RgbImage> {
        if self.exhausted {
            return None;
        }

        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return match self.converter.convert(&self.decoded_frame) {
                    Ok(image) => Some(image),
                    Err(error) => {
                        log::warn!("Could not convert decoded frame: {error}");
                        self.stop(error)
                    }
                };
            }

            if self.eof_sent {
                return self.stop("decoder drained");
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            return self.stop(error);
                        }
                    }
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        return self.stop(error);
                    }
                    self.eof_sent = true;
                }
                Err(error) => return self.stop(error),
            }
        }
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        log::debug!("Released decode session: {}", self.path.display());
    }
}
