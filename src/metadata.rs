//! Video metadata and the pre-extraction report.
//!
//! [`VideoMetadata`] holds what the decoder learns when a source is opened.
//! [`SourceReport`] adds the figures derived from the sampling interval.
//! Both are for observability only; sampling itself is purely index-based.

use std::time::Duration;

/// Metadata for the video stream being sampled.
///
/// # Example
///
/// ```no_run
/// use framesnap::{FrameSource, VideoSource};
///
/// let source = VideoSource::open("input.mp4").unwrap();
/// let metadata = source.metadata();
/// println!("{}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.frames_per_second);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second, `0.0` when the container does not declare one.
    pub frames_per_second: f64,
    /// Frame count declared by the container, or estimated from duration
    /// and frame rate. The number of frames actually decoded may differ.
    pub frame_count: u64,
    /// Container duration, zero when unknown.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
}

/// Frame statistics reported once a source is open, before sampling starts.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SourceReport {
    /// Base name of the video, used as the destination folder name.
    pub source_name: String,
    /// Declared or estimated frame count.
    pub frame_count: u64,
    /// Frames per second, `0.0` if unavailable.
    pub frames_per_second: f64,
    /// `frame_count / frames_per_second`, zero if the rate is unavailable
    /// or the result does not fit a [`Duration`].
    pub duration: Duration,
    /// The sampling interval in frames.
    pub interval: u64,
    /// `interval / frames_per_second`, zero if the rate is unavailable.
    pub seconds_between_images: f64,
}

impl SourceReport {
    /// Derive the report for `metadata` sampled every `interval` frames.
    pub fn new(source_name: impl Into<String>, metadata: &VideoMetadata, interval: u64) -> Self {
        let fps = metadata.frames_per_second;
        let usable_rate = fps.is_finite() && fps > 0.0;

        let duration = if usable_rate {
            Duration::try_from_secs_f64(metadata.frame_count as f64 / fps)
                .unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };
        let seconds_between_images = if usable_rate {
            interval as f64 / fps
        } else {
            0.0
        };

        Self {
            source_name: source_name.into(),
            frame_count: metadata.frame_count,
            frames_per_second: if usable_rate { fps } else { 0.0 },
            duration,
            interval,
            seconds_between_images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(frame_count: u64, frames_per_second: f64) -> VideoMetadata {
        VideoMetadata {
            width: 640,
            height: 360,
            frames_per_second,
            frame_count,
            duration: Duration::ZERO,
            codec: "h264".to_string(),
        }
    }

    #[test]
    fn derived_figures_at_thirty_fps() {
        let report = SourceReport::new("clip", &metadata(900, 30.0), 30);
        assert_eq!(report.duration, Duration::from_secs(30));
        assert!((report.seconds_between_images - 1.0).abs() < f64::EPSILON);
        assert_eq!(report.frame_count, 900);
        assert_eq!(report.source_name, "clip");
    }

    #[test]
    fn zero_rate_reports_zeros() {
        let report = SourceReport::new("clip", &metadata(120, 0.0), 30);
        assert_eq!(report.duration, Duration::ZERO);
        assert_eq!(report.seconds_between_images, 0.0);
        assert_eq!(report.frame_count, 120);
    }

    #[test]
    fn non_finite_rate_reports_zeros() {
        let report = SourceReport::new("clip", &metadata(120, f64::NAN), 10);
        assert_eq!(report.frames_per_second, 0.0);
        assert_eq!(report.duration, Duration::ZERO);
        assert_eq!(report.seconds_between_images, 0.0);
    }

    #[test]
    fn unrepresentable_duration_reports_zero() {
        let report = SourceReport::new("clip", &metadata(u64::MAX / 2, 1e-9), 30);
        assert_eq!(report.duration, Duration::ZERO);
        assert_eq!(report.frame_count, u64::MAX / 2);
        assert!(report.seconds_between_images.is_finite());
    }
}
