//! Progress reporting.
//!
//! A [`ProgressCallback`] attached through
//! [`SamplerOptions::with_progress`](crate::SamplerOptions::with_progress)
//! sees the [`SourceReport`] once the video is open, then a
//! [`ProgressInfo`] snapshot every `batch_size` decoded frames and once
//! more when the pass ends.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framesnap::{FrameSampler, ProgressCallback, ProgressInfo, SamplerOptions};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{} read, {} saved", info.frames_read, info.images_saved);
//!     }
//! }
//!
//! let options = SamplerOptions::new()
//!     .with_progress(Arc::new(PrintProgress))
//!     .with_batch_size(100);
//! let result = FrameSampler::new(options).extract("input.mp4", "frames")?;
//! # Ok::<(), framesnap::SamplerError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::metadata::SourceReport;

/// A snapshot of sampling progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Frames decoded so far.
    pub frames_read: u64,
    /// Images written so far.
    pub images_saved: u64,
    /// Declared frame count of the source, if known.
    pub total_frames: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total_frames` is known.
    /// May exceed 100 when the declared count underestimates the stream.
    pub percentage: Option<f32>,
    /// Wall-clock time since sampling started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
}

/// Trait for observing a sampling pass.
///
/// Callbacks are infallible observers; they cannot stop the pass.
pub trait ProgressCallback: Send + Sync {
    /// Called once after the source opened, before the first frame is read.
    fn on_source_opened(&self, _report: &SourceReport) {}

    /// Called at regular intervals while frames are decoded.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all notifications. The default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks counters and timing for one pass and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total_frames: Option<u64>,
    frames_read: u64,
    images_saved: u64,
    batch_size: u64,
    start_time: Instant,
    frames_since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        total_frames: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            total_frames: total_frames.filter(|&total| total > 0),
            frames_read: 0,
            images_saved: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            frames_since_last_report: 0,
        }
    }

    /// Record one decoded frame, and whether it was saved.
    pub(crate) fn advance(&mut self, saved: bool) {
        self.frames_read += 1;
        if saved {
            self.images_saved += 1;
        }
        self.frames_since_last_report += 1;

        if self.frames_since_last_report >= self.batch_size {
            self.report();
            self.frames_since_last_report = 0;
        }
    }

    /// Unconditionally emit a final report.
    pub(crate) fn finish(&mut self) {
        self.report();
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn report(&self) {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total_frames
            .map(|total| (self.frames_read as f32 / total as f32) * 100.0);

        let estimated_remaining = if self.frames_read > 0 {
            self.total_frames.map(|total| {
                let remaining = total.saturating_sub(self.frames_read);
                elapsed.mul_f64(remaining as f64 / self.frames_read as f64)
            })
        } else {
            None
        };

        self.callback.on_progress(&ProgressInfo {
            frames_read: self.frames_read,
            images_saved: self.images_saved,
            total_frames: self.total_frames,
            percentage,
            elapsed,
            estimated_remaining,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        infos: Mutex<Vec<ProgressInfo>>,
    }

    impl ProgressCallback for Recorder {
        fn on_progress(&self, info: &ProgressInfo) {
            self.infos.lock().unwrap().push(info.clone());
        }
    }

    #[test]
    fn reports_every_batch_and_on_finish() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = ProgressTracker::new(recorder.clone(), Some(10), 4);
        for index in 0..10 {
            tracker.advance(index % 3 == 0);
        }
        tracker.finish();

        let infos = recorder.infos.lock().unwrap();
        let reads: Vec<u64> = infos.iter().map(|info| info.frames_read).collect();
        assert_eq!(reads, vec![4, 8, 10]);
        assert_eq!(infos.last().unwrap().images_saved, 4);
        assert_eq!(infos.last().unwrap().percentage, Some(100.0));
    }

    #[test]
    fn unknown_total_has_no_percentage() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = ProgressTracker::new(recorder.clone(), Some(0), 0);
        tracker.advance(true);

        let infos = recorder.infos.lock().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].total_frames, None);
        assert_eq!(infos[0].percentage, None);
        assert!(infos[0].estimated_remaining.is_none());
    }
}
