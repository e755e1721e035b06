//! Interval frame sampling.
//!
//! [`FrameSampler`] opens a video, walks its frames in decode order, and
//! writes every Nth one to `<output_root>/<video stem>/` as a numbered
//! image. Saved images are numbered `0, 1, 2, …` without gaps, whatever
//! source frame indices they came from.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use image::{RgbImage, codecs::jpeg::JpegEncoder};

use crate::{
    configuration::{OutputFormat, SamplerOptions},
    error::SamplerError,
    metadata::SourceReport,
    progress::ProgressTracker,
    source::{FrameSource, VideoSource},
};

/// Outcome of a completed sampling pass.
#[derive(Debug, Clone)]
#[must_use]
pub struct ExtractionResult {
    /// Video base name with directory and extension stripped.
    pub source_name: String,
    /// Folder the images were written to.
    pub destination_folder: PathBuf,
    /// Frames decoded before the stream ended.
    pub total_frames_seen: u64,
    /// Images written.
    pub saved_image_count: u64,
    /// Statistics reported when the source was opened.
    pub report: SourceReport,
    /// Wall-clock duration of the decode loop.
    pub elapsed: Duration,
}

/// Samples a video every N frames into numbered image files.
///
/// # Example
///
/// ```no_run
/// use framesnap::{FrameSampler, SamplerOptions};
///
/// let sampler = FrameSampler::new(SamplerOptions::new().with_interval(30));
/// let result = sampler.extract("holiday.mp4", "frames")?;
/// // Images are in frames/holiday/frame_00000.jpg, frame_00001.jpg, ...
/// println!("{} images in {}", result.saved_image_count, result.destination_folder.display());
/// # Ok::<(), framesnap::SamplerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameSampler {
    options: SamplerOptions,
}

impl FrameSampler {
    /// Create a sampler with the given options.
    pub fn new(options: SamplerOptions) -> Self {
        Self { options }
    }

    /// The options this sampler runs with.
    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// Sample the video at `video_path` into `output_root/<video stem>/`.
    ///
    /// The destination folder is created before the video is opened, so it
    /// may exist even when opening fails.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::InvalidInterval`] if the interval is zero.
    /// - An error for which [`SamplerError::is_not_openable`] holds if the
    ///   video cannot be opened. No images are written in that case.
    /// - [`SamplerError::IoError`] or [`SamplerError::ImageError`] if the
    ///   folder or an image cannot be written.
    pub fn extract<P, Q>(
        &self,
        video_path: P,
        output_root: Q,
    ) -> Result<ExtractionResult, SamplerError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        self.check_interval()?;
        let video_path = video_path.as_ref();

        let source_name = source_name(video_path)?;
        let destination = prepare_destination(output_root.as_ref(), &source_name)?;

        let mut source = VideoSource::open(video_path)?;
        self.run(&mut source, source_name, destination)
    }

    /// Sample an already-open [`FrameSource`] into `output_root/<source_name>/`.
    ///
    /// # Errors
    ///
    /// As for [`extract`](FrameSampler::extract), minus the open failures.
    pub fn extract_from<S>(
        &self,
        source: &mut S,
        source_name: &str,
        output_root: impl AsRef<Path>,
    ) -> Result<ExtractionResult, SamplerError>
    where
        S: FrameSource + ?Sized,
    {
        self.check_interval()?;
        let destination = prepare_destination(output_root.as_ref(), source_name)?;
        self.run(source, source_name.to_string(), destination)
    }

    fn check_interval(&self) -> Result<(), SamplerError> {
        if self.options.interval == 0 {
            return Err(SamplerError::InvalidInterval);
        }
        Ok(())
    }

    fn run<S>(
        &self,
        source: &mut S,
        source_name: String,
        destination: PathBuf,
    ) -> Result<ExtractionResult, SamplerError>
    where
        S: FrameSource + ?Sized,
    {
        let interval = self.options.interval;
        let report = SourceReport::new(source_name.as_str(), source.metadata(), interval);

        log::info!(
            "Sampling {}: {} frames, {:.2} fps, {:.2}s, every {} frames (~{:.2}s apart)",
            report.source_name,
            report.frame_count,
            report.frames_per_second,
            report.duration.as_secs_f64(),
            interval,
            report.seconds_between_images,
        );
        self.options.progress.on_source_opened(&report);

        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            Some(report.frame_count),
            self.options.batch_size,
        );

        let mut read_index: u64 = 0;
        let mut saved_index: u64 = 0;

        while let Some(frame) = source.next_frame() {
            let selected = read_index % interval == 0;
            if selected {
                let path = destination.join(self.options.file_name(saved_index));
                self.write_image(&frame, &path)?;
                log::debug!("Saved frame {read_index} -> {}", path.display());
                saved_index += 1;
            }
            read_index += 1;
            tracker.advance(selected);
        }

        tracker.finish();

        log::info!(
            "Saved {saved_index} of {read_index} frames to {}",
            destination.display(),
        );

        Ok(ExtractionResult {
            source_name,
            destination_folder: destination,
            total_frames_seen: read_index,
            saved_image_count: saved_index,
            report,
            elapsed: tracker.elapsed(),
        })
    }

    fn write_image(&self, frame: &RgbImage, path: &Path) -> Result<(), SamplerError> {
        match self.options.format {
            OutputFormat::Jpeg => {
                let mut writer = BufWriter::new(File::create(path)?);
                JpegEncoder::new_with_quality(&mut writer, self.options.jpeg_quality)
                    .encode_image(frame)?;
                writer.flush()?;
            }
            format => frame.save_with_format(path, format.to_image_format())?,
        }
        Ok(())
    }
}

/// Video base name with directory and extension stripped.
///
/// # Errors
///
/// [`SamplerError::InvalidSourceName`] if the path has no file name.
pub fn source_name(video_path: &Path) -> Result<String, SamplerError> {
    video_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| SamplerError::InvalidSourceName(video_path.to_path_buf()))
}

/// Number of images a pass over `total_frames` frames saves: every frame
/// whose index is a multiple of `interval`, i.e. `ceil(total / interval)`.
///
/// Returns `0` for a zero interval.
pub fn expected_image_count(total_frames: u64, interval: u64) -> u64 {
    if interval == 0 {
        return 0;
    }
    total_frames.div_ceil(interval)
}

fn prepare_destination(output_root: &Path, source_name: &str) -> Result<PathBuf, SamplerError> {
    let destination = output_root.join(source_name);
    fs::create_dir_all(&destination)?;
    Ok(destination)
}
