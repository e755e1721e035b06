//! One interactive run: pick a video, pick a folder, sample, reveal.

use crate::{
    error::SamplerError,
    interactive::Picker,
    opener::FolderOpener,
    sampler::{ExtractionResult, FrameSampler},
};

/// How an interactive run ended.
#[derive(Debug)]
#[must_use]
pub enum SessionOutcome {
    /// The video prompt was dismissed; nothing was extracted.
    VideoNotSelected,
    /// The output folder prompt was dismissed; nothing was extracted.
    OutputNotSelected,
    /// The chosen file could not be opened as a video.
    NotOpenable(SamplerError),
    /// Sampling finished.
    Completed {
        result: ExtractionResult,
        /// Whether the destination was opened in a file browser.
        folder_opened: bool,
    },
}

/// Run one session.
///
/// # Errors
///
/// Prompt failures and failures while writing images. Dismissed prompts and
/// unopenable videos are reported through [`SessionOutcome`] instead.
///
/// # Example
///
/// ```no_run
/// use framesnap::{FrameSampler, SessionOutcome, SystemFolderOpener, TerminalPicker, run_session};
///
/// let outcome = run_session(
///     &mut TerminalPicker::new(),
///     &SystemFolderOpener,
///     &FrameSampler::default(),
/// )?;
/// if let SessionOutcome::Completed { result, .. } = outcome {
///     println!("{} images", result.saved_image_count);
/// }
/// # Ok::<(), framesnap::SamplerError>(())
/// ```
pub fn run_session<P, O>(
    picker: &mut P,
    opener: &O,
    sampler: &FrameSampler,
) -> Result<SessionOutcome, SamplerError>
where
    P: Picker + ?Sized,
    O: FolderOpener + ?Sized,
{
    let Some(video_path) = picker.pick_video_file()? else {
        log::debug!("Video selection dismissed");
        return Ok(SessionOutcome::VideoNotSelected);
    };

    let Some(output_root) = picker.pick_directory()? else {
        log::debug!("Output folder selection dismissed");
        return Ok(SessionOutcome::OutputNotSelected);
    };

    match sampler.extract(&video_path, &output_root) {
        Ok(result) => {
            let folder_opened = opener.open_folder(&result.destination_folder);
            Ok(SessionOutcome::Completed {
                result,
                folder_opened,
            })
        }
        Err(error) if error.is_not_openable() => Ok(SessionOutcome::NotOpenable(error)),
        Err(error) => Err(error),
    }
}
