//! Interactive input selection.
//!
//! The sampler never prompts anyone. Whoever drives it supplies a
//! [`Picker`] that produces the video path and output directory, and
//! `None` from either method means the operator backed out.

use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use crate::error::SamplerError;

/// Extensions offered by default when choosing a video.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "mkv", "flv", "mpeg", "mpg"];

/// Supplies the two inputs of an interactive run.
pub trait Picker {
    /// Choose the video to sample. `Ok(None)` if the operator dismissed the prompt.
    fn pick_video_file(&mut self) -> Result<Option<PathBuf>, SamplerError>;

    /// Choose the output root directory. `Ok(None)` if dismissed.
    fn pick_directory(&mut self) -> Result<Option<PathBuf>, SamplerError>;
}

/// Returns `true` if `path` has one of the [`VIDEO_EXTENSIONS`], ignoring case.
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
}

/// A [`Picker`] that asks on the terminal.
///
/// An empty answer dismisses a prompt. A file without a known video
/// extension is only accepted after an explicit confirmation.
#[derive(Default)]
pub struct TerminalPicker {
    theme: ColorfulTheme,
}

impl TerminalPicker {
    /// Create a picker using dialoguer's colorful theme.
    pub fn new() -> Self {
        Self::default()
    }

    fn ask_path(&self, prompt: &str, must_be_file: bool) -> Result<Option<PathBuf>, SamplerError> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .validate_with(move |input: &String| -> Result<(), String> {
                let trimmed = input.trim();
                if !must_be_file || trimmed.is_empty() || Path::new(trimmed).is_file() {
                    Ok(())
                } else {
                    Err(format!("no such file: {trimmed}"))
                }
            })
            .interact_text()
            .map_err(|error| SamplerError::Prompt(error.to_string()))?;

        let trimmed = answer.trim();
        Ok((!trimmed.is_empty()).then(|| PathBuf::from(trimmed)))
    }
}

impl Picker for TerminalPicker {
    fn pick_video_file(&mut self) -> Result<Option<PathBuf>, SamplerError> {
        let prompt = format!("Video file ({}), empty to cancel", VIDEO_EXTENSIONS.join(", "));
        loop {
            let Some(path) = self.ask_path(&prompt, true)? else {
                return Ok(None);
            };
            if has_video_extension(&path) {
                return Ok(Some(path));
            }

            let accept = Confirm::with_theme(&self.theme)
                .with_prompt(format!(
                    "{} does not look like a video, use it anyway?",
                    path.display()
                ))
                .default(false)
                .interact()
                .map_err(|error| SamplerError::Prompt(error.to_string()))?;
            if accept {
                return Ok(Some(path));
            }
        }
    }

    fn pick_directory(&mut self) -> Result<Option<PathBuf>, SamplerError> {
        self.ask_path("Folder to save the frames in, empty to cancel", false)
    }
}
