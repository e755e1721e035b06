use std::{
    io::{Stderr, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framesnap::{
    DEFAULT_FILE_PREFIX, DEFAULT_INTERVAL, DEFAULT_JPEG_QUALITY, FfmpegLogLevel, FolderOpener,
    FrameSampler, FrameSource, NoOpOpener, OutputFormat, Picker, ProgressCallback, ProgressInfo,
    SamplerError, SamplerOptions, SessionOutcome, SourceReport, SystemFolderOpener,
    TerminalPicker, VideoSource,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Run without a subcommand to pick the video and output folder interactively.\n\nExamples:\n  framesnap\n  framesnap extract holiday.mp4 --out frames --every 30\n  framesnap --progress extract holiday.mp4 --out frames --format png\n  framesnap probe holiday.mp4 --json\n  framesnap completions zsh > _framesnap";

#[derive(Debug, Parser)]
#[command(
    name = "framesnap",
    version,
    about = "Save every Nth frame of a video as numbered images",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar while frames are decoded.
    #[arg(long)]
    progress: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sample a video into numbered images.
    #[command(
        about = "Extract every Nth frame",
        after_help = "Examples:\n  framesnap extract input.mp4 --out frames\n  framesnap extract input.mp4 --out frames --every 1 --format png --no-open\n  framesnap extract --every 60"
    )]
    Extract(ExtractArgs),

    /// Print frame statistics without extracting anything.
    #[command(
        about = "Print frame statistics",
        visible_alias = "info",
        after_help = "Examples:\n  framesnap probe input.mp4\n  framesnap probe input.mp4 --every 15 --json"
    )]
    Probe {
        /// Input video path.
        input: PathBuf,
        /// Interval used for the seconds-between-images estimate.
        #[arg(long, default_value_t = DEFAULT_INTERVAL)]
        every: u64,
        /// Output as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input video path. Prompted for when omitted.
    input: Option<PathBuf>,
    /// Folder in which the `<video name>` subfolder is created. Prompted for when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Save one image every N decoded frames.
    #[arg(long, default_value_t = DEFAULT_INTERVAL)]
    every: u64,
    /// Image format (jpg, png, bmp).
    #[arg(long, default_value = "jpg")]
    format: String,
    /// JPEG quality (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    quality: u8,
    /// File name prefix placed before the sequence number.
    #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
    prefix: String,
    /// Print the summary as machine-readable JSON.
    #[arg(long)]
    json: bool,
    /// Do not open the output folder when done.
    #[arg(long)]
    no_open: bool,
}

impl ExtractArgs {
    /// The arguments of a bare `framesnap` invocation.
    fn interactive() -> Self {
        Self {
            input: None,
            out: None,
            every: DEFAULT_INTERVAL,
            format: OutputFormat::default().extension().to_string(),
            quality: DEFAULT_JPEG_QUALITY,
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            json: false,
            no_open: false,
        }
    }
}

/// Answers from the command line first, the terminal for anything missing.
///
/// Prompt notices go to `notices` (stderr in the binary) so stdout only
/// carries results.
struct PresetPicker<P, W = Stderr> {
    video: Option<PathBuf>,
    output: Option<PathBuf>,
    fallback: P,
    notices: W,
}

impl<P: Picker, W: Write> Picker for PresetPicker<P, W> {
    fn pick_video_file(&mut self) -> Result<Option<PathBuf>, SamplerError> {
        match self.video.take() {
            Some(path) => Ok(Some(path)),
            None => {
                writeln!(
                    self.notices,
                    "{}",
                    "Select the video to extract frames from...".cyan()
                )?;
                self.fallback.pick_video_file()
            }
        }
    }

    fn pick_directory(&mut self) -> Result<Option<PathBuf>, SamplerError> {
        match self.output.take() {
            Some(path) => Ok(Some(path)),
            None => {
                writeln!(
                    self.notices,
                    "{}",
                    "Select the folder to save the frames in...".cyan()
                )?;
                self.fallback.pick_directory()
            }
        }
    }
}

/// Prints the source report and drives the optional progress bar.
struct TerminalReporter {
    bar: Option<ProgressBar>,
    quiet: bool,
    verbose: bool,
}

impl TerminalReporter {
    fn new(
        show_bar: bool,
        quiet: bool,
        verbose: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = if show_bar {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
            )?;
            bar.set_style(style.progress_chars("##-"));
            Some(bar)
        } else {
            None
        };
        Ok(Self {
            bar,
            quiet,
            verbose,
        })
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("done");
        }
    }
}

impl ProgressCallback for TerminalReporter {
    fn on_source_opened(&self, report: &SourceReport) {
        if !self.quiet {
            print_report(report);
        }
        if let Some(bar) = &self.bar {
            bar.set_length(report.frame_count);
        }
    }

    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(bar) = &self.bar {
            if info.frames_read > bar.length().unwrap_or(0) {
                bar.set_length(info.frames_read);
            }
            bar.set_position(info.frames_read);
            bar.set_message(format!("{} saved", info.images_saved));
        } else if self.verbose {
            eprintln!(
                "{} {} frames read, {} saved",
                "progress".cyan().bold(),
                info.frames_read,
                info.images_saved
            );
        }
    }
}

fn print_report(report: &SourceReport) {
    println!();
    println!("{} {}", "Video:".bold(), report.source_name);
    println!("  Total frames: {}", report.frame_count);
    println!("  FPS: {:.2}", report.frames_per_second);
    println!("  Duration: {:.2} seconds", report.duration.as_secs_f64());
    println!(
        "  Saving every {} frames (~{:.2} seconds between images)",
        report.interval, report.seconds_between_images
    );
    println!();
}

fn report_json(report: &SourceReport) -> serde_json::Value {
    json!({
        "source_name": report.source_name,
        "frame_count": report.frame_count,
        "fps": report.frames_per_second,
        "duration_seconds": report.duration.as_secs_f64(),
        "interval": report.interval,
        "seconds_between_images": report.seconds_between_images,
    })
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let level: FfmpegLogLevel = global.log_level.parse()?;
    framesnap::set_ffmpeg_log_level(level);
    Ok(())
}

fn sampler_options(
    args: &ExtractArgs,
    reporter: Arc<TerminalReporter>,
    show_bar: bool,
) -> Result<SamplerOptions, Box<dyn std::error::Error>> {
    if args.every == 0 {
        return Err("--every must be greater than 0".into());
    }
    let format: OutputFormat = args.format.parse()?;

    Ok(SamplerOptions::new()
        .with_interval(args.every)
        .with_format(format)
        .with_jpeg_quality(args.quality)
        .with_file_prefix(args.prefix.as_str())
        .with_progress(reporter)
        .with_batch_size(if show_bar { 1 } else { 100 }))
}

fn run_extract(
    global: &GlobalOptions,
    args: ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = Arc::new(TerminalReporter::new(global.progress, args.json, global.verbose)?);
    let options = sampler_options(&args, reporter.clone(), global.progress)?;
    let sampler = FrameSampler::new(options);

    let opener: &dyn FolderOpener = if args.no_open {
        &NoOpOpener
    } else {
        &SystemFolderOpener
    };
    let mut picker = PresetPicker {
        video: args.input,
        output: args.out,
        fallback: TerminalPicker::new(),
        notices: std::io::stderr(),
    };

    let outcome = framesnap::run_session(&mut picker, opener, &sampler)?;
    reporter.finish();

    if args.json {
        let payload = match &outcome {
            SessionOutcome::VideoNotSelected => json!({ "status": "video_not_selected" }),
            SessionOutcome::OutputNotSelected => json!({ "status": "output_not_selected" }),
            SessionOutcome::NotOpenable(error) => json!({
                "status": "not_openable",
                "error": error.to_string(),
            }),
            SessionOutcome::Completed {
                result,
                folder_opened,
            } => json!({
                "status": "completed",
                "source": report_json(&result.report),
                "destination_folder": result.destination_folder.display().to_string(),
                "total_frames_seen": result.total_frames_seen,
                "saved_image_count": result.saved_image_count,
                "elapsed_seconds": result.elapsed.as_secs_f64(),
                "folder_opened": folder_opened,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    match outcome {
        SessionOutcome::VideoNotSelected => {
            println!("{}", "No video selected. Exiting.".yellow());
        }
        SessionOutcome::OutputNotSelected => {
            println!("{}", "No output folder selected. Exiting.".yellow());
        }
        SessionOutcome::NotOpenable(error) => {
            println!("{} {}", "Could not open the video:".red().bold(), error);
        }
        SessionOutcome::Completed {
            result,
            folder_opened,
        } => {
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "{} of {} frames saved to {}",
                    result.saved_image_count,
                    result.total_frames_seen,
                    result.destination_folder.display()
                )
                .green()
            );
            if !folder_opened {
                println!("Open the folder manually: {}", result.destination_folder.display());
            }
        }
    }

    Ok(())
}

fn run_probe(input: &Path, every: u64, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let name = framesnap::source_name(input)?;
    let source = VideoSource::open(input)?;
    let metadata = source.metadata();
    let report = SourceReport::new(name, metadata, every);

    if json {
        let mut payload = report_json(&report);
        payload["width"] = json!(metadata.width);
        payload["height"] = json!(metadata.height);
        payload["codec"] = json!(metadata.codec);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_report(&report);
        println!("  {}x{} [{}]", metadata.width, metadata.height, metadata.codec);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        None => run_extract(&cli.global, ExtractArgs::interactive())?,
        Some(Commands::Extract(args)) => run_extract(&cli.global, args)?,
        Some(Commands::Probe { input, every, json }) => run_probe(&input, every, json)?,
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framesnap", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NothingPicked;

    impl Picker for NothingPicked {
        fn pick_video_file(&mut self) -> Result<Option<PathBuf>, SamplerError> {
            Ok(None)
        }

        fn pick_directory(&mut self) -> Result<Option<PathBuf>, SamplerError> {
            Ok(None)
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_is_interactive() {
        let cli = Cli::try_parse_from(["framesnap"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.global.log_level, "error");
    }

    #[test]
    fn extract_defaults() {
        let cli = Cli::try_parse_from(["framesnap", "extract", "clip.mp4"]).unwrap();
        let Some(Commands::Extract(args)) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.input, Some(PathBuf::from("clip.mp4")));
        assert_eq!(args.out, None);
        assert_eq!(args.every, 30);
        assert_eq!(args.format, "jpg");
        assert_eq!(args.quality, 95);
        assert_eq!(args.prefix, "frame_");
    }

    #[test]
    fn preset_answers_win_over_prompts() {
        let mut picker = PresetPicker {
            video: Some(PathBuf::from("clip.mp4")),
            output: Some(PathBuf::from("out")),
            fallback: NothingPicked,
            notices: Vec::new(),
        };
        assert_eq!(
            picker.pick_video_file().unwrap(),
            Some(PathBuf::from("clip.mp4"))
        );
        assert_eq!(picker.pick_directory().unwrap(), Some(PathBuf::from("out")));
        assert!(picker.notices.is_empty());
    }

    #[test]
    fn prompt_notices_bypass_stdout() {
        let mut picker = PresetPicker {
            video: None,
            output: None,
            fallback: NothingPicked,
            notices: Vec::new(),
        };
        assert_eq!(picker.pick_video_file().unwrap(), None);
        assert_eq!(picker.pick_directory().unwrap(), None);

        let notices = String::from_utf8(picker.notices).unwrap();
        assert!(notices.contains("Select the video to extract frames from..."));
        assert!(notices.contains("Select the folder to save the frames in..."));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut args = ExtractArgs::interactive();
        args.every = 0;
        let reporter = Arc::new(TerminalReporter::new(false, true, false).unwrap());
        assert!(sampler_options(&args, reporter, false).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let mut args = ExtractArgs::interactive();
        args.format = "webp".to_string();
        let reporter = Arc::new(TerminalReporter::new(false, true, false).unwrap());
        assert!(sampler_options(&args, reporter, false).is_err());
    }
}
