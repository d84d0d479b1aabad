use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use slidesift::{
    DocumentAssembler, ExtractionWarning, FfmpegLogLevel, FrameSource, MaskPosition,
    PageImageAssembler, PdfAssembler, ProgressCallback, ProgressInfo, SlideExtractor,
    SlideOptions, VideoFile,
    document::document_name,
    options::{DEFAULT_MASK_SIZE_PERCENT, DEFAULT_THRESHOLD},
};

const CLI_AFTER_HELP: &str = "Examples:\n  slidesift extract lecture.mp4 --out slides --progress\n  slidesift extract lecture.mp4 --out slides --interval 5 --threshold 8 --mask bottom-right\n  slidesift probe lecture.mp4 --json\n  slidesift completions zsh > _slidesift";

#[derive(Debug, Parser)]
#[command(
    name = "slidesift",
    version,
    about = "Extract the slides from a recorded lecture video",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar while sampling.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting an existing output document.
    #[arg(long, global = true)]
    overwrite: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sample a video and write the distinct slides as pages.
    #[command(
        about = "Extract slides from a video",
        after_help = "Examples:\n  slidesift extract lecture.mp4 --out slides\n  slidesift extract lecture.mp4 --out slides --mask none --name week3\n  slidesift extract lecture.mp4 --out slides --format pages"
    )]
    Extract {
        /// Input video path.
        input: PathBuf,
        /// Directory the document is written into.
        #[arg(long)]
        out: PathBuf,
        /// Seconds between samples.
        #[arg(long, default_value_t = 10.0)]
        interval: f64,
        /// Mean luminance difference (0-255) above which a sample is a new slide.
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,
        /// Presenter mask corner: bottom-left, bottom-right or none.
        #[arg(long, default_value = "bottom-left")]
        mask: String,
        /// Mask size as a percentage of frame width and height (10-50).
        #[arg(long, default_value_t = DEFAULT_MASK_SIZE_PERCENT)]
        mask_size: u32,
        /// Document name. Defaults to `<input stem>_slides`.
        #[arg(long)]
        name: Option<String>,
        /// Output document format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pdf)]
        format: OutputFormat,
    },

    /// Print video metadata and a validation report.
    #[command(
        about = "Print video metadata",
        visible_alias = "info",
        after_help = "Examples:\n  slidesift probe lecture.mp4\n  slidesift probe lecture.mp4 --json"
    )]
    Probe {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One PDF with a page per slide.
    Pdf,
    /// A directory of PNG pages plus a JSON manifest.
    Pages,
}

impl OutputFormat {
    /// The assembler for this format and the path it will write for `name`.
    fn assembler(self, out: &Path, name: &str) -> (Box<dyn DocumentAssembler>, PathBuf) {
        match self {
            OutputFormat::Pdf => {
                let assembler = PdfAssembler::new(out);
                let target = assembler.document_path(name);
                (Box::new(assembler), target)
            }
            OutputFormat::Pages => {
                let assembler = PageImageAssembler::new(out);
                let target = assembler.document_dir(name);
                (Box::new(assembler), target)
            }
        }
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn parse_interval(seconds: f64) -> Result<Duration, Box<dyn std::error::Error>> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("--interval must be a non-negative number of seconds, got {seconds}").into())
}

fn default_document_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    document_name(&stem)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(global.verbose);

    if let Some(level) = &global.log_level {
        let parsed: FfmpegLogLevel = level
            .parse()
            .map_err(|_| format!("unsupported --log-level: {level}"))?;
        slidesift::set_ffmpeg_log_level(parsed);
    }

    Ok(())
}

/// Feeds sampling progress into an indicatif bar.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.total_frames);
        self.bar.set_position(info.frame_number);
        self.bar.set_message(format!("{} slide(s)", info.retained));
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Extract {
            input,
            out,
            interval,
            threshold,
            mask,
            mask_size,
            name,
            format,
        } => {
            let mask_position: MaskPosition = mask.parse()?;
            let name = name.unwrap_or_else(|| default_document_name(&input));
            let (assembler, target) = format.assembler(&out, &name);
            ensure_writable_path(&target, cli.global.overwrite)?;

            let mut options = SlideOptions::new()
                .with_interval(parse_interval(interval)?)
                .with_threshold(threshold)
                .with_mask_position(mask_position)
                .with_mask_size_percent(mask_size);

            let progress = if cli.global.progress {
                let progress = Arc::new(TerminalProgress::new()?);
                options = options.with_progress(progress.clone());
                Some(progress)
            } else {
                None
            };

            let deck = SlideExtractor::new(options)?.extract(&input)?;
            if let Some(progress) = &progress {
                progress.bar.finish_and_clear();
            }

            for warning in &deck.warnings {
                if *warning != ExtractionWarning::EmptyResult {
                    eprintln!("{} {}", "warning:".yellow().bold(), warning.to_string().yellow());
                }
            }

            if deck.is_empty() {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    ExtractionWarning::EmptyResult.to_string().yellow()
                );
                return Ok(());
            }

            let written = assembler.assemble(&deck.slides, &name)?;
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "{} slide(s) from {} sample(s) written to {}",
                    deck.len(),
                    deck.samples_visited,
                    written.display()
                )
                .green()
            );
        }
        Commands::Probe { input, json } => {
            let video = VideoFile::open(&input)?;
            let metadata = video.metadata();
            let report = video.validate();
            if json {
                let payload = json!({
                    "path": input.display().to_string(),
                    "width": metadata.width,
                    "height": metadata.height,
                    "fps": metadata.frames_per_second,
                    "fps_defaulted": metadata.frame_rate_defaulted,
                    "frame_count": metadata.frame_count,
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "codec": metadata.codec,
                    "validation": {
                        "valid": report.is_valid(),
                        "info": report.info,
                        "warnings": report.warnings,
                        "errors": report.errors,
                    },
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Path: {}", input.display());
                println!(
                    "Video: {}x{} @ {:.2} fps [{}]",
                    metadata.width, metadata.height, metadata.frames_per_second, metadata.codec,
                );
                println!("Frames: {}", metadata.frame_count);
                println!("Duration: {:.2}s", metadata.duration.as_secs_f64());
                print!("{report}");
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "slidesift", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputFormat, default_document_name, parse_interval};
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn document_name_comes_from_file_stem() {
        assert_eq!(
            default_document_name(Path::new("/videos/Week 3 Intro.mp4")),
            "Week_3_Intro_slides"
        );
        assert_eq!(default_document_name(Path::new("")), "video_slides");
    }

    #[test]
    fn output_format_targets() {
        let (_, pdf) = OutputFormat::Pdf.assembler(Path::new("out"), "intro_slides");
        assert_eq!(pdf, Path::new("out/intro_slides.pdf"));

        let (_, pages) = OutputFormat::Pages.assembler(Path::new("out"), "intro_slides");
        assert_eq!(pages, Path::new("out/intro_slides"));
    }

    #[test]
    fn interval_rejects_negative_seconds() {
        assert_eq!(parse_interval(2.5).unwrap(), Duration::from_millis(2500));
        assert!(parse_interval(-1.0).is_err());
        assert!(parse_interval(f64::NAN).is_err());
    }
}
