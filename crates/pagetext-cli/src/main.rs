use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pagetext_core::config_file;
use pagetext_core::{ExtractionStats, Extractor, ProgressEvent};
use tracing_subscriber::EnvFilter;

mod output;
mod settings;

use output::{ColorMode, StreamColors};
use settings::{EnvOverrides, FlagOverrides, Settings};

/// Extract the text of every page of a PDF into a plain text file
#[derive(Parser, Debug)]
#[command(name = "pagetext", version, about, long_about = None)]
struct Cli {
    /// PDF file to read
    #[arg(default_value = settings::DEFAULT_SOURCE)]
    source: PathBuf,

    /// Text file to write (default: SOURCE with a .txt extension)
    dest: Option<PathBuf>,

    /// Text extraction backend
    #[arg(long, value_enum)]
    backend: Option<settings::BackendKind>,

    /// Print the extracted text to stdout instead of writing a file
    #[arg(long, conflicts_with = "dest")]
    stdout: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Read settings from this config file instead of the default locations
    #[arg(long)]
    config: Option<PathBuf>,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Converted,
    /// The failure was already reported to the user.
    Failed,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Converted => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::FAILURE,
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let config = match cli.config {
        Some(ref path) => config_file::read_config(path)?,
        None => config_file::load_config(),
    };
    let flags = FlagOverrides {
        backend: cli.backend,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };
    let settings = settings::resolve(&flags, &EnvOverrides::from_env(), &config)?;

    let source = cli.source;
    let dest = cli.dest.unwrap_or_else(|| settings::default_dest(&source));

    // Status lines go to stderr when stdout carries the extracted text
    let mut status: Box<dyn Write> = if cli.stdout {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };
    let colors = StreamColors::detect(
        settings.color,
        cli.stdout,
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
    );

    let backend = settings.backend.build();
    let extractor = Extractor::new(backend.as_ref());
    tracing::info!(
        backend = extractor.backend_name(),
        source = %source.display(),
        "starting extraction"
    );

    let result = if cli.stdout {
        extract_to_stdout(&extractor, &source, &settings, &mut status, colors)
    } else {
        extract_to_file(&extractor, &source, &dest, &settings, &mut status, colors)
    };

    let Some(stats) = result? else {
        return Ok(Outcome::Failed);
    };
    if !settings.quiet {
        if cli.stdout {
            output::print_stdout_summary(&mut status, &stats, colors.status)?;
        } else {
            output::print_success(&mut status, &dest, &stats, colors.status)?;
        }
    }
    Ok(Outcome::Converted)
}

/// Run the extraction writing to `dest`. `Ok(None)` means the failure was
/// already reported to the user.
fn extract_to_file(
    extractor: &Extractor<'_>,
    source: &Path,
    dest: &Path,
    settings: &Settings,
    status: &mut Box<dyn Write>,
    colors: StreamColors,
) -> anyhow::Result<Option<ExtractionStats>> {
    let bar = page_bar(settings.quiet);
    let mut status_err = None;
    let result = extractor.extract_with_progress(source, dest, |event| {
        if let Err(e) = on_progress(&event, &bar, settings, status, colors.status) {
            status_err.get_or_insert(e);
        }
    });
    bar.finish_and_clear();

    match result {
        Ok(stats) => match status_err {
            Some(e) => Err(e.into()),
            None => Ok(Some(stats)),
        },
        Err(e) => {
            output::print_failure(&mut std::io::stderr(), &e, colors.error)?;
            Ok(None)
        }
    }
}

fn extract_to_stdout(
    extractor: &Extractor<'_>,
    source: &Path,
    settings: &Settings,
    status: &mut Box<dyn Write>,
    colors: StreamColors,
) -> anyhow::Result<Option<ExtractionStats>> {
    let bar = page_bar(settings.quiet);
    let mut status_err = None;
    let result = extractor.extract_text_with_progress(source, &mut |event| {
        if let Err(e) = on_progress(&event, &bar, settings, status, colors.status) {
            status_err.get_or_insert(e);
        }
    });
    bar.finish_and_clear();

    let extracted = match result {
        Ok(extracted) => extracted,
        Err(e) => {
            output::print_failure(&mut std::io::stderr(), &e, colors.error)?;
            return Ok(None);
        }
    };
    if let Some(e) = status_err {
        return Err(e.into());
    }

    let rendered = extracted.render();
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;

    Ok(Some(ExtractionStats::for_rendered(
        extracted.page_count(),
        &rendered,
    )))
}

fn page_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::with_template("{spinner:.green} page {pos}/{len} [{bar:40.green/dim}]")
        .map(|s| s.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

fn on_progress(
    event: &ProgressEvent,
    bar: &ProgressBar,
    settings: &Settings,
    status: &mut Box<dyn Write>,
    color: ColorMode,
) -> std::io::Result<()> {
    match event {
        ProgressEvent::Opened { pages } => {
            bar.set_length(*pages as u64);
            if !settings.quiet {
                bar.suspend(|| {
                    output::print_page_count(status.as_mut(), *pages, color)?;
                    status.flush()
                })?;
            }
        }
        ProgressEvent::Page { index, .. } => {
            bar.set_position(*index as u64 + 1);
        }
        ProgressEvent::Written { .. } => {
            bar.finish_and_clear();
        }
    }
    Ok(())
}
