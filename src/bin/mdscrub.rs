//! CLI binary for mdscrub.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ScrubConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mdscrub::pipeline::input::{self, InputSource};
use mdscrub::{
    sanitize_batch, sanitize_file, sanitize_str, sanitize_to_file, write_atomic,
    BatchProgressCallback, ProgressCallback, ScrubConfig, ScrubStats,
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per file.
/// Files may complete out of order.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<String, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Cleaning");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self, input: &str) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(input))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Cleaning {total_files} files…"))
        ));
    }

    fn on_file_start(&self, input: &str) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(input.to_string(), Instant::now());
        }
        self.bar.set_message(input.to_string());
    }

    fn on_file_complete(&self, input: &str, output_bytes: usize) {
        let secs = self.elapsed_secs(input);
        self.bar.println(format!(
            "  {} {}  {}  {}",
            green("✓"),
            input,
            dim(&format!("{output_bytes:>7} bytes")),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, input: &str, error: &str) {
        let secs = self.elapsed_secs(input);
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Keep one line per file.
        let first_line = error.lines().next().unwrap_or(error);
        self.bar.println(format!(
            "  {} {}  {}  {}",
            red("✗"),
            input,
            red(first_line),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files cleaned",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files cleaned  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Clean one file (writes paper_cleaned.md next to it)
  mdscrub paper.md

  # Explicit output path
  mdscrub paper.md -o clean/paper.md

  # Pipe through stdin/stdout
  cat corpus.md | mdscrub - > corpus_clean.md

  # Every *.md in a directory, outputs collected elsewhere
  mdscrub corpus/ --output-dir cleaned/

  # Only strip sections, keep citation brackets
  mdscrub --no-clean-citations paper.md

  # Custom section table
  mdscrub -s references appendix "author contributions" -- paper.md

  # Per-file statistics as JSON
  mdscrub --json corpus/

DEFAULT SECTIONS:
  acknowledgements, acknowledgments, references, bibliography,
  works cited, citations  (case-insensitive, heading prefix match)

ENVIRONMENT VARIABLES:
  MDSCRUB_SECTIONS        Comma-separated section table (same as -s)
  MDSCRUB_OUTPUT_DIR      Default --output-dir
  MDSCRUB_CONCURRENCY     Default --concurrency
  RUST_LOG                Override log filter (e.g. mdscrub=debug)
"#;

/// Strip citation brackets, OCR image tags, and reference sections from Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "mdscrub",
    version,
    about = "Strip citation brackets, OCR image tags, and reference sections from Markdown",
    long_about = "Clean OCR-produced Markdown: remove citation brackets such as [12] or \
[Smith 2020] while keeping bracketed math, drop ![img-N.jpeg](img-N.jpeg) tags, and cut \
References / Acknowledgments style sections in ATX, setext, and YAML front-matter form.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown files, directories of *.md files, or `-` for stdin.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write the cleaned Markdown to this file (single input only).
    #[arg(short, long, env = "MDSCRUB_OUTPUT")]
    output: Option<PathBuf>,

    /// Directory for cleaned files when processing several inputs.
    #[arg(long, env = "MDSCRUB_OUTPUT_DIR", conflicts_with = "output")]
    output_dir: Option<PathBuf>,

    /// Print cleaned Markdown to stdout instead of writing files.
    #[arg(long, conflicts_with_all = ["output", "output_dir", "json"])]
    stdout: bool,

    /// Suffix for derived output names (paper.md → paper<SUFFIX>.md).
    #[arg(long, env = "MDSCRUB_SUFFIX", default_value = mdscrub::config::DEFAULT_OUTPUT_SUFFIX)]
    suffix: String,

    /// Section names to remove (replaces the default table).
    #[arg(short, long, num_args = 1.., env = "MDSCRUB_SECTIONS", value_delimiter = ',')]
    sections: Option<Vec<String>>,

    /// Keep citation brackets and image tags.
    #[arg(long, env = "MDSCRUB_NO_CLEAN_CITATIONS")]
    no_clean_citations: bool,

    /// Do not remove any sections.
    #[arg(long, env = "MDSCRUB_SKIP_SECTIONS")]
    skip_sections: bool,

    /// Number of files cleaned concurrently.
    #[arg(short, long, env = "MDSCRUB_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Output per-file statistics as JSON.
    #[arg(long, env = "MDSCRUB_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "MDSCRUB_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MDSCRUB_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MDSCRUB_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.stdout;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let sources = input::resolve_inputs(&cli.inputs, Some(cli.suffix.as_str()))
        .context("Failed to resolve inputs")?;

    // ── stdin mode ───────────────────────────────────────────────────────
    if sources.contains(&InputSource::Stdin) {
        check_stdin_flags(&cli, sources.len())?;
        let config = build_config(&cli, None)?;
        let text = InputSource::Stdin.read().await.context("Failed to read stdin")?;
        let output = sanitize_str(&text, &config);
        match cli.output {
            Some(ref path) => write_atomic(path, output.markdown)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => write_stdout(&output.markdown)?,
        }
        return Ok(());
    }

    let files: Vec<PathBuf> = sources
        .into_iter()
        .filter_map(|s| match s {
            InputSource::File(p) => Some(p),
            InputSource::Stdin => None,
        })
        .collect();

    // ── stdout mode ──────────────────────────────────────────────────────
    if cli.stdout {
        let config = build_config(&cli, None)?;
        for path in &files {
            let output = sanitize_file(path, &config)
                .await
                .with_context(|| format!("Failed to clean {}", path.display()))?;
            write_stdout(&output.markdown)?;
        }
        return Ok(());
    }

    // ── single file, explicit output ─────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        if files.len() != 1 {
            bail!(
                "--output takes a single input ({} given); use --output-dir instead",
                files.len()
            );
        }
        let config = build_config(&cli, None)?;
        let stats = sanitize_to_file(&files[0], output_path, &config)
            .await
            .context("Cleaning failed")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
            );
        } else if !cli.quiet {
            print_summary(&stats, output_path);
        }
        return Ok(());
    }

    // ── batch ────────────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;
    let batch = sanitize_batch(files, &config).await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&batch).context("Failed to serialise output")?
        );
    } else if !cli.quiet {
        if !show_progress {
            for file in &batch.files {
                match (&file.output, &file.stats, &file.error) {
                    (Some(out), Some(stats), None) => print_summary(stats, out),
                    (_, _, Some(err)) => eprintln!("{} {}", red("✗"), err),
                    _ => {}
                }
            }
        }
        let totals = &batch.totals;
        eprintln!(
            "   {} citations  /  {} images  /  {} sections removed  in  {}ms",
            dim(&totals.report.citations_removed.to_string()),
            dim(&totals.report.images_removed.to_string()),
            dim(&totals.report.sections_removed().to_string()),
            totals.duration_ms,
        );
    }

    batch.into_result().context("Some files could not be cleaned")?;
    Ok(())
}

/// Reject flags that have no meaning when reading from stdin.
fn check_stdin_flags(cli: &Cli, input_count: usize) -> Result<()> {
    if input_count > 1 {
        bail!("`-` (stdin) cannot be combined with other inputs");
    }
    if cli.json {
        bail!("--json is not supported with `-` (stdin); the cleaned text goes to stdout");
    }
    if cli.output_dir.is_some() {
        bail!("--output-dir is not supported with `-` (stdin); use --output <FILE>");
    }
    Ok(())
}

/// Map CLI args to `ScrubConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ScrubConfig> {
    let mut builder = ScrubConfig::builder()
        .clean_citations(!cli.no_clean_citations)
        .skip_section_removal(cli.skip_sections)
        .concurrency(cli.concurrency)
        .output_suffix(cli.suffix.clone());

    if let Some(ref names) = cli.sections {
        builder = builder.sections(names.iter().cloned());
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(stats: &ScrubStats, output_path: &std::path::Path) {
    eprintln!(
        "{}  {} → {} bytes  {}ms  →  {}",
        green("✔"),
        stats.input_bytes,
        stats.output_bytes,
        stats.duration_ms,
        bold(&output_path.display().to_string()),
    );
    eprintln!(
        "   {} citations  /  {} images  /  {} sections removed",
        dim(&stats.report.citations_removed.to_string()),
        dim(&stats.report.images_removed.to_string()),
        dim(&stats.report.sections_removed().to_string()),
    );
}

fn write_stdout(markdown: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(markdown.as_bytes())
        .context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")
}
