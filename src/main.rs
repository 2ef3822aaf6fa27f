use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use doc_check_code::{locate_documents, report, CheckConfig, OutputFormat, Runner, Verifier};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;
use std::time::Instant;

/// Verify the code examples embedded in markdown documentation.
///
/// Shell examples are run in a throwaway directory, Python examples are
/// syntax-checked and TOML examples are parsed. Other languages are accepted
/// as illustrations.
#[derive(Debug, Parser)]
#[command(name = "doc-check-code", version, about)]
struct Cli {
    /// Documentation files to verify (default: discover markdown files under --root)
    files: Vec<PathBuf>,

    /// Show per-example progress
    #[arg(short, long)]
    verbose: bool,

    /// Root directory of the project, used for discovery and doc-check.toml
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Configuration file (default: <root>/doc-check.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Examples verified concurrently per file; 0 means one per CPU
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => exit(0),
        Ok(false) => exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit(1);
        }
    }
}

/// Logs in mdBook's format: `timestamp [LEVEL] (crate): message`.
///
/// Warnings and errors are always shown; `--verbose` adds info. `RUST_LOG`
/// takes precedence over both.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let target = record.target().split("::").next().unwrap_or_default();
            writeln!(
                buf,
                "{} [{}] ({}): {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                target,
                record.args()
            )
        })
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = CheckConfig::load(cli.config.as_deref(), &cli.root)?;
    if let Some(jobs) = cli.jobs {
        config.jobs = jobs;
    }

    let documents = locate_documents(&cli.files, &cli.root, &config.discovery.patterns)?;
    if cli.format == OutputFormat::Text {
        println!("Verifying {} documentation file(s)...", documents.len());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let runner = Runner::new(Verifier::new(config));
    let start = Instant::now();
    let result = runtime.block_on(runner.run(&documents));

    let mut stdout = io::stdout().lock();
    report(&result, start.elapsed(), cli.format, &mut stdout)
}
