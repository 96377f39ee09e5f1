// src/main.rs

use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use mskeys::config::{get_config, MskeysConfig};
use mskeys::errors::KeyResult;
use mskeys::output::{format_output, write_output, write_report, OutputFormat, NO_KEYS_MESSAGE};
use mskeys::registry::RegistrySource;
use mskeys::source::{
    collect_records, try_collect_records, BlobFileSource, HexSource, KeySource,
};

/// Recover Windows and Office product keys from DigitalProductId values.
#[derive(Parser, Debug)]
#[command(name = "mskeys", version, about)]
struct Args {
    /// Write output to text file
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Quiet mode (only keys)
    #[arg(short, long)]
    quiet: bool,

    /// Report format: text or json
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Decode a raw DigitalProductId blob saved to a file (repeatable)
    #[arg(long, value_name = "FILE")]
    blob: Vec<PathBuf>,

    /// Decode a hex-encoded DigitalProductId blob (repeatable)
    #[arg(long, value_name = "HEX")]
    hex: Vec<String>,

    /// Read configuration from this file instead of mskeys.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Exit without waiting for Enter
    #[arg(long)]
    no_wait: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(path: Option<&Path>) -> KeyResult<Cow<'static, MskeysConfig>> {
    match path {
        Some(path) => MskeysConfig::load_from(Some(path)).map(Cow::Owned),
        None => get_config().map(Cow::Borrowed),
    }
}

fn init_logging(config: &MskeysConfig, verbose: bool) {
    if !verbose && !config.logging.enabled {
        return;
    }

    let level = if verbose {
        LevelFilter::Debug
    } else {
        config.logging.level.parse().unwrap_or(LevelFilter::Info)
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn wait_for_user(enabled: bool) {
    if !enabled {
        return;
    }
    print!("\nPress Enter to exit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

fn run(args: &Args, config: &MskeysConfig) -> KeyResult<()> {
    let format: OutputFormat = args
        .format
        .as_deref()
        .unwrap_or(config.output.format.as_str())
        .parse()?;
    let quiet = args.quiet || config.output.quiet;

    let blobs = BlobFileSource::new(args.blob.clone());
    let hex = HexSource::new(args.hex.clone());
    let registry = RegistrySource::new(&config.scan);

    // Explicit inputs must all be readable; registry paths are best effort.
    let records = if args.blob.is_empty() && args.hex.is_empty() {
        collect_records(&[&registry as &dyn KeySource])
    } else {
        let mut sources: Vec<&dyn KeySource> = Vec::new();
        if !args.blob.is_empty() {
            sources.push(&blobs);
        }
        if !args.hex.is_empty() {
            sources.push(&hex);
        }
        try_collect_records(&sources)?
    };

    if records.is_empty() {
        print!("{NO_KEYS_MESSAGE}");
        return Ok(());
    }

    let output = format_output(&records, format, quiet)?;

    match &args.out {
        Some(path) => {
            write_output(path, &output)?;
            println!("Successfully wrote output to {}", path.display());
        }
        None => write_report(&mut io::stdout().lock(), &output)?,
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            println!("Error loading configuration: {e}");
            wait_for_user(!args.no_wait);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config, args.verbose);
    let wait = config.output.wait_for_enter && !args.no_wait;

    let status = match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    };

    wait_for_user(wait);
    status
}
