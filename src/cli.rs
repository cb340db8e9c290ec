// Command-line front-end for deltasig.
//
// A thin caller of the library: builds signatures and deltas for files and
// prints them, either one entry per line or as JSON.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::delta::{DeltaEntry, DeltaSource, compute_delta};
use crate::hash::config::{MAX_WINDOW_SIZE, MIN_CHUNK_COUNT, MIN_WINDOW_SIZE};
use crate::io::{delta_basis_file, delta_file, signature_file};
use crate::signature::{Signature, compute_signature_with_window_size};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of the demonstration buffer (bytes `0..=255`).
const DEMO_LEN: usize = 256;

/// Window size used by the demonstration.
const DEMO_WINDOW_SIZE: usize = 23;

// ---------------------------------------------------------------------------
// Byte size parsing (supports K, M suffixes)
// ---------------------------------------------------------------------------

fn parse_window_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".into());
    }
    let (num_part, multiplier) = match s.as_bytes().last() {
        Some(b'k' | b'K') => (&s[..s.len() - 1], 1024usize),
        Some(b'm' | b'M') => (&s[..s.len() - 1], 1024 * 1024),
        _ => (s, 1usize),
    };
    let num: usize = num_part
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    let size = num
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size overflow: '{s}'"))?;
    if size == 0 {
        return Err("window size must be positive".into());
    }
    Ok(size)
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Rolling-checksum signatures and rsync-style deltas.
#[derive(Parser, Debug)]
#[command(
    name = "deltasig",
    version,
    about = "Rolling-checksum signatures and rsync-style deltas",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (only errors are logged).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compute the signature of a basis file.
    Signature(SignatureArgs),
    /// Compute the delta of an update against a basis file.
    Delta(DeltaArgs),
    /// Delta of a 256-byte buffer against itself (window size 23).
    Demo,
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct SignatureArgs {
    /// Basis file.
    #[arg(value_hint = ValueHint::FilePath)]
    basis: PathBuf,

    /// Chunk size (supports K/M suffix). Chosen from the basis length if omitted.
    #[arg(long = "window-size", short = 'w', value_parser = parse_window_size)]
    window_size: Option<usize>,
}

#[derive(Args, Debug)]
struct DeltaArgs {
    /// Basis file.
    #[arg(long, short = 'b', value_hint = ValueHint::FilePath)]
    basis: PathBuf,

    /// Update file (default: stdin).
    #[arg(value_hint = ValueHint::FilePath)]
    update: Option<PathBuf>,

    /// Chunk size (supports K/M suffix). Chosen from the basis length if omitted.
    #[arg(long = "window-size", short = 'w', value_parser = parse_window_size)]
    window_size: Option<usize>,
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("deltasig".to_string())
        .chain(args.iter().cloned())
        .collect();
    let _ = Cli::try_parse_from(argv);
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn source_name(source: DeltaSource) -> &'static str {
    match source {
        DeltaSource::Basis => "basis",
        DeltaSource::Update => "update",
    }
}

fn entries_json(entries: &[DeltaEntry]) -> serde_json::Value {
    entries
        .iter()
        .map(|e| {
            serde_json::json!({
                "source": source_name(e.source),
                "start": e.start,
                "end": e.end,
            })
        })
        .collect()
}

fn print_json(value: &serde_json::Value) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => write_stdout(&text),
        Err(e) => {
            eprintln!("deltasig: json: {e}");
            1
        }
    }
}

fn write_stdout(text: &str) -> i32 {
    let mut out = io::stdout().lock();
    if let Err(e) = writeln!(out, "{text}") {
        eprintln!("deltasig: write error: {e}");
        return 1;
    }
    0
}

fn render_entries(entries: &[DeltaEntry]) -> String {
    entries
        .iter()
        .map(DeltaEntry::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Signature command
// ---------------------------------------------------------------------------

fn cmd_signature(args: &SignatureArgs, verbose: u8, json_output: bool) -> i32 {
    let sig = match signature_file(&args.basis, args.window_size) {
        Ok(sig) => sig,
        Err(e) => {
            eprintln!("deltasig: basis file: {}: {e}", args.basis.display());
            return 1;
        }
    };

    if json_output {
        let chunks: Vec<serde_json::Value> = sig
            .chunks()
            .iter()
            .map(|c| {
                serde_json::json!({
                    "weak_hash": c.weak_hash,
                    "strong_hash": hex(&c.strong_hash),
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "window_size": sig.window_size(),
            "chunk_count": sig.chunks().len(),
            "chunks": chunks,
        }));
    }

    write_stdout(&render_signature(&sig, verbose > 0))
}

fn render_signature(sig: &Signature, chunks: bool) -> String {
    let mut text = format!(
        "window size: {}\nchunks:      {}",
        sig.window_size(),
        sig.chunks().len()
    );
    if chunks {
        for (i, c) in sig.chunks().iter().enumerate() {
            text.push_str(&format!(
                "\n{i:6}  {:08x}  {}",
                c.weak_hash,
                hex(&c.strong_hash)
            ));
        }
    }
    text
}

// ---------------------------------------------------------------------------
// Delta command
// ---------------------------------------------------------------------------

fn cmd_delta(args: &DeltaArgs, json_output: bool) -> i32 {
    let report = match &args.update {
        Some(update) => delta_file(&args.basis, update, args.window_size),
        None => delta_basis_file(&args.basis, io::stdin().lock(), args.window_size),
    };
    let report = match report {
        Ok(r) => r,
        Err(e) => {
            eprintln!("deltasig: delta: {e}");
            return 1;
        }
    };

    log::info!(
        "delta: {} of {} bytes copied from basis, {} literal, {} entries",
        report.basis_bytes,
        report.update_size,
        report.literal_bytes,
        report.entries.len()
    );

    if json_output {
        return print_json(&serde_json::json!({
            "basis_size": report.basis_size,
            "update_size": report.update_size,
            "window_size": report.window_size,
            "basis_bytes": report.basis_bytes,
            "literal_bytes": report.literal_bytes,
            "entries": entries_json(&report.entries),
        }));
    }

    if report.entries.is_empty() {
        return 0;
    }
    write_stdout(&render_entries(&report.entries))
}

// ---------------------------------------------------------------------------
// Demo command
// ---------------------------------------------------------------------------

fn demo_entries() -> Vec<DeltaEntry> {
    let data: Vec<u8> = (0..DEMO_LEN).map(|i| i as u8).collect();
    match compute_signature_with_window_size(&data, DEMO_WINDOW_SIZE) {
        Ok(sig) => compute_delta(&sig, &data),
        Err(_) => Vec::new(),
    }
}

fn cmd_demo(json_output: bool) -> i32 {
    let entries = demo_entries();
    if json_output {
        return print_json(&entries_json(&entries));
    }
    let rendered: Vec<String> = entries.iter().map(DeltaEntry::to_string).collect();
    write_stdout(&format!("DELTA: [{}]", rendered.join(", ")))
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("deltasig version {version}");

    let adler32 = cfg!(feature = "adler32") as u8;
    let parallel = cfg!(feature = "parallel") as u8;

    eprintln!("ADLER32_SIMD={adler32}");
    eprintln!("PARALLEL={parallel}");
    eprintln!("MIN_WINDOW_SIZE={MIN_WINDOW_SIZE}");
    eprintln!("MAX_WINDOW_SIZE={MAX_WINDOW_SIZE}");
    eprintln!("MIN_CHUNK_COUNT={MIN_CHUNK_COUNT}");

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.quiet, cli.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    let exit_code = match &cli.command {
        Cmd::Signature(args) => cmd_signature(args, cli.verbose, cli.json_output),
        Cmd::Delta(args) => cmd_delta(args, cli.json_output),
        Cmd::Demo => cmd_demo(cli.json_output),
        Cmd::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
