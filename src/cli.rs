// Command-line front end for beamfile.
//
// Subcommands read BEAM files from disk, decode them and print what the
// decoder extracted. Errors go to stderr and produce exit status 1.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::beam::{self, ChunkTag, RECOGNIZED_TAGS};
use crate::io::{self as beam_io, LoadError, LoadedModule};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// BEAM bytecode module inspector.
#[derive(Parser, Debug)]
#[command(
    name = "beamfile",
    version,
    about = "Inspect compiled BEAM modules",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON on stdout.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode modules and print their atoms and code header.
    Inspect(InspectArgs),
    /// List the chunks of a module.
    Chunks(ChunksArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// BEAM files to decode.
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct ChunksArgs {
    /// BEAM file to list.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Inspect,
    Chunks,
    Config,
}

struct Options {
    command: Command,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    files: Vec<PathBuf>,
}

fn resolve_options(cli: Cli) -> Options {
    let (command, files) = match cli.command {
        Cmd::Inspect(args) => (Command::Inspect, args.files),
        Cmd::Chunks(args) => (Command::Chunks, vec![args.input]),
        Cmd::Config => (Command::Config, Vec::new()),
    };
    Options {
        command,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        files,
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("beamfile".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

fn log_filter(opts: &Options) -> &'static str {
    match (opts.quiet, opts.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config(opts: &Options) -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    let gzip = cfg!(feature = "gzip") as u8;
    let file_io = cfg!(feature = "file-io") as u8;
    let parallel = cfg!(feature = "parallel") as u8;
    let tags: Vec<&str> = RECOGNIZED_TAGS.iter().map(|t| t.as_str()).collect();

    if opts.json_output {
        let json = serde_json::json!({
            "version": version,
            "gzip": gzip == 1,
            "file_io": file_io == 1,
            "parallel": parallel == 1,
            "chunk_align": beam::CHUNK_ALIGN,
            "recognized_chunks": tags,
        });
        println!("{json:#}");
        return 0;
    }

    println!("beamfile version {version}");
    println!("GZIP={gzip}");
    println!("FILE_IO={file_io}");
    println!("PARALLEL={parallel}");
    println!("CHUNK_ALIGN={}", beam::CHUNK_ALIGN);
    println!("RECOGNIZED_CHUNKS={}", tags.join(","));

    0
}

// ---------------------------------------------------------------------------
// Inspect command
// ---------------------------------------------------------------------------

fn load_all(files: &[PathBuf]) -> Vec<Result<LoadedModule, LoadError>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        files
            .par_iter()
            .map(|p| beam_io::read_module_file(p))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        files.iter().map(|p| beam_io::read_module_file(p)).collect()
    }
}

fn inspect_json(path: &std::path::Path, loaded: &LoadedModule) -> serde_json::Value {
    let m = &loaded.module;
    serde_json::json!({
        "file": path.display().to_string(),
        "module": m.module_name(),
        "total_file_size": m.total_file_size,
        "atoms": m.atoms,
        "code_version": m.code_version,
        "max_opcode": m.max_opcode,
        "label_count": m.label_count,
        "function_count": m.function_count,
        "compressed": loaded.stats.compressed,
        "size_consistent": loaded.stats.size_consistent,
        "sha256": loaded.stats.sha256.map(|d| beam_io::hex_digest(&d)),
    })
}

fn print_inspect(path: &std::path::Path, loaded: &LoadedModule, opts: &Options) {
    let m = &loaded.module;
    if opts.files.len() > 1 {
        println!("{}:", path.display());
    }
    println!("File size:      {}", m.total_file_size);
    println!("Atoms:          {:?}", m.atoms);
    println!("Code version:   {}", m.code_version);
    println!("Max opcode:     {}", m.max_opcode);
    println!("Label count:    {}", m.label_count);
    println!("Function count: {}", m.function_count);

    if opts.verbose > 0 {
        if loaded.stats.compressed {
            println!(
                "Compressed:     {} -> {} bytes",
                loaded.stats.file_size, loaded.stats.decoded_size
            );
        }
        if let Some(digest) = loaded.stats.sha256 {
            println!("SHA-256:        {}", beam_io::hex_digest(&digest));
        }
    }
}

fn cmd_inspect(opts: &Options) -> i32 {
    let results = load_all(&opts.files);
    let mut status = 0;
    let mut json_out = Vec::new();

    for (i, (path, result)) in opts.files.iter().zip(results).enumerate() {
        match result {
            Ok(loaded) => {
                log::info!(
                    "{}: decoded {} atoms",
                    path.display(),
                    loaded.module.atoms.len()
                );
                if opts.json_output {
                    json_out.push(inspect_json(path, &loaded));
                } else if !opts.quiet {
                    if i > 0 {
                        println!();
                    }
                    print_inspect(path, &loaded, opts);
                }
            }
            Err(e) => {
                eprintln!("beamfile: {}: {e}", path.display());
                status = 1;
            }
        }
    }

    if opts.json_output {
        let value = match json_out.len() {
            1 if opts.files.len() == 1 => json_out.remove(0),
            _ => serde_json::Value::Array(json_out),
        };
        println!("{value:#}");
    }

    status
}

// ---------------------------------------------------------------------------
// Chunks command
// ---------------------------------------------------------------------------

fn describe(tag: ChunkTag) -> String {
    if tag.is_decoded() {
        tag.name().to_string()
    } else {
        format!("{} (skipped)", tag.name())
    }
}

fn cmd_chunks(opts: &Options) -> i32 {
    let Some(path) = opts.files.first() else {
        eprintln!("beamfile: chunks requires an input file");
        return 1;
    };

    let raw = match beam_io::read_module_bytes(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("beamfile: {}: {e}", path.display());
            return 1;
        }
    };

    let iter = match beam::chunks(&raw) {
        Ok(iter) => iter,
        Err(e) => {
            eprintln!("beamfile: {}: {e}", path.display());
            return 1;
        }
    };
    let envelope = iter.envelope();

    let mut rows = Vec::new();
    for item in iter {
        match item {
            Ok(header) => rows.push(header),
            Err(e) => {
                eprintln!("beamfile: {}: {e}", path.display());
                return 1;
            }
        }
    }

    if opts.json_output {
        let chunks: Vec<_> = rows
            .iter()
            .map(|h| {
                serde_json::json!({
                    "tag": h.tag.as_str(),
                    "name": h.tag.name(),
                    "offset": h.offset,
                    "len": h.len,
                    "decoded": h.tag.is_decoded(),
                })
            })
            .collect();
        let json = serde_json::json!({
            "file": path.display().to_string(),
            "total_file_size": envelope.total_file_size,
            "chunks": chunks,
        });
        println!("{json:#}");
        return 0;
    }

    if opts.quiet {
        return 0;
    }

    println!("BEAM file size:  {}", envelope.total_file_size);
    println!("Chunks:          {}", rows.len());
    for h in &rows {
        println!(
            "  {}  offset {:>8}  len {:>8}  {}",
            h.tag,
            h.offset,
            h.len,
            describe(h.tag)
        );
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&opts)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Inspect => cmd_inspect(&opts),
        Command::Chunks => cmd_chunks(&opts),
        Command::Config => cmd_config(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
