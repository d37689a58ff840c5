//! CLI tool to flatten descriptor tables into delimited records.
//!
//! Usage:
//!   desc-extract                     stdin  -> stdout
//!   desc-extract <output>            stdin  -> output file
//!   desc-extract <input> <output>    input  -> output file
//!
//! Output files are truncated or created. Diagnostics go to stderr only.

use clap::{CommandFactory, Parser};
use desc_extract::{
    DEFAULT_DELIMITER, ExtractError, ExtractOptions, ExtractSummary, TrailingPolicy,
    extract_to_writer, extract_traced, read_line_lossy, render,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Flatten asn_TYPE_descriptor_t tables into one delimited line each.
///
/// Tables are separated by `--` lines (as printed by `grep -A`).
#[derive(Parser)]
#[command(name = "desc-extract")]
struct Cli {
    /// `[OUTPUT]` or `[INPUT] [OUTPUT]`; with no paths, stdin to stdout
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Field delimiter
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,

    /// Emit a table still open at end of input instead of dropping it
    #[arg(long)]
    emit_partial: bool,

    /// Show paths and record counts on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print how every input line was classified on stderr
    #[arg(long)]
    trace: bool,
}

/// Where input comes from and output goes, selected by path count.
#[derive(Clone, Copy)]
enum Mode<'a> {
    Pipe,
    ToFile(&'a Path),
    FileToFile(&'a Path, &'a Path),
}

impl<'a> Mode<'a> {
    fn from_paths(paths: &'a [PathBuf]) -> Option<Self> {
        match paths {
            [] => Some(Mode::Pipe),
            [output] => Some(Mode::ToFile(output)),
            [input, output] => Some(Mode::FileToFile(input, output)),
            _ => None,
        }
    }

    fn input_name(self) -> String {
        match self {
            Mode::FileToFile(input, _) => input.display().to_string(),
            Mode::Pipe | Mode::ToFile(_) => "(stdin)".to_string(),
        }
    }

    fn output_name(self) -> String {
        match self {
            Mode::ToFile(output) | Mode::FileToFile(_, output) => output.display().to_string(),
            Mode::Pipe => "(stdout)".to_string(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(mode) = Mode::from_paths(&cli.paths) else {
        println!("{}", Cli::command().render_usage());
        println!(
            "Expected at most 2 paths ([INPUT] OUTPUT), got {}",
            cli.paths.len()
        );
        process::exit(2);
    };

    let options = ExtractOptions {
        delimiter: cli.delimiter,
        trailing: if cli.emit_partial {
            TrailingPolicy::EmitPartial
        } else {
            TrailingPolicy::Drop
        },
    };

    if let Err(e) = run(&cli, mode, options) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, mode: Mode<'_>, options: ExtractOptions) -> Result<(), ExtractError> {
    if cli.verbose {
        eprintln!("Input:    {}", mode.input_name());
        eprintln!("Output:   {}", mode.output_name());
    }

    // Open input before creating output: a bad input path must not truncate
    // the output file.
    let input: Box<dyn BufRead> = match mode {
        Mode::FileToFile(path, _) => open_input(path)?,
        Mode::Pipe | Mode::ToFile(_) => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match mode {
        Mode::ToFile(path) | Mode::FileToFile(_, path) => create_output(path)?,
        Mode::Pipe => Box::new(io::stdout().lock()),
    };
    let mut output = BufWriter::new(output);

    let summary = if cli.trace {
        run_traced(input, &mut output, options)?
    } else {
        extract_to_writer(input, &mut output, options)?
    };

    if cli.verbose {
        eprintln!("Lines:    {} -> {} records", summary.lines, summary.records);
    }
    Ok(())
}

/// Buffer the whole input, extract with a trace, and print the trace.
fn run_traced<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    options: ExtractOptions,
) -> Result<ExtractSummary, ExtractError> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    while let Some(line) = read_line_lossy(&mut input, &mut buf).map_err(ExtractError::Read)? {
        lines.push(line);
    }

    let (records, trace) = extract_traced(&lines, options);
    eprint!("{trace}");

    output
        .write_all(render(&records, options.delimiter).as_bytes())
        .map_err(ExtractError::Write)?;
    output.flush().map_err(ExtractError::Write)?;

    Ok(ExtractSummary {
        lines: lines.len(),
        records: records.len(),
    })
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>, ExtractError> {
    let file = File::open(path).map_err(|e| ExtractError::open(path, e))?;
    Ok(Box::new(BufReader::new(file)))
}

fn create_output(path: &Path) -> Result<Box<dyn Write>, ExtractError> {
    let file = File::create(path).map_err(|e| ExtractError::open(path, e))?;
    Ok(Box::new(file))
}
