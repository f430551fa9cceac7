//! Headless emulator runner
//!
//! Feeds a byte stream from a file or stdin through the emulator and
//! prints the resulting viewport snapshot. Useful for eyeballing escape
//! handling and for generating deterministic golden outputs.
//!
//! # Usage
//!
//! ```bash
//! printf 'Hello \x1b[31mRed\x1b[0m' | termgrid-headless --text
//! termgrid-headless --input session.bin --output snapshot.json
//! ```

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use termgrid::{Emulator, HistoryPolicy, Style};

/// Command-line arguments
struct Args {
    /// Input file (stdin if not specified)
    input: Option<PathBuf>,
    /// Output file (stdout if not specified)
    output: Option<PathBuf>,
    /// Output as text instead of JSON
    text: bool,
    /// Viewport columns
    cols: usize,
    /// Viewport rows
    rows: usize,
    /// History row limit (0 = unbounded)
    history: usize,
    /// Show help
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            text: false,
            cols: 80,
            rows: 24,
            history: 0,
            help: false,
        }
    }
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => {
                args.help = true;
            }
            "-i" | "--input" => {
                i += 1;
                if i < argv.len() {
                    args.input = Some(PathBuf::from(&argv[i]));
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i < argv.len() {
                    args.output = Some(PathBuf::from(&argv[i]));
                }
            }
            "-t" | "--text" => {
                args.text = true;
            }
            "-c" | "--cols" => {
                i += 1;
                if i < argv.len() {
                    args.cols = argv[i].parse().unwrap_or(80);
                }
            }
            "-r" | "--rows" => {
                i += 1;
                if i < argv.len() {
                    args.rows = argv[i].parse().unwrap_or(24);
                }
            }
            "-H" | "--history" => {
                i += 1;
                if i < argv.len() {
                    args.history = argv[i].parse().unwrap_or(0);
                }
            }
            _ => {}
        }
        i += 1;
    }

    args
}

fn print_help() {
    eprintln!(
        r#"termgrid-headless - run the emulator over a byte stream

USAGE:
    termgrid-headless [OPTIONS]

OPTIONS:
    -h, --help              Show this help message
    -i, --input <FILE>      Input file (stdin if not specified)
    -o, --output <FILE>     Output file (stdout if not specified)
    -t, --text              Output as plain text instead of JSON
    -c, --cols <N>          Viewport columns (default: 80)
    -r, --rows <N>          Viewport rows (default: 24)
    -H, --history <N>       History row limit, 0 = unbounded (default: 0)

EXAMPLES:
    printf 'Hello \x1b[31mRed\x1b[0m' | termgrid-headless -t
    termgrid-headless -c 120 -r 40 -i session.bin -o snapshot.json
"#
    );
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = parse_args();

    if args.help {
        print_help();
        return Ok(());
    }

    let input_data = if let Some(path) = &args.input {
        std::fs::read(path)?
    } else {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        data
    };

    let history = match std::num::NonZeroUsize::new(args.history) {
        Some(n) => HistoryPolicy::bounded(n),
        None => HistoryPolicy::unbounded(),
    };
    let emulator = Emulator::new(args.cols, args.rows, Style::default(), history);
    emulator.write(&input_data);

    let snapshot = emulator.snapshot();
    let output_data = if args.text {
        snapshot.to_text()
    } else {
        snapshot
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    };

    if let Some(path) = &args.output {
        let mut file = File::create(path)?;
        file.write_all(output_data.as_bytes())?;
    } else {
        io::stdout().write_all(output_data.as_bytes())?;
        println!();
    }

    Ok(())
}
