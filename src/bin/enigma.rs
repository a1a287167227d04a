//! Enigma simulator CLI
//!
//! Reads a machine configuration, then converts the messages of an input
//! stream, writing one line of five-symbol groups per message line.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use enigma::Session;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "enigma")]
#[command(about = "Encrypt and decrypt messages with a simulated rotor machine")]
#[command(version)]
struct Cli {
    /// Machine configuration file
    config: PathBuf,

    /// Message file (defaults to standard input)
    input: Option<PathBuf>,

    /// Output file (defaults to standard output)
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = fs::read_to_string(&cli.config)
        .with_context(|| format!("could not open {}", cli.config.display()))?;
    let mut session = Session::from_config(&config)
        .with_context(|| format!("bad configuration in {}", cli.config.display()))?;

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for line in input.lines() {
        let line = line.context("could not read input")?;
        if let Some(converted) = session.process_line(&line)? {
            writeln!(output, "{}", converted)?;
        }
    }
    output.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
