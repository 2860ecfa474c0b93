//! Square-1 scramble generator CLI
//!
//! Usage:
//!   sq1-scramble [OPTIONS]
//!
//! Options:
//!   -t, --top <LAYER>         Top layer placeholders (default RRRRRRRRRRRR)
//!   -b, --bottom <LAYER>      Bottom layer placeholders (default RRRRRRRRRRRR)
//!   -c, --config <FILE>       Scramble profile (TOML format)
//!   -p, --parity <MODE>...    Acceptable parity modes
//!   -e, --equator <CHAR>...   Divider characters to choose from
//!   -s, --seed <N>            Seed for reproducible output
//!   -n, --count <N>           Number of scrambles to generate
//!   -v, --verbose             Print the choices behind each state
//!       --check               Print the parity of each state
//!   -h, --help                Print help

use std::path::PathBuf;

use clap::Parser;

use square1_scrambler::{generate_batch, GeneratorConfig, ParityMode, Scramble, ScrambleState};

#[derive(Parser)]
#[command(name = "sq1-scramble")]
#[command(about = "Generate Square-1 scramble states from layer placeholders")]
struct Cli {
    /// Top layer placeholders
    #[arg(short, long)]
    top: Option<String>,

    /// Bottom layer placeholders
    #[arg(short, long)]
    bottom: Option<String>,

    /// Scramble profile (TOML format). Flags given on the command line win.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Acceptable parity modes (tnbn, tpbn, tnbp, tpbp, on, op)
    #[arg(short, long, num_args = 1..)]
    parity: Vec<ParityMode>,

    /// Divider characters to choose the equator from
    #[arg(short, long, num_args = 1..)]
    equator: Vec<char>,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of scrambles to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Print the choices behind each state as TOML
    #[arg(short, long)]
    verbose: bool,

    /// Print the parity classification of each state
    #[arg(long)]
    check: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match GeneratorConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading profile '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => GeneratorConfig::default(),
    };

    if let Some(top) = cli.top {
        config.top_layer = top;
    }
    if let Some(bottom) = cli.bottom {
        config.bottom_layer = bottom;
    }
    if !cli.parity.is_empty() {
        config.parity = cli.parity;
    }
    if !cli.equator.is_empty() {
        config.middle_layer = cli.equator;
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::debug!("generating {} scramble(s) with seed {}", cli.count, seed);

    match generate_batch(&config, cli.count, seed) {
        Ok(scrambles) => {
            for scramble in &scrambles {
                print_scramble(scramble, cli.verbose, cli.check);
            }
        }
        Err(e) => {
            eprintln!("{}", e.format(&config.top_layer, &config.bottom_layer));
            std::process::exit(1);
        }
    }
}

fn print_scramble(scramble: &Scramble, verbose: bool, check: bool) {
    if verbose {
        match toml::to_string(scramble) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error formatting scramble: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", scramble.state);
    }

    if check {
        match ScrambleState::parse(&scramble.base_state) {
            Ok(state) => {
                let report = state.parity();
                let modes: Vec<&str> = report.modes().into_iter().map(|m| m.name()).collect();
                println!(
                    "# top {}, bottom {}, overall {} ({})",
                    evenness(report.top_odd),
                    evenness(report.bottom_odd),
                    evenness(report.overall_odd),
                    modes.join(", ")
                );
            }
            Err(e) => eprintln!("Error checking state: {}", e),
        }
    }
}

fn evenness(odd: bool) -> &'static str {
    if odd {
        "odd"
    } else {
        "even"
    }
}
