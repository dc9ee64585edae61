//! svg-augment CLI
//!
//! Usage:
//!   svg-augment [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>     Transform configuration (TOML format)
//!   -n, --count <N>         Number of augmented variants to print
//!       --seed <N>          Seed for parameter sampling
//!       --noise-seed <N>    Seed for the coherent noise generator
//!       --check             Report validity and unclosed tags
//!       --repair            Print the repaired markup
//!       --normalize         Print the normalized markup
//!       --pretty            Indent augmented output
//!   -h, --help              Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use svg_augment::{
    find_unclosed_tags, normalize, path_diagnostics, repair, NormalizeOptions, SvgTransforms,
    TransformConfig,
};

#[derive(Parser)]
#[command(name = "svg-augment")]
#[command(about = "Randomized geometric and color augmentation for SVG paths")]
struct Cli {
    /// Input SVG file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Transform configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of augmented variants to print, one per line
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Seed for parameter sampling (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Seed for the coherent noise generator (random if omitted)
    #[arg(long)]
    noise_seed: Option<u32>,

    /// Report whether the markup parses and list unclosed tags
    #[arg(long)]
    check: bool,

    /// Print the repaired markup (placeholder if repair fails)
    #[arg(long)]
    repair: bool,

    /// Print the normalized markup
    #[arg(long)]
    normalize: bool,

    /// Target width in pixels for --normalize
    #[arg(long, requires = "height")]
    width: Option<f64>,

    /// Target height in pixels for --normalize
    #[arg(long, requires = "width")]
    height: Option<f64>,

    /// Write augmented output with one element per line
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // If no input file and stdin is a terminal (interactive), show usage
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return ExitCode::SUCCESS;
    }

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    if cli.check {
        let filename = cli
            .input
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdin>".to_string());
        return check(&source, &filename);
    }

    if cli.repair {
        let repaired = repair(&source);
        eprintln!("repair stage: {:?}", repaired.stage);
        println!("{}", repaired.svg);
        return ExitCode::SUCCESS;
    }

    if cli.normalize {
        let options = NormalizeOptions {
            width: cli.width,
            height: cli.height,
        };
        return match normalize(&source, &options) {
            Ok(svg) => {
                println!("{}", svg);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match &cli.config {
        Some(path) => match TransformConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => TransformConfig::default(),
    };

    let mut transforms = match cli.noise_seed {
        Some(seed) => SvgTransforms::with_noise_seed(config, seed),
        None => SvgTransforms::new(config),
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for _ in 0..cli.count {
        let svg = if cli.pretty {
            transforms.augment_text_pretty(&source, &mut rng)
        } else {
            transforms.augment_text(&source, &mut rng)
        };
        println!("{}", svg);
    }
    ExitCode::SUCCESS
}

fn check(source: &str, filename: &str) -> ExitCode {
    let valid = match path_diagnostics(source) {
        Ok(diagnostics) => {
            for diagnostic in &diagnostics {
                eprintln!("{}: <path> #{}", filename, diagnostic.index);
                eprint!("{}", diagnostic.report());
            }
            diagnostics.is_empty()
        }
        Err(e) => {
            eprintln!("{}: {}", filename, e);
            false
        }
    };
    println!("valid: {}", valid);

    let unclosed = find_unclosed_tags(source);
    if !unclosed.is_empty() {
        println!("unclosed tags: {}", unclosed.join(", "));
    }

    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_intro() {
    println!(
        r##"svg-augment - Randomized augmentation for SVG paths

USAGE:
    svg-augment [OPTIONS] [FILE]
    cat drawing.svg | svg-augment -c transforms.toml

OPTIONS:
    -c, --config <FILE>    Transform configuration (TOML)
    -n, --count <N>        Number of variants to print
    --seed <N>             Seed for parameter sampling
    --noise-seed <N>       Seed for the noise generator
    --check                Report validity and unclosed tags
    --repair               Print repaired markup
    --normalize            Print normalized markup (--width/--height to force size)
    --pretty               Indent augmented output
    -h, --help             Print help

CONFIG:
    p = 0.5                      Probability each transform fires per path
    rotate = {{ from = -10, to = 10 }}
    shift_re = {{ from = -5, to = 5 }}
    shift_im = {{ from = -5, to = 5 }}
    scale = {{ from = 0.9, to = 1.1 }}
    noise_std = {{ from = 0.1, to = 0.3 }}
    color_change = true
    colors = ["#ff0000", "#0000ff"]"##
    );
}
