use std::io::Read;

use colored::Colorize;
use polyrecon::{
    points::PointSet,
    printer::ReconstructionPrinter,
    reconstruct::{reconstruct, SearchSettings},
    ReconstructionError, VERSION,
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "Usage: polyrecon [--parallel] [FILE]

Reads a JSON record of base-encoded points from FILE, or from stdin if no
FILE is given, and prints the coefficients of the polynomial through them
in ascending powers.

Options:
    --parallel   evaluate candidate subsets on all cores
    --version    print the version
    -h, --help   print this message

Environment:
    POLYRECON_LOG          log filter, e.g. `debug`
    POLYRECON_PARALLEL     `1` to enable parallel search
    POLYRECON_BATCH_SIZE   subsets per parallel batch";

enum Command {
    Run {
        path: Option<String>,
        settings: SearchSettings,
    },
    Help,
    Version,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Command, ReconstructionError> {
    let mut settings = SearchSettings::from_env();
    let mut path = None;

    for a in args {
        match a.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--version" => return Ok(Command::Version),
            "--parallel" => settings.parallel = true,
            _ if a.starts_with('-') && a != "-" => {
                return Err(ReconstructionError::malformed(format!(
                    "unknown option {}",
                    a
                )))
            }
            _ if path.is_some() => {
                return Err(ReconstructionError::malformed("more than one input file"))
            }
            _ => path = Some(a.clone()),
        }
    }

    Ok(Command::Run { path, settings })
}

fn run(path: Option<String>, settings: &SearchSettings) -> Result<String, ReconstructionError> {
    let input = match path.as_deref() {
        Some(p) if p != "-" => std::fs::read_to_string(p)?,
        _ => {
            let mut s = String::new();
            std::io::stdin().read_to_string(&mut s)?;
            s
        }
    };

    let set = PointSet::from_json_str(&input)?;
    let r = reconstruct(&set, settings)?;

    debug!(
        "Subset {:?}; {} of {} points lie on the polynomial",
        r.labels(&set),
        r.count_agreeing(&set),
        set.points.len()
    );

    Ok(ReconstructionPrinter::new(&r).to_string())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("POLYRECON_LOG"))
        .init();

    let result = parse_args(std::env::args().skip(1)).and_then(|c| match c {
        Command::Help => Ok(USAGE.to_owned()),
        Command::Version => Ok(format!("polyrecon {}", VERSION)),
        Command::Run { path, settings } => run(path, &settings),
    });

    match result {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(e.exit_code());
        }
    }
}
