use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use subspaces::{fmt, parse};

#[derive(Parser, Debug)]
#[command(version, about = "Exact subspace report for a matrix read from a text file")]
struct Args {
    /// Path to the matrix file: whitespace-separated integer or `p/q`
    /// entries, one row per line.
    #[arg(default_value = "matrix.txt")]
    path: PathBuf,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    if let Err(err) = run(&args) {
        eprintln!("error: {err:?}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let start = Instant::now();

    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read matrix file `{}`", args.path.display()))?;
    let matrix = parse::parse_matrix(&text)
        .with_context(|| format!("failed to parse `{}`", args.path.display()))?;
    log::debug!(
        "parsed a {}x{} matrix",
        matrix.len(),
        matrix.first().map_or(0, Vec::len)
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    fmt::write_report(&mut out, &matrix)?;
    writeln!(out, "PROGRAM ENDED IN {:.5} sec.", start.elapsed().as_secs_f64())?;
    Ok(())
}
