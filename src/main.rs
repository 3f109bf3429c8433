use clap::Parser;
use fauxtick::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
