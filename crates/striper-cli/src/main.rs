//! striper - stripe fills from the command line
//!
//! Usage:
//!   striper render <recipe>          Render a YAML/JSON stripe recipe
//!   striper fill <svg> [options]     Stripe every polygon in an SVG
//!   striper example                  Print an example recipe
//!   striper help                     Show usage
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `striper=info`).

use std::env;

mod cli;

use cli::{CliError, cmd_example, cmd_fill, cmd_render};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "striper=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("striper");

    let Some(command) = args.get(1) else {
        print_usage(prog);
        std::process::exit(1);
    };

    let result = match command.as_str() {
        "render" => cmd_render(&args[2..]),
        "fill" => cmd_fill(&args[2..]),
        "example" => cmd_example(),
        "help" | "--help" | "-h" => {
            print_usage(prog);
            Ok(())
        }
        other => Err(CliError::Usage(format!("unknown command: {}", other))),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!("striper - stripe fills clipped to 2D shapes");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} render <recipe> [-o out] [-f svg|json]", prog);
    eprintln!("  {} fill <svg> [-s spacing] [-a angle] [--phase p] [-o out] [-f svg|json]", prog);
    eprintln!("  {} example", prog);
    eprintln!("  {} help", prog);
    eprintln!();
    eprintln!("Run '{} render --help' or '{} fill --help' for command options.", prog, prog);
    eprintln!();
    eprintln!("Stdin support:");
    eprintln!("  Use '-' as the SVG path to read from stdin:");
    eprintln!("  cat art.svg | {} fill - -s 3", prog);
}
