use clap::Parser;
use colored::Colorize;

use jsfold::cli;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    cli::init_logging(cli.verbose, cli.quiet);

    if let Err(err) = cli::run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
