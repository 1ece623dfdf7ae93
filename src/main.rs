use clap::Parser;
use colored::Colorize;

mod cli;

fn main() {
    env_logger::init();

    let cli = cli::Cli::parse();
    if let Err(error) = cli::run(cli) {
        log::error!("export failed: {error:#}");
        eprintln!("{} {:#}", "Error:".red(), error);
        std::process::exit(1);
    }
}
