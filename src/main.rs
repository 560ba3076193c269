mod commands;

use clap::Parser;
use commands::{Cli, CliError};

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).with_writer(std::io::stderr).init();

    let output = commands::run(&cli)?;
    println!("{output}");
    Ok(())
}
