mod cli;
mod commands;
mod util;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run { template, state, output, policy } => {
            commands::run::run(commands::run::RunArgs { template, state, output, policy });
        }
        Command::Keys { template, include_optional, policy } => {
            commands::keys::run(commands::keys::KeysArgs { template, include_optional, policy });
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .with_target(false)
        .init();
}
