use super::args::{Cli, Commands, ConfigCommand};
use super::handlers;
use super::logging;
use anyhow::{Context, Result};
use gdbmi_runtime::Config;
use gdbmi_runtime::config::resolve_config_path;

pub fn run(cli: Cli) -> Result<()> {
    let config_path = resolve_config_path(cli.config.as_deref())?;
    let config = Config::load_from(&config_path)
        .with_context(|| format!("cannot load config {}", config_path.display()))?;

    logging::init(cli.log_level, config.log_file.as_deref())?;

    match cli.command {
        Commands::Parse { file, skip_errors } => {
            handlers::parse::handle(file.as_deref(), skip_errors)
        }
        Commands::Serve => handlers::serve::handle(config),
        Commands::Config { command } => match command {
            ConfigCommand::Show => handlers::config::show(&config),
            ConfigCommand::Init { force } => handlers::config::init(&config_path, force),
        },
    }
}
