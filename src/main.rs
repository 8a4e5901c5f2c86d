use clap::Parser;
use color_eyre::Result;
use remindme::cli::{self, Cli, Commands};
use remindme::terminal::{self, KeyTester};
use remindme::{Config, Profile, logging};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();
    let log_level = logging::init();

    // --dev keeps config in a separate directory
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match &cli.config {
        Some(path) => Config::load_from_path(&remindme::utils::expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };

    log_level.apply(&config.log_level);

    match cli.command.unwrap_or(Commands::Keys) {
        Commands::Keys => {
            let tester = KeyTester::from_config(&config)?;
            terminal::run_key_tester(tester)?;
        }
        Commands::Shortcuts => {
            for line in cli::handle_shortcuts(&config)? {
                println!("{}", line);
            }
        }
        Commands::Describe { expression, strict } => {
            println!("{}", cli::handle_describe(&expression, strict)?);
        }
    }

    Ok(())
}
