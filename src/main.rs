use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use docket::cli::args::{Cli, Commands, ConfigCommands};
use docket::cli::commands;
use docket::config::{Config, Paths};
use docket::error::DocketError;
use docket::features::shell::{completion_install_instructions, generate_completions};

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        if e.is_recoverable() {
            eprintln!("{}", "Run 'docket retry' once the database is available.".dimmed());
        }
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `DOCKET_LOG` (default: warnings only).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("DOCKET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<(), DocketError> {
    let cli = Cli::parse();
    let paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)?;
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match cli.command {
        Commands::Start { subject } => {
            let mut ctx = commands::open_context(&paths, &config)?;
            commands::start(&mut ctx, &subject, format)?
        }
        Commands::Pause => {
            let mut ctx = commands::open_context(&paths, &config)?;
            commands::pause(&mut ctx, format)?
        }
        Commands::Resume => {
            let mut ctx = commands::open_context(&paths, &config)?;
            commands::resume(&mut ctx, format)?
        }
        Commands::Stop {
            note,
            non_billable,
            billable,
        } => {
            let billable = if non_billable {
                Some(false)
            } else {
                billable.then_some(true)
            };
            let mut ctx = commands::open_context(&paths, &config)?;
            commands::stop(&mut ctx, note, billable, format)?
        }
        Commands::Status { watch: true } => commands::watch(&paths, &config, format)?,
        Commands::Status { watch: false } => {
            let ctx = commands::open_context(&paths, &config)?;
            commands::status(&ctx, format)?
        }
        Commands::Log {
            subject,
            limit,
            unsaved,
        } => {
            let ctx = commands::open_context(&paths, &config)?;
            commands::log(&ctx, subject.as_deref(), limit, unsaved, format)?
        }
        Commands::Retry => {
            let mut ctx = commands::open_context(&paths, &config)?;
            commands::retry(&mut ctx, format)?
        }
        Commands::Discard { force } => {
            let mut ctx = commands::open_context(&paths, &config)?;
            commands::discard(&mut ctx, force, format)?
        }
        Commands::Config { command } => {
            commands::config(&paths, &config, command.unwrap_or(ConfigCommands::Show), format)?
        }
        Commands::Completions { shell, install } => {
            if install {
                completion_install_instructions(shell).to_string()
            } else {
                generate_completions(shell)?
            }
        }
        Commands::Tui { subjects } => {
            docket::tui::run(&paths, &config, subjects)?;
            String::new()
        }
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
