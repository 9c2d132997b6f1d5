//! UPM CLI - Main entry point

use clap::Parser;
use std::process;
use tracing::error;
use upm_cli::commands::{self, map::MapArgs, orthologs::OrthologArgs, search::SearchArgs};
use upm_cli::{config, Cli, Commands};
use upm_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let Some(command) = cli.command else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    // Verbose: debug to console; otherwise warnings only
    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Console)
        .log_file_prefix("upm")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok();

    let result = execute_command(command, cli.verbose, cli.api_url, cli.config).await;

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn execute_command(
    command: Commands,
    verbose: bool,
    api_url: Option<String>,
    config_file: Option<std::path::PathBuf>,
) -> upm_cli::Result<()> {
    match command {
        Commands::Map {
            from,
            to,
            ids,
            input,
            fields,
            batch_size,
            concurrency,
            output,
            overwrite,
            format,
        } => {
            let config = config::resolve(config_file.as_deref(), api_url.as_deref())?;
            let args = MapArgs {
                from,
                to,
                ids,
                input,
                fields,
                batch_size,
                concurrency,
                output,
                overwrite,
                format,
            };
            commands::map::run(args, config, verbose).await
        }

        Commands::Search {
            query,
            filters,
            any,
            fields,
            limit,
            isoforms,
            format,
            output,
            overwrite,
            dry_run,
        } => {
            let config = config::resolve(config_file.as_deref(), api_url.as_deref())?;
            let args = SearchArgs {
                query,
                filters,
                any,
                fields,
                limit,
                isoforms,
                format,
                output,
                overwrite,
                dry_run,
            };
            commands::search::run(args, config, verbose).await
        }

        Commands::Orthologs {
            ids,
            input,
            organisms,
            case_sensitive,
            fields,
            batch_size,
            output,
            overwrite,
            format,
        } => {
            let config = config::resolve(config_file.as_deref(), api_url.as_deref())?;
            let args = OrthologArgs {
                ids,
                input,
                organisms,
                case_sensitive,
                fields,
                batch_size,
                output,
                overwrite,
                format,
            };
            commands::orthologs::run(args, config, verbose).await
        }

        Commands::Fields { category } => commands::fields::run(category).await,

        Commands::Databases => commands::databases::run().await,
    }
}
