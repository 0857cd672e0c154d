// src/main.rs

use anyhow::Result;
use clap::Parser;
use recipe_converter::ContextConfig;
use std::process::ExitCode;
use std::time::Duration;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::CommandStatus;

fn run(cli: Cli) -> Result<CommandStatus> {
    let mut config = ContextConfig {
        maven_metadata: cli.maven_metadata,
        ci: cli.ci,
        ..ContextConfig::with_root(cli.recipes_root)
    };

    match cli.command {
        Commands::Convert {
            source,
            source_all,
            destination,
            agp_version,
            mode,
            overwrite,
            gradle_version,
            repo_location,
            gradle_path,
        } => {
            config.repo_location = repo_location;
            config.gradle_path = gradle_path;
            commands::cmd_convert(
                config,
                source.as_deref(),
                source_all.as_deref(),
                &destination,
                agp_version.as_deref(),
                mode,
                overwrite,
                gradle_version.as_deref(),
            )
        }
        Commands::Validate {
            source,
            source_all,
            agp_version,
            mode,
            repo_location,
            gradle_path,
            java_home,
            android_home,
            tmp,
            timeout,
        } => {
            config.repo_location = repo_location;
            config.gradle_path = gradle_path;
            config.java_home = java_home;
            config.android_home = android_home;
            config.task_timeout = timeout.map(Duration::from_secs);
            commands::cmd_validate(
                config,
                source.as_deref(),
                source_all.as_deref(),
                agp_version.as_deref(),
                mode,
                tmp.as_deref(),
            )
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
