//! Command-line interface entry point for `acadanalytics`

mod args;
mod commands;

use academic_analytics::config::Config;
use academic_analytics::info;
use academic_analytics::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use args::{Cli, Command};
use clap::Parser;
use commands::analyze::AnalyzeOptions;

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag wins over config logging.level; fall back to warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    let config_log_path = (!config.logging.file.is_empty())
        .then(|| std::path::PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Analyze {
            input_files,
            user,
            format,
            output,
            save,
            project,
        } => {
            let options = AnalyzeOptions {
                input_files,
                user,
                format: format.into(),
                output,
                save,
                project,
            };
            commands::analyze::run(&options, &config);
        }
        Command::Trend {
            input_file,
            points,
            project,
            method,
        } => {
            commands::trend::run(&input_file, &points, project, method.into(), &config);
        }
    }
}
