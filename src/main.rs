//! Grove CLI - nested task lists with undo.

use clap::Parser;
use grove::action_log::{self, ActionEntry};
use grove::cli::{Cli, Commands, HistoryCommands, SystemCommands};
use grove::commands::{self, Output};
use grove::config::{GroveConfig, OutputFormat};
use grove::storage;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();

    // Config problems degrade to defaults; startup never blocks on them
    let (config, config_warning) = GroveConfig::load();
    if let Some(warning) = config_warning {
        eprintln!("Warning: {warning}");
    }

    let human = matches!(
        config.resolve_output(cli.human_readable),
        OutputFormat::Human
    );

    // Determine list: --list flag > GV_LIST env > config default_list > "inbox"
    let list = config.resolve_list(cli.list);

    // Determine data dir: GV_DATA_DIR env > platform data directory
    let data_dir = resolve_data_dir(human);

    // Serialize command for logging
    let (cmd_name, args) = describe_command(&cli.command);

    // Start timing
    let start = Instant::now();

    // Execute command
    let result = run_command(cli.command, &data_dir, &list, human);

    // Calculate duration
    let duration = start.elapsed();

    // Determine success/error
    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    // Log the invocation; a failed log write warns but never fails the command
    if config.action_log_enabled() {
        let entry = ActionEntry::new(&list, &cmd_name, &args, success, error, duration);
        if let Err(err) = action_log::record(&data_dir, &entry) {
            eprintln!("Warning: could not write action log: {err}");
        }
    }

    // Handle result
    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!(r#"{{"error": "{}"}}"#, e);
        }
        process::exit(1);
    }
}

/// Resolve the data directory or exit with the usual error shape.
fn resolve_data_dir(human: bool) -> PathBuf {
    match storage::data_dir() {
        Ok(dir) => dir,
        Err(e) => {
            if human {
                eprintln!("Error: {}", e);
            } else {
                eprintln!(r#"{{"error": "{}"}}"#, e);
            }
            process::exit(1);
        }
    }
}

fn run_command(
    command: Option<Commands>,
    data_dir: &Path,
    list: &str,
    human: bool,
) -> Result<(), grove::Error> {
    match command {
        Some(Commands::Add { label, under }) => {
            let result = commands::add(data_dir, list, &label, under.as_deref())?;
            output(&result, human);
        }

        Some(Commands::List { under }) => {
            let result = commands::list(data_dir, list, under.as_deref())?;
            output(&result, human);
        }

        Some(Commands::Show { id }) => {
            let result = commands::show(data_dir, list, &id)?;
            output(&result, human);
        }

        Some(Commands::Rename { id, label }) => {
            let result = commands::rename(data_dir, list, &id, &label)?;
            output(&result, human);
        }

        Some(Commands::Toggle { id }) => {
            let result = commands::toggle(data_dir, list, &id)?;
            output(&result, human);
        }

        Some(Commands::Delete { id }) => {
            let result = commands::delete(data_dir, list, &id)?;
            output(&result, human);
        }

        Some(Commands::Move { id, to }) => {
            let result = commands::move_task(data_dir, list, &id, to.as_deref())?;
            output(&result, human);
        }

        Some(Commands::Path { id }) => {
            let result = commands::path(data_dir, list, &id)?;
            output(&result, human);
        }

        Some(Commands::Undo) => {
            let result = commands::undo(data_dir, list)?;
            output(&result, human);
        }

        Some(Commands::Redo) => {
            let result = commands::redo(data_dir, list)?;
            output(&result, human);
        }

        Some(Commands::History { command }) => match command {
            Some(HistoryCommands::Clear) => {
                let result = commands::history_clear(data_dir, list)?;
                output(&result, human);
            }
            None => {
                let result = commands::history(data_dir, list)?;
                output(&result, human);
            }
        },

        Some(Commands::System { command }) => match command {
            SystemCommands::Info => {
                let result = commands::system_info(data_dir, list)?;
                output(&result, human);
            }
        },

        None => {
            // Default: show the current list
            let result = commands::list(data_dir, list, None)?;
            output(&result, human);
        }
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Extract the subcommand name and its arguments for the action log.
fn describe_command(command: &Option<Commands>) -> (String, Vec<String>) {
    match command {
        Some(Commands::Add { label, under }) => {
            let mut args = vec![label.clone()];
            args.extend(under.clone());
            ("add".to_string(), args)
        }
        Some(Commands::List { under }) => {
            let mut args = Vec::new();
            args.extend(under.clone());
            ("list".to_string(), args)
        }
        Some(Commands::Show { id }) => ("show".to_string(), vec![id.clone()]),
        Some(Commands::Rename { id, label }) => {
            ("rename".to_string(), vec![id.clone(), label.clone()])
        }
        Some(Commands::Toggle { id }) => ("toggle".to_string(), vec![id.clone()]),
        Some(Commands::Delete { id }) => ("delete".to_string(), vec![id.clone()]),
        Some(Commands::Move { id, to }) => {
            let mut args = vec![id.clone()];
            args.extend(to.clone());
            ("move".to_string(), args)
        }
        Some(Commands::Path { id }) => ("path".to_string(), vec![id.clone()]),
        Some(Commands::Undo) => ("undo".to_string(), Vec::new()),
        Some(Commands::Redo) => ("redo".to_string(), Vec::new()),
        Some(Commands::History { command }) => match command {
            Some(HistoryCommands::Clear) => ("history clear".to_string(), Vec::new()),
            None => ("history".to_string(), Vec::new()),
        },
        Some(Commands::System { command }) => match command {
            SystemCommands::Info => ("system info".to_string(), Vec::new()),
        },
        None => ("list".to_string(), Vec::new()),
    }
}
