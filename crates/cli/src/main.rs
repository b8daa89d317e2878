use std::io::{stdin, stdout, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, warn};

use iscli_cli::cli_args::Args;
use iscli_cli::demo;
use iscli_cli::terminal::TerminalEditor;
use iscli_core::config::{self, ShellConfig};
use iscli_core::editor::ReaderEditor;
use iscli_core::error::Result;
use iscli_core::history::History;
use iscli_core::shell::Shell;

/// Load the configuration file, then apply command-line overrides
fn initialize_config(args: &Args) -> Result<ShellConfig> {
    let config_path = config::get_config_path(args.config_path.as_deref());
    let mut shell_config = config::load_config(&config_path)?;
    args.apply(&mut shell_config);

    debug!("Using configuration {shell_config:?}");
    Ok(shell_config)
}

fn run_interactive(shell_config: &ShellConfig, shell: &mut Shell) -> Result<()> {
    let history_path = shell_config.expanded_history_path();
    let history = History::load(&history_path, shell_config.history_max_len)?;

    let mut editor = TerminalEditor::new(history);
    let result = shell.run(&mut editor, &mut stdout());

    if shell_config.save_history {
        if let Err(e) = editor.history().save(&history_path) {
            warn!("Could not save history: {e}");
        }
    }

    result
}

fn execute() -> Result<()> {
    let args = Args::parse();
    let shell_config = initialize_config(&args)?;

    let state = demo::new_state(&shell_config.hostname);
    let mut shell = demo::build(&state)?;

    if stdin().is_terminal() {
        run_interactive(&shell_config, &mut shell)
    } else {
        let mut editor = ReaderEditor::new(stdin().lock());
        shell.run(&mut editor, &mut stdout())
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
