//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the `clap`
//! crate, and how the flags override values read from the configuration file.

use clap::Parser;
use iscli_core::config::ShellConfig;

/// Command-line arguments for the iscli console.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use iscli_cli::cli_args::Args;
///
/// let args = Args::parse_from(["iscli", "--hostname", "core-sw1"]);
/// assert_eq!(args.hostname.as_deref(), Some("core-sw1"));
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the configuration file YAML.
    ///
    /// If not provided, defaults to `~/.iscli/config.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    /// Name shown in the prompt, overriding the configuration file.
    #[arg(long)]
    pub hostname: Option<String>,

    /// Path to the file that stores the command history.
    ///
    /// If not provided, defaults to `~/.iscli/history`.
    #[arg(long, short = 'l')]
    pub history_path: Option<String>,

    /// Do not write the command history back when the session ends.
    #[arg(long, action)]
    pub no_history: bool,
}

impl Args {
    /// Applies the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut ShellConfig) {
        if let Some(hostname) = &self.hostname {
            config.hostname.clone_from(hostname);
        }
        if let Some(history_path) = &self.history_path {
            config.history_path.clone_from(history_path);
        }
        if self.no_history {
            config.save_history = false;
        }
    }
}
