//! iscli CLI Library
//!
//! This crate provides the command-line front end for iscli: a router-style
//! console built on `iscli-core`, with an interactive raw-mode line editor.
//!
//! # Key Features
//!
//! - **Interactive Editing**: Tab completion, inline `?` help and history navigation
//! - **Nested Modes**: Exec, privileged and configuration shells
//! - **Scripting**: Commands piped on stdin run without the interactive editor
//! - **Persistent History**: Saved between sessions unless disabled
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`terminal`]: The crossterm line editor
//! - [`demo`]: The console's command hierarchy
//!
//! # Examples
//!
//! ```bash
//! # Interactive console
//! iscli
//!
//! # Override the prompt's host name and keep history out of the default file
//! iscli --hostname core-sw1 --history-path /tmp/iscli-history
//!
//! # Run a script
//! printf 'enable\nshow system\n' | iscli --no-history
//! ```

pub mod cli_args;
pub mod demo;
pub mod terminal;
