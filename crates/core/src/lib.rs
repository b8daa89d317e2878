//! iscli Core Library
//!
//! This crate provides the core functionality for iscli, a toolkit for building
//! interactive command shells in the style of network-device consoles. Commands
//! are declared with a compact grammar, compiled into a prefix tree, and
//! resolved from abbreviated input.
//!
//! # Key Features
//!
//! - **Command Grammar**: Literals, typed arguments, ranges, alternations and permutations
//! - **Prefix Matching**: Any unambiguous prefix of a keyword selects it
//! - **Contextual Help**: Trailing `?` lists what may come next
//! - **Nested Shells**: Handlers can enter named sub-shells with their own commands
//! - **History and Configuration**: YAML settings and a persistent command history
//! - **Error Handling**: Comprehensive error types for all failure modes
//!
//! # Examples
//!
//! Registering a command and dispatching an abbreviated line:
//!
//! ```
//! use std::io::Write;
//! use iscli_core::command_set::CommandOptions;
//! use iscli_core::handler::Outcome;
//! use iscli_core::shell::Shell;
//!
//! let mut shell = Shell::new("router> ");
//! shell.register(
//!     |inv| {
//!         let host = inv.word(0).unwrap_or("?").to_string();
//!         let count = inv.integer(2).unwrap_or(4);
//!         writeln!(inv.out, "pinging {host} x{count}")?;
//!         Ok(Outcome::Continue)
//!     },
//!     "ping HOST (count <1-100>|)",
//!     &["Send echo messages", "Destination host", "Repeat count", "Number of messages"],
//!     CommandOptions::default(),
//! )?;
//!
//! let mut out = Vec::new();
//! shell.dispatch("pi example.org", &mut out)?;
//! assert_eq!(String::from_utf8_lossy(&out), "pinging example.org x4\n");
//! # Ok::<(), iscli_core::error::Error>(())
//! ```

pub mod command_set;
pub mod config;
pub mod converter;
pub mod editor;
pub mod element;
pub mod error;
pub mod expand;
pub mod grammar;
pub mod handler;
pub mod history;
pub mod node;
pub mod shell;
