//! A router-style console built on iscli.
//!
//! Three nested shells make up the hierarchy:
//!
//! ```text
//! exec     iscli>            enable, show version, ping, exit
//!  └─ enable   iscli#        show ..., sshfs, echo, configure terminal, disable
//!      └─ config iscli(config)#  hostname, interface, end
//! ```
//!
//! The commands act on a small shared [`DemoState`] rather than a real
//! device.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::rc::Rc;

use itertools::Itertools;
use log::info;

use iscli_core::command_set::{CommandOptions, CommandSet};
use iscli_core::converter::Value;
use iscli_core::error::{Error, Result};
use iscli_core::handler::{Invocation, Outcome};
use iscli_core::shell::Shell;

const ENABLE_MODE: &str = "enable";
const CONFIG_MODE: &str = "config";

const DESC_SHOW: &str = "Show running system information";
const DESC_EXIT: &str = "Exit from the current mode";

/// What the demo console pretends to be configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoState {
    pub hostname: String,
    /// Interface names, mapped to whether they are shut down.
    pub interfaces: BTreeMap<String, bool>,
}

pub type SharedState = Rc<RefCell<DemoState>>;

#[must_use]
pub fn new_state(hostname: &str) -> SharedState {
    Rc::new(RefCell::new(DemoState {
        hostname: hostname.to_string(),
        interfaces: BTreeMap::new(),
    }))
}

/// Builds the exec shell, with the privileged and configuration shells
/// nested below it.
///
/// # Errors
///
/// Returns an error if any command fails to load.
pub fn build(state: &SharedState) -> Result<Shell> {
    let hostname = state.borrow().hostname.clone();

    let mut config = Shell::new(&format!("{hostname}(config)# "));
    config.load(&config_commands(state))?;

    let mut enable = Shell::new(&format!("{hostname}# "));
    enable.load(&enable_commands(state))?;
    enable.add_mode(CONFIG_MODE, config);

    let mut exec = Shell::new(&format!("{hostname}> "));
    exec.load(&exec_commands())?;
    exec.add_mode(ENABLE_MODE, enable);

    info!("Demo console ready for `{hostname}`");
    Ok(exec)
}

fn leave(_: &mut Invocation<'_>) -> Result<Outcome> {
    Ok(Outcome::Exit)
}

fn show_version(inv: &mut Invocation<'_>) -> Result<Outcome> {
    writeln!(inv.out, "iscli version {}", env!("CARGO_PKG_VERSION"))?;
    Ok(Outcome::Continue)
}

fn exec_commands() -> CommandSet {
    let mut commands = CommandSet::new();
    commands
        .install(
            "enable",
            &["Turn on privileged commands"],
            |_| Ok(Outcome::Enter(ENABLE_MODE.to_string())),
        )
        .install("show version", &[DESC_SHOW, "Software version"], show_version)
        .install(
            "ping HOST (count <1-100>|)",
            &[
                "Send echo messages",
                "A.B.C.D, X:X::X:X or host name",
                "Number of echo messages",
                "Count",
            ],
            ping,
        )
        .install("exit", &[DESC_EXIT], leave);
    commands
}

fn ping(inv: &mut Invocation<'_>) -> Result<Outcome> {
    let host = inv.word(0).unwrap_or_default().to_string();
    let count = inv.integer(2).unwrap_or(5);

    writeln!(inv.out, "Sending {count} echo messages to {host}:")?;
    let replies = "!".repeat(usize::try_from(count).unwrap_or_default());
    writeln!(inv.out, "{replies}")?;
    writeln!(inv.out, "Success rate is 100 percent ({count}/{count})")?;
    Ok(Outcome::Continue)
}

fn enable_commands(state: &SharedState) -> CommandSet {
    let mut commands = CommandSet::new();

    let system = Rc::clone(state);
    let routes = Rc::clone(state);
    let dump = Rc::clone(state);

    commands
        .install("disable", &["Turn off privileged commands"], leave)
        .install(
            "show system",
            &[DESC_SHOW, "System properties"],
            move |inv| {
                let state = system.borrow();
                writeln!(inv.out, "System name: {}", state.hostname)?;
                writeln!(inv.out, "Interfaces:  {}", state.interfaces.len())?;
                Ok(Outcome::Continue)
            },
        )
        .install("show version", &[DESC_SHOW, "Software version"], show_version)
        .install(
            "show ip route",
            &[DESC_SHOW, "IP information", "Routing table"],
            move |inv| {
                let state = routes.borrow();
                for (name, shutdown) in &state.interfaces {
                    if !shutdown {
                        writeln!(inv.out, "C    directly connected, {name}")?;
                    }
                }
                Ok(Outcome::Continue)
            },
        )
        .add(
            move |inv| {
                writeln!(inv.out, "{:#?}", dump.borrow())?;
                Ok(Outcome::Continue)
            },
            "show tech-support",
            &[DESC_SHOW, "Everything, for support"],
            CommandOptions::hidden(),
        )
        .install(
            "sshfs HOSTNAME username USERNAME ({path PATH | port <1-65535>}|)",
            &[
                "Mount a remote file system",
                "A.B.C.D, X:X::X:X or host name",
                "SSH Username",
                "Username",
                "Remote path",
                "Path",
                "SSH Port",
                "Port",
            ],
            sshfs,
        )
        .install("echo .WORD", &["Echo the given words", "Word"], |inv| {
            writeln!(inv.out, "{}", inv.args.iter().join(" "))?;
            Ok(Outcome::Continue)
        })
        .install(
            "configure terminal",
            &["Enter configuration mode", "Configure from the terminal"],
            |_| Ok(Outcome::Enter(CONFIG_MODE.to_string())),
        )
        .install("exit", &[DESC_EXIT], leave);
    commands
}

fn sshfs(inv: &mut Invocation<'_>) -> Result<Outcome> {
    let host = inv.word(0).unwrap_or_default().to_string();
    let user = inv.word(1).unwrap_or_default().to_string();

    let mut path = "/".to_string();
    let mut port = 22;
    for (option, value) in inv.args.iter().skip(2).tuples() {
        match (option.as_str(), value) {
            (Some("path"), Value::Word(remote)) => path.clone_from(remote),
            (Some("port"), Value::Integer(number)) => port = *number,
            _ => {}
        }
    }

    if !path.starts_with('/') {
        return Err(Error::command(format!("Remote path must be absolute: {path}")));
    }

    writeln!(inv.out, "Mounting {user}@{host}:{path} on port {port}")?;
    Ok(Outcome::Continue)
}

fn config_commands(state: &SharedState) -> CommandSet {
    let mut commands = CommandSet::new();

    let names = Rc::clone(state);
    let interfaces = Rc::clone(state);

    commands
        .install("hostname NAME", &["Set system's network name", "Name"], move |inv| {
            let Some(name) = inv.word(0) else {
                return Err(Error::command("Missing host name"));
            };
            names.borrow_mut().hostname = name.to_string();
            Ok(Outcome::Continue)
        })
        .install(
            "interface IFNAME (shutdown|)",
            &["Select an interface", "Interface name", "Shut the interface down"],
            move |inv| {
                let name = inv.word(0).unwrap_or_default().to_string();
                let shutdown = inv.word(1) == Some("shutdown");
                interfaces.borrow_mut().interfaces.insert(name, shutdown);
                Ok(Outcome::Continue)
            },
        )
        .install("end", &["End configuration mode"], leave)
        .install("exit", &[DESC_EXIT], leave);
    commands
}
