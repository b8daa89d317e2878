//! Integration tests for iscli-core
//!
//! These tests verify that the core functionality works together correctly
//! by driving complete shells end-to-end.

use iscli_core::{
    command_set::{CommandOptions, CommandSet},
    config::load_config,
    converter::Value,
    editor::ReaderEditor,
    error::{Error, Result},
    grammar::{compile, MAX_PERMUTATION_BRANCHES},
    handler::{Handler, Invocation, Outcome},
    node::Node,
    shell::Shell,
};
use std::cell::RefCell;
use std::io::{Cursor, Write};
use std::rc::Rc;
use tempfile::NamedTempFile;

const DESC_SHOW: &str = "Show running system information";
const DESC_SHOW_SYSTEM: &str = "System properties";

fn reply(text: &'static str) -> impl Fn(&mut Invocation<'_>) -> Result<Outcome> {
    move |inv| {
        writeln!(inv.out, "{text}")?;
        Ok(Outcome::Continue)
    }
}

/// The console used by most tests below.
fn console() -> Shell {
    let mut commands = CommandSet::new();
    commands
        .install("show system", &[DESC_SHOW, DESC_SHOW_SYSTEM], reply("System ok"))
        .install("show version", &[DESC_SHOW, "Software version"], reply("Version 1.0"))
        .install(
            "test range <1-10>",
            &["Test command", "Test range", "number"],
            reply("test range"),
        )
        .install(
            "test opt (bar|)",
            &["Test command", "Test optional", "Bar"],
            reply("test opt"),
        )
        .install(
            "test vararg .WORD",
            &["Test command", "Test vararg", "argument"],
            reply("test vararg"),
        )
        .install(
            "sshfs HOSTNAME username USERNAME ({path PATH | port <1-65535>}|)",
            &[
                "Manage ATMF feature",
                "A.B.C.D, X:X::X:X or host name",
                "SSH Username",
                "Username",
                "Remote path",
                "Path",
                "SSH Port",
                "Port",
            ],
            |inv| {
                writeln!(inv.out, "sshfs mount {:?}", inv.args)?;
                Ok(Outcome::Continue)
            },
        );

    let mut shell = Shell::new("> ");
    shell.load(&commands).unwrap();
    shell
}

fn command(shell: &Shell, line: &str) -> String {
    let mut out = Vec::new();
    shell.dispatch(line, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn describe(shell: &Shell, line: &str) -> String {
    let mut out = Vec::new();
    shell.describe(line, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_describe_top_level_and_prefixes() {
    let shell = console();

    let out = describe(&shell, "");
    assert!(out.contains("show"));
    assert!(out.contains(DESC_SHOW));
    assert!(!out.contains("version"));
    assert!(out.contains("Test command"));

    let out = describe(&shell, "s");
    assert!(out.contains("show"));
    assert!(out.contains("sshfs"));
    assert!(!out.contains("test"));

    let out = describe(&shell, "sh");
    assert!(out.contains("show"));
    assert!(!out.contains("sshfs"));

    let out = describe(&shell, "show ");
    assert!(out.contains("system"));
    assert!(out.contains("version"));
    assert!(!out.contains("<cr>"));

    let out = describe(&shell, "show s");
    assert!(out.contains("system"));
    assert!(!out.contains("version"));
    assert!(!out.contains("<cr>"));

    let out = describe(&shell, "show путь");
    assert!(!out.contains("<cr>"));
    assert!(out.contains("Unrecognized"));
}

#[test]
fn test_commands_accept_abbreviations() {
    let shell = console();

    for line in ["show system", "show sys", "sh sys", "  sh   sys  "] {
        assert_eq!(command(&shell, line), "System ok\n", "line `{line}`");
    }

    for line in ["show", "sh", "путь", "show system now"] {
        assert!(command(&shell, line).contains("Unrecognized"), "line `{line}`");
    }

    assert_eq!(command(&shell, "s"), "% Ambiguous command: \"s\"\n\n");
}

#[test]
fn test_range_argument() {
    let shell = console();

    assert!(command(&shell, "test range").contains("Unrecognized"));
    let out = describe(&shell, "test range ");
    assert!(out.contains("<1-10>"));
    assert!(out.contains("number"));
    assert!(!out.contains("<cr>"));

    for i in 1..=10 {
        assert_eq!(command(&shell, &format!("test range {i}")), "test range\n");
        assert!(describe(&shell, &format!("test range {i} ")).contains("<cr>"));
    }

    for i in [-123, -10, -5, -1, 0, 11, 123] {
        assert!(
            command(&shell, &format!("test range {i}")).contains("Unrecognized"),
            "value {i}"
        );
    }

    assert!(command(&shell, "test range 1 1").contains("Unrecognized"));
    assert!(command(&shell, "test range five").contains("Unrecognized"));
}

#[test]
fn test_optional_group() {
    let shell = console();

    assert_eq!(command(&shell, "test opt"), "test opt\n");
    let out = describe(&shell, "test opt ");
    assert!(out.contains("bar"));
    assert!(out.contains("<cr>"));

    assert_eq!(command(&shell, "test opt bar"), "test opt\n");
    assert!(describe(&shell, "test opt bar ").contains("<cr>"));

    assert!(command(&shell, "test opt foo").contains("Unrecognized"));
    assert!(describe(&shell, "test opt foo ").contains("Unrecognized"));
    assert!(command(&shell, "test opt bar foo").contains("Unrecognized"));
}

#[test]
fn test_vararg() {
    let shell = console();

    assert!(command(&shell, "test vararg").contains("Unrecognized"));
    assert!(describe(&shell, "test vararg ").contains("WORD"));

    for line in ["test vararg foo", "test vararg foo bar", "test vararg foo foo 6"] {
        assert_eq!(command(&shell, line), "test vararg\n", "line `{line}`");

        let out = describe(&shell, &format!("{line} "));
        assert!(out.contains("WORD"));
        assert!(out.contains("<cr>"));
    }
}

#[test]
fn test_permutation_arguments() {
    let shell = console();

    assert_eq!(
        command(&shell, "sshfs box username bob"),
        "sshfs mount [Word(\"box\"), Word(\"bob\")]\n"
    );
    assert_eq!(
        command(&shell, "sshfs box u bob po 2222 pa /srv"),
        "sshfs mount [Word(\"box\"), Word(\"bob\"), Word(\"port\"), Integer(2222), \
         Word(\"path\"), Word(\"/srv\")]\n"
    );
    assert!(command(&shell, "sshfs box u bob port 70000").contains("Unrecognized"));
    assert!(command(&shell, "sshfs box u bob port 22 port 22").contains("Unrecognized"));

    let out = describe(&shell, "sshfs box u bob port 22 ");
    assert!(out.contains("path"));
    assert!(!out.contains("port"));
    assert!(out.contains("<cr>"));
}

#[test]
fn test_permutation_path_count() {
    let spec = "x {a | b | c}";
    let handler = Handler::new(spec, |_| Ok(Outcome::Continue));
    let mut root = Node::root();
    root.build(&compile(spec, &[]).unwrap(), &handler, false);

    fn count(node: &Node) -> usize {
        usize::from(node.handler().is_some()) + node.children().map(count).sum::<usize>()
    }
    // 3 + 3*2 + 3*2*1
    assert_eq!(count(&root), 15);
}

#[test]
fn test_permutation_limit() {
    let branches: Vec<String> = (0..=MAX_PERMUTATION_BRANCHES)
        .map(|i| format!("k{i}"))
        .collect();
    let spec = format!("x {{{}}}", branches.join(" | "));

    let mut shell = Shell::new("> ");
    let result = shell.register(|_| Ok(Outcome::Continue), &spec, &[], CommandOptions::default());
    assert!(matches!(result, Err(Error::TooManyBranches { .. })));
    assert!(shell.root().children().next().is_none());
}

#[test]
fn test_incremental_loads_preserve_commands() {
    let mut shell = console();

    let mut more = CommandSet::new();
    more.install("show clock", &[DESC_SHOW, "Current time"], reply("12:00"));
    shell.load(&more).unwrap();

    assert_eq!(command(&shell, "sh cl"), "12:00\n");
    assert_eq!(command(&shell, "sh sys"), "System ok\n");
    assert!(command(&shell, "sh s").contains("System ok"));

    let mut replace = CommandSet::new();
    replace.install("show version", &[DESC_SHOW, "Software version"], reply("Version 2.0"));
    shell.load(&replace).unwrap();
    assert_eq!(command(&shell, "show ver"), "Version 2.0\n");
    assert_eq!(command(&shell, "show sys"), "System ok\n");
}

#[test]
fn test_grammar_display_round_trip() {
    for spec in [
        "show system",
        "test opt (bar | )",
        "sshfs HOSTNAME ({path PATH | port <1-65535>} | )",
        "echo .WORD",
    ] {
        let tokens = compile(spec, &[]).unwrap();
        let rendered = tokens.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
        let again = compile(&rendered, &[]).unwrap();
        assert_eq!(tokens, again, "spec `{spec}`");
    }
}

#[test]
fn test_run_loop_with_modes() {
    let entered = Rc::new(RefCell::new(Vec::new()));

    let mut config = Shell::new("(config)# ");
    let names = Rc::clone(&entered);
    config
        .register(
            move |inv| {
                names.borrow_mut().push(inv.word(0).unwrap_or_default().to_string());
                Ok(Outcome::Continue)
            },
            "hostname NAME",
            &["Set system name", "Name"],
            CommandOptions::default(),
        )
        .unwrap();
    config
        .register(|_| Ok(Outcome::Exit), "end", &[], CommandOptions::default())
        .unwrap();

    let mut exec = Shell::new("> ");
    exec.register(
        |_| Ok(Outcome::Enter("config".to_string())),
        "configure terminal",
        &[],
        CommandOptions::default(),
    )
    .unwrap();
    exec.register(|_| Err(Error::command("Permission denied")), "reload", &[], CommandOptions::default())
        .unwrap();
    exec.register(reply("bye"), "logout", &[], CommandOptions::default())
        .unwrap();
    exec.add_mode("config", config);

    let script = "reload\nconf t\nhost core1\nconfigure\nend\nlogout ?\nbogus\n";
    let mut editor = ReaderEditor::new(Cursor::new(script));
    let mut out = Vec::new();
    exec.run(&mut editor, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(*entered.borrow(), vec!["core1"]);
    assert!(out.starts_with("% Permission denied\n\n"));
    // `configure` is not a config mode command
    assert!(out.contains("% Unrecognized command\n\n"));
    assert!(out.contains("\n  <cr>\n\n"));
    assert!(out.ends_with("% Unrecognized command\n\n"));

    let history: Vec<&str> = editor.history().iter().collect();
    assert_eq!(
        history,
        vec!["reload", "conf t", "host core1", "configure", "end", "bogus"]
    );
}

#[test]
fn test_run_loop_unknown_mode() {
    let mut shell = Shell::new("> ");
    shell
        .register(
            |_| Ok(Outcome::Enter("nowhere".to_string())),
            "go",
            &[],
            CommandOptions::default(),
        )
        .unwrap();

    let mut editor = ReaderEditor::new(Cursor::new("go\n"));
    let result = shell.run(&mut editor, &mut Vec::new());
    assert!(matches!(result, Err(Error::UnknownMode(name)) if name == "nowhere"));
}

#[test]
fn test_run_loop_stops_on_exit() {
    let mut shell = Shell::new("> ");
    shell
        .register(|_| Ok(Outcome::Exit), "exit", &[], CommandOptions::default())
        .unwrap();
    shell
        .register(reply("unreachable"), "show", &[], CommandOptions::default())
        .unwrap();

    let mut editor = ReaderEditor::new(Cursor::new("ex\nshow\n"));
    let mut out = Vec::new();
    shell.run(&mut editor, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_values_passed_to_handler() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut shell = Shell::new("> ");
    shell
        .register(
            move |inv| {
                sink.borrow_mut().extend(inv.args.iter().cloned());
                Ok(Outcome::Continue)
            },
            "ping HOST (count <1-100>|)",
            &[],
            CommandOptions::default(),
        )
        .unwrap();

    shell.dispatch("p 10.0.0.1 c 3", &mut Vec::new()).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![Value::word("10.0.0.1"), Value::word("count"), Value::Integer(3)]
    );
}

#[test]
fn test_config_file_drives_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(
        temp_file,
        "hostname: edge\nhistory_path: /tmp/iscli-history\nsave_history: false\n"
    )
    .unwrap();

    let config = load_config(temp_file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.hostname, "edge");
    assert_eq!(config.expanded_history_path(), "/tmp/iscli-history");
    assert!(!config.save_history);
}
