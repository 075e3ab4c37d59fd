//! Command-line host and REPL
//!
//! Plays the part of the map host: it creates and destroys the compact
//! control, reports markers, forwards the cancel key, and prints both trees
//! after every command.

use crate::control::MountPoint;
use crate::keys::Key;
use crate::session::FilterSession;
use crate::storage::KeyValueBackend;
use crate::types::{Category, RouteId};
use crate::view::{Action, Node};
use anyhow::Result;
use colored::*;
use rustyline::DefaultEditor;

/// One parsed REPL line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Mount,
    Unmount,
    Markers(Vec<RouteId>),
    Action(Action),
    Key(Key),
    Status,
    Quit,
}

/// Parse a REPL line
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".to_string());
    };
    let rest: Vec<&str> = words.collect();

    let parse_ids = |args: &[&str]| -> Result<Vec<RouteId>, String> {
        args.iter()
            .map(|raw| raw.parse::<RouteId>().map_err(|_| format!("invalid route id '{}'", raw)))
            .collect()
    };

    let command = match head {
        "help" | "?" => ReplCommand::Help,
        "mount" => ReplCommand::Mount,
        "unmount" => ReplCommand::Unmount,
        "markers" => ReplCommand::Markers(parse_ids(&rest)?),
        "open" | "show" => ReplCommand::Action(Action::ShowFilter),
        "close" => ReplCommand::Action(Action::Close),
        "esc" => ReplCommand::Key(Key::Escape),
        "key" => {
            let raw = rest.first().ok_or("usage: key <name>")?;
            ReplCommand::Key(raw.parse::<Key>()?)
        }
        "toggle" => {
            let ids = parse_ids(&rest)?;
            match ids.as_slice() {
                [id] => ReplCommand::Action(Action::ToggleRoute(*id)),
                _ => return Err("usage: toggle <route>".to_string()),
            }
        }
        "trams" => ReplCommand::Action(Action::ToggleCategory(Category::Trams)),
        "buses" => ReplCommand::Action(Action::ToggleCategory(Category::Buses)),
        "reset" => ReplCommand::Action(Action::Reset),
        "enable" => ReplCommand::Action(Action::ToggleFilter(true)),
        "disable" => ReplCommand::Action(Action::ToggleFilter(false)),
        "status" => ReplCommand::Status,
        "exit" | "quit" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(command)
}

/// Render a tree for the terminal, one node per line
pub fn paint(node: &Node) -> String {
    node.outline()
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("[x]") {
                line.green().to_string()
            } else if trimmed.starts_with("[-]") {
                line.yellow().to_string()
            } else if trimmed.starts_with('<') {
                line.dimmed().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const HELP: &str = "\
mount | unmount            create / destroy the map control
markers <id>...            report routes of markers on the map
open | close | esc         show / close the overlay, press the cancel key
toggle <id> | trams | buses | reset
enable | disable           global filter switch
status | help | quit";

/// REPL host around one session
pub struct Repl<B: KeyValueBackend> {
    session: FilterSession<B>,
    mount: Option<MountPoint>,
}

impl<B: KeyValueBackend> Repl<B> {
    pub fn new(session: FilterSession<B>) -> Self {
        Self {
            session,
            mount: None,
        }
    }

    pub fn session(&self) -> &FilterSession<B> {
        &self.session
    }

    /// Apply one command; returns `false` when the REPL should stop
    pub fn apply(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Mount => self.mount = Some(self.session.mount()),
            ReplCommand::Unmount => {
                self.session.unmount();
                self.mount = None;
            }
            ReplCommand::Markers(markers) => self.session.set_markers(markers),
            ReplCommand::Action(action) => self.session.dispatch(action),
            ReplCommand::Key(key) => self.session.handle_key(key),
            ReplCommand::Status => {}
            ReplCommand::Quit => return false,
        }
        true
    }

    fn print_trees(&self) {
        let state = self.session.state();
        println!(
            "{} {} selected, enabled: {}, markers visible: {}",
            "state:".bold(),
            state.selection.len(),
            state.enabled,
            self.session.any_marker_visible()
        );

        match self.mount.as_ref().and_then(|m| m.snapshot()) {
            Some(tree) => println!("{}\n{}", "control:".bold(), paint(&tree)),
            None => println!("{} {}", "control:".bold(), "(not mounted)".dimmed()),
        }

        if let Some(tree) = self.session.overlay_tree() {
            println!("{}\n{}", "overlay:".bold(), paint(&tree));
        }
    }

    /// Run until `quit` or end of input
    pub fn run(mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        println!("{}", HELP.dimmed());

        loop {
            let line = match rl.readline("filter> ") {
                Ok(line) => line,
                Err(_) => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            let _ = rl.add_history_entry(line.as_str());

            match parse_command(&line) {
                Ok(command) => {
                    if !self.apply(command) {
                        break;
                    }
                    self.print_trees();
                }
                Err(e) => println!("{}", e.red()),
            }
        }

        self.session.unmount();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryBackend, PersistentStateStore, FILTER_STATE_KEY};
    use serial_test::serial;
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("toggle 21"), Ok(ReplCommand::Action(Action::ToggleRoute(RouteId(21)))));
        assert_eq!(
            parse_command("markers 2 205"),
            Ok(ReplCommand::Markers(vec![RouteId(2), RouteId(205)]))
        );
        assert_eq!(parse_command("esc"), Ok(ReplCommand::Key(Key::Escape)));
        assert_eq!(parse_command("quit"), Ok(ReplCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("").is_err());
        assert!(parse_command("toggle").is_err());
        assert!(parse_command("toggle N1").is_err());
        assert!(parse_command("fly").is_err());
    }

    #[test]
    #[serial]
    fn test_scripted_session() {
        let store = Arc::new(PersistentStateStore::new(MemoryBackend::new()));
        let mut session = FilterSession::new(store, FILTER_STATE_KEY, Key::Escape);
        session.set_routes(Some(vec![RouteId(2), RouteId(3), RouteId(21), RouteId(205)]));
        let mut repl = Repl::new(session);

        for line in ["toggle 2", "mount", "open", "trams", "enable", "esc", "unmount"] {
            assert!(repl.apply(parse_command(line).unwrap()));
        }

        // "toggle 2" ran before the overlay was open and was ignored
        let state = repl.session().state();
        assert_eq!(state.selection.len(), 3);
        // The switch only reaches the session while the control is mounted
        assert!(state.enabled);
        assert!(!repl.session().is_overlay_open());
        assert!(!repl.apply(ReplCommand::Quit));
    }
}
