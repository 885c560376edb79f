//! Interactive shell over a loaded [`TodoStore`].

use crate::render;
use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};
use todos_application::{DraftToggle, TodoStore};
use todos_core::todo::Visibility;

const COMMANDS: &[(&str, &str)] = &[
    ("list", "show the visible todos"),
    ("open", "<n|id> open a todo"),
    ("close", "close the open todo"),
    ("new", "add a draft, or discard the pending one"),
    ("title", "<text> change the title of the draft or edited todo"),
    ("body", "<text> change the body (\\n starts a new line)"),
    ("edit", "enter or leave edit mode"),
    ("save", "save the draft or the edits"),
    ("done", "mark the open todo completed"),
    ("undone", "mark the open todo incomplete"),
    ("rm", "delete the open todo"),
    ("bulk", "enter bulk-delete mode"),
    ("mark", "<n|id> mark or unmark a todo for bulk delete"),
    ("rm-marked", "delete every marked todo"),
    ("cancel", "leave bulk-delete mode"),
    ("search", "[text] filter by text, empty to clear"),
    ("filter", "<all|completed|incomplete> filter by status"),
    ("reload", "fetch the list again"),
    ("help", "show this help"),
    ("quit", "leave the shell"),
];

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    List,
    Open(String),
    Close,
    New,
    Title(String),
    Body(String),
    Edit,
    Save,
    Done,
    Undone,
    Remove,
    Bulk,
    Mark(String),
    RemoveMarked,
    Cancel,
    Search(String),
    Filter(Visibility),
    Reload,
    Help,
    Quit,
}

impl ShellCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let (name, rest) = match line.trim().split_once(' ') {
            Some((name, rest)) => (name, rest.trim()),
            None => (line.trim(), ""),
        };

        let argument = |what: &str| {
            if rest.is_empty() {
                Err(format!("'{name}' needs {what}"))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match name {
            "list" | "ls" => Self::List,
            "open" => Self::Open(argument("a position or id")?),
            "close" => Self::Close,
            "new" => Self::New,
            "title" => Self::Title(rest.to_string()),
            "body" => Self::Body(rest.replace("\\n", "\n")),
            "edit" => Self::Edit,
            "save" => Self::Save,
            "done" => Self::Done,
            "undone" => Self::Undone,
            "rm" => Self::Remove,
            "bulk" => Self::Bulk,
            "mark" => Self::Mark(argument("a position or id")?),
            "rm-marked" => Self::RemoveMarked,
            "cancel" => Self::Cancel,
            "search" => Self::Search(rest.to_string()),
            "filter" => Self::Filter(argument("all, completed or incomplete")?.parse()?),
            "reload" => Self::Reload,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("Unknown command '{other}', try 'help'")),
        };
        Ok(command)
    }
}

/// Completion, highlighting and hints for shell commands.
#[derive(Clone)]
struct ShellHelper;

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some(partial) = line.strip_prefix("filter ") {
            let candidates = Visibility::ALL
                .iter()
                .map(Visibility::as_str)
                .filter(|v| v.starts_with(partial))
                .map(|v| Pair {
                    display: v.to_string(),
                    replacement: v.to_string(),
                })
                .collect();
            return Ok(("filter ".len(), candidates));
        }

        if line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|(name, _)| name.starts_with(line))
            .map(|(name, _)| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let name = line.split(' ').next().unwrap_or_default();
        if !name.is_empty() && COMMANDS.iter().any(|(cmd, _)| *cmd == name) {
            Owned(format!("{}{}", name.bright_cyan(), &line[name.len()..]))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.is_empty() || line.contains(' ') {
            return None;
        }

        COMMANDS
            .iter()
            .find(|(name, _)| name.starts_with(line) && name.len() > line.len())
            .map(|(name, _)| name[line.len()..].bright_black().to_string())
    }
}

impl Validator for ShellHelper {}

/// Runs the read-eval-print loop until `quit` or end of input.
pub async fn run(mut store: TodoStore) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(ShellHelper));

    println!("{}", "=== todos ===".bright_magenta().bold());
    println!("{}", render::muted("Type 'help' for commands, 'quit' to exit."));
    println!();
    print_list(&store);

    loop {
        let prompt = if store.marks().is_active() {
            "bulk> "
        } else {
            "todos> "
        };

        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match ShellCommand::parse(trimmed) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", render::error(&message));
                        continue;
                    }
                };

                if command == ShellCommand::Quit {
                    break;
                }

                if let Err(e) = execute(&mut store, command).await {
                    tracing::debug!("[Shell] Command failed: {:?}", e);
                    println!("{}", render::error(&e.to_string()));
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", render::error(&format!("{err:?}")));
                break;
            }
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

async fn execute(store: &mut TodoStore, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::List => print_list(store),
        ShellCommand::Open(target) => {
            let id = resolve_id(store, &target);
            let todo = store.open(&id).await?;
            println!("{}", render::todo_detail(todo));
        }
        ShellCommand::Close => store.clear_selection(),
        ShellCommand::New => match store.toggle_draft()? {
            DraftToggle::Inserted => {
                println!("{}", render::success("Draft added; set 'title' and 'body', then 'save'"));
                print_selection(store);
            }
            DraftToggle::Discarded => println!("{}", render::muted("Draft discarded")),
        },
        ShellCommand::Title(title) => {
            store.edit_title(title)?;
            print_selection(store);
        }
        ShellCommand::Body(body) => {
            store.edit_body(body)?;
            print_selection(store);
        }
        ShellCommand::Edit => {
            let editing = store.toggle_editing()?;
            let state = if editing { "Editing" } else { "Edit cancelled" };
            println!("{}", render::muted(state));
            print_selection(store);
        }
        ShellCommand::Save => {
            let saved = store.save().await?;
            println!("{}", render::success(&format!("Saved {}", saved.id)));
        }
        ShellCommand::Done => store.set_completed(true).await?,
        ShellCommand::Undone => store.set_completed(false).await?,
        ShellCommand::Remove => {
            let deleted = store.delete_selected().await?;
            println!("{}", render::success(&format!("Deleted {deleted}")));
        }
        ShellCommand::Bulk => {
            store.enter_bulk_mode();
            println!("{}", render::muted("Bulk mode: 'mark' todos, then 'rm-marked'"));
        }
        ShellCommand::Mark(target) => {
            let id = resolve_id(store, &target);
            store.toggle_mark(&id)?;
            print_list(store);
        }
        ShellCommand::RemoveMarked => {
            let count = store.delete_marked().await?;
            println!("{}", render::success(&format!("Deleted {count} todos")));
        }
        ShellCommand::Cancel => store.exit_bulk_mode(),
        ShellCommand::Search(search) => {
            store.set_search(search);
            print_list(store);
        }
        ShellCommand::Filter(visibility) => {
            store.set_visibility(visibility);
            print_list(store);
        }
        ShellCommand::Reload => {
            let count = store.load().await?;
            println!("{}", render::muted(&format!("Loaded {count} todos")));
        }
        ShellCommand::Help => print_help(),
        ShellCommand::Quit => {}
    }
    Ok(())
}

/// Maps a 1-based position in the visible list to its id; anything else is
/// taken as an id.
fn resolve_id(store: &TodoStore, target: &str) -> String {
    target
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| store.visible().get(index).map(|todo| todo.id.clone()))
        .unwrap_or_else(|| target.to_string())
}

fn print_list(store: &TodoStore) {
    let visible = store.visible();
    if visible.is_empty() {
        println!("{}", render::muted("No todos"));
        return;
    }

    let marks = store.marks();
    for (index, todo) in visible.iter().enumerate() {
        let marked = marks.is_active().then(|| marks.contains(&todo.id));
        let selected = store.selection().is_selected(&todo.id);
        println!("{}", render::todo_line(index + 1, todo, selected, marked));
    }
}

fn print_selection(store: &TodoStore) {
    if let Some(todo) = store.selection().current() {
        println!("{}", render::todo_detail(todo));
    }
}

fn print_help() {
    for (name, description) in COMMANDS {
        println!("  {:<10} {}", name.bright_cyan(), description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(ShellCommand::parse("open 2"), Ok(ShellCommand::Open("2".to_string())));
        assert_eq!(
            ShellCommand::parse("  title  Buy milk "),
            Ok(ShellCommand::Title("Buy milk".to_string()))
        );
        assert_eq!(
            ShellCommand::parse("body * oat\\n* soy"),
            Ok(ShellCommand::Body("* oat\n* soy".to_string()))
        );
        assert_eq!(
            ShellCommand::parse("filter done"),
            Ok(ShellCommand::Filter(Visibility::Completed))
        );
        assert_eq!(ShellCommand::parse("search"), Ok(ShellCommand::Search(String::new())));
        assert_eq!(ShellCommand::parse("exit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_missing_arguments_and_unknown_names() {
        assert!(ShellCommand::parse("open").is_err());
        assert!(ShellCommand::parse("mark").is_err());
        assert!(ShellCommand::parse("filter sometimes").is_err());
        assert!(ShellCommand::parse("frobnicate").is_err());
    }

    #[test]
    fn test_every_listed_command_parses() {
        for (name, _) in COMMANDS {
            let line = match *name {
                "open" | "mark" => format!("{name} 1"),
                "filter" => format!("{name} all"),
                _ => name.to_string(),
            };
            assert!(ShellCommand::parse(&line).is_ok(), "'{line}' did not parse");
        }
    }
}
