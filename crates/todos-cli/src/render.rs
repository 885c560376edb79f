//! Terminal rendering of todos.

use colored::Colorize;
use todos_core::todo::Todo;

/// One list row: position, checkbox, title and id.
///
/// `marked` is `Some` while bulk mode is active.
pub fn todo_line(position: usize, todo: &Todo, selected: bool, marked: Option<bool>) -> String {
    let pointer = if selected { ">".bright_cyan().bold() } else { " ".normal() };
    let mark = match marked {
        Some(true) => "* ".bright_red().bold().to_string(),
        Some(false) => "  ".to_string(),
        None => String::new(),
    };
    let checkbox = if todo.completed {
        "[x]".green()
    } else {
        "[ ]".normal()
    };
    let title = if todo.completed {
        todo.title.dimmed().strikethrough()
    } else {
        todo.title.bold()
    };
    let id = if todo.is_draft() {
        "(draft)".yellow()
    } else {
        todo.id.bright_black()
    };

    format!("{pointer}{mark}{position:>3}. {checkbox} {title}  {id}")
}

/// Full view of one todo with the body bullets expanded.
pub fn todo_detail(todo: &Todo) -> String {
    let mut lines = Vec::new();

    let heading = if todo.is_editing {
        format!("{} {}", todo.title.bold(), "(editing)".yellow())
    } else if todo.is_draft() {
        format!("{} {}", todo.title.bold(), "(draft)".yellow())
    } else {
        todo.title.bold().to_string()
    };
    lines.push(heading);

    let status = if todo.completed {
        "completed".green()
    } else {
        "incomplete".normal()
    };
    lines.push(format!(
        "{}  {}  {}",
        todo.id.bright_black(),
        status,
        todo.priority.as_str().bright_black()
    ));

    if let Some(created_at) = todo.created_at {
        lines.push(
            format!("created {}", created_at.format("%Y-%m-%d %H:%M UTC"))
                .bright_black()
                .to_string(),
        );
    }

    lines.push(String::new());
    if todo.is_editing || todo.is_draft() {
        lines.push(todo.body.clone());
    } else {
        lines.push(todo.display_body());
    }

    lines.join("\n")
}

pub fn success(message: &str) -> String {
    message.bright_green().to_string()
}

pub fn error(message: &str) -> String {
    format!("Error: {message}").red().to_string()
}

pub fn muted(message: &str) -> String {
    message.bright_black().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use todos_core::todo::Priority;

    fn saved(completed: bool) -> Todo {
        Todo {
            id: "65f0".to_string(),
            title: "Groceries".to_string(),
            body: "* eggs\n* milk".to_string(),
            completed,
            priority: Priority::default(),
            created_at: None,
            updated_at: None,
            is_editing: false,
        }
    }

    #[test]
    fn test_todo_line_shows_checkbox_and_id() {
        colored::control::set_override(false);

        assert_eq!(
            todo_line(1, &saved(false), false, None),
            "   1. [ ] Groceries  65f0"
        );
        assert_eq!(
            todo_line(2, &saved(true), true, Some(true)),
            ">*   2. [x] Groceries  65f0"
        );
    }

    #[test]
    fn test_todo_line_labels_draft() {
        colored::control::set_override(false);

        let line = todo_line(1, &Todo::draft(Local::now()), false, None);
        assert!(line.ends_with("New Todo  (draft)"));
    }

    #[test]
    fn test_detail_expands_bullets_only_when_read_only() {
        colored::control::set_override(false);

        let mut todo = saved(false);
        assert!(todo_detail(&todo).ends_with("• eggs\n• milk"));

        todo.is_editing = true;
        assert!(todo_detail(&todo).ends_with("* eggs\n* milk"));
    }
}
