//! Search and completion-status derivation over the cached todo list.
//!
//! Both stages are pure and keep the input order. An inactive stage hands back
//! its input untouched, so an empty search over the cache borrows the cache
//! itself instead of copying it.

use super::model::Todo;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Completion-status subset selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [Self::All, Self::Completed, Self::Incomplete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
        }
    }

    /// Whether a todo with the given completion flag is visible.
    pub fn admits(&self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Completed => completed,
            Self::Incomplete => !completed,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "incomplete" | "no-completed" | "open" => Ok(Self::Incomplete),
            other => Err(format!(
                "unknown visibility '{other}' (expected all, completed or incomplete)"
            )),
        }
    }
}

/// Keeps todos whose title or body contains `search`, ignoring case.
///
/// An empty `search` returns the input slice borrowed as-is.
pub fn search_filter<'a>(todos: &'a [Todo], search: &str) -> Cow<'a, [Todo]> {
    if search.is_empty() {
        return Cow::Borrowed(todos);
    }

    let needle = search.to_lowercase();
    Cow::Owned(
        todos
            .iter()
            .filter(|todo| {
                todo.title.to_lowercase().contains(&needle)
                    || todo.body.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect(),
    )
}

/// Keeps todos admitted by `visibility`; `All` returns the input unchanged.
pub fn visibility_filter(todos: Cow<'_, [Todo]>, visibility: Visibility) -> Cow<'_, [Todo]> {
    if visibility == Visibility::All {
        return todos;
    }

    match todos {
        Cow::Borrowed(slice) => Cow::Owned(
            slice
                .iter()
                .filter(|todo| visibility.admits(todo.completed))
                .cloned()
                .collect(),
        ),
        Cow::Owned(mut list) => {
            list.retain(|todo| visibility.admits(todo.completed));
            Cow::Owned(list)
        }
    }
}

/// View-derivation parameters; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub search: String,
    pub visibility: Visibility,
}

impl TodoFilter {
    pub fn new(search: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            search: search.into(),
            visibility,
        }
    }

    /// `visibility_filter(search_filter(todos, search), visibility)`
    pub fn apply<'a>(&self, todos: &'a [Todo]) -> Cow<'a, [Todo]> {
        visibility_filter(search_filter(todos, &self.search), self.visibility)
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.visibility != Visibility::All
    }
}
