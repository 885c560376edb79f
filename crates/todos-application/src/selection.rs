//! Selection state: the one todo open in the detail view, and the set of
//! todos marked in bulk mode.

use std::collections::BTreeSet;
use todos_core::todo::{Todo, TodoPatch};

/// The todo currently open for viewing or editing.
///
/// Holds a working copy: title and body edits land here first and reach the
/// cache only after a successful save.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    current: Option<Todo>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, todo: Todo) {
        self.current = Some(todo);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Todo> {
        self.current.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.current.as_ref().map(|todo| todo.id.as_str())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    pub fn is_draft(&self) -> bool {
        self.current.as_ref().is_some_and(Todo::is_draft)
    }

    /// True while a draft or an item in edit mode is open.
    pub fn is_editable(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|todo| todo.is_draft() || todo.is_editing)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        self.edit(|todo| todo.title = title.into())
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> bool {
        self.edit(|todo| todo.body = body.into())
    }

    /// Flips edit mode of a saved item. Drafts are always editable.
    pub fn toggle_editing(&mut self) -> Option<bool> {
        match self.current.as_mut() {
            Some(todo) if !todo.is_draft() => {
                todo.is_editing = !todo.is_editing;
                Some(todo.is_editing)
            }
            _ => None,
        }
    }

    /// Merges a persisted patch into the working copy.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(todo) = self.current.as_mut() {
            todo.apply(patch);
        }
    }

    /// Whether the open todo has everything a save needs.
    pub fn can_save(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|todo| !todo.title.is_empty() && !todo.body.is_empty())
    }

    /// Re-points the selection after ids were removed from the cache.
    ///
    /// If the selected id was removed, the first remaining todo becomes
    /// selected, or nothing when none remain.
    pub fn retain_after_removal<S: AsRef<str>>(&mut self, removed: &[S], remaining: &[Todo]) {
        let Some(id) = self.id() else {
            return;
        };

        if removed.iter().any(|r| r.as_ref() == id) {
            self.current = remaining.first().cloned();
        }
    }

    fn edit(&mut self, f: impl FnOnce(&mut Todo)) -> bool {
        match self.current.as_mut() {
            Some(todo) if todo.is_draft() || todo.is_editing => {
                f(todo);
                true
            }
            _ => false,
        }
    }
}

/// Bulk-delete mode: a set of marked ids, active until exited.
#[derive(Debug, Clone, Default)]
pub struct MultiSelect {
    active: bool,
    ids: BTreeSet<String>,
}

impl MultiSelect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) {
        self.active = true;
    }

    /// Leaves bulk mode and forgets every mark.
    pub fn exit(&mut self) {
        self.active = false;
        self.ids.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks or unmarks `id`, entering bulk mode if needed. Returns whether
    /// the id is marked afterwards.
    pub fn toggle(&mut self, id: impl Into<String>) -> bool {
        self.active = true;
        let id = id.into();
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
