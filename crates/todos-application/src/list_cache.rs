use std::cmp::Reverse;
use todos_core::todo::{DRAFT_ID, Todo, TodoFields, TodoPatch};
use todos_core::{Result, TodosError};

/// Client-side copy of the remote todo collection.
///
/// Entries are ordered newest first by `created_at`; the draft (which has no
/// timestamp yet) always sits at the front. At most one draft exists at a time.
///
/// Mutations are meant to be applied only after the corresponding remote
/// write succeeded. Operations that target an id the cache does not hold are
/// logged no-ops.
#[derive(Debug, Clone, Default)]
pub struct ListCache {
    todos: Vec<Todo>,
}

impl ListCache {
    /// Creates a new empty ListCache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole contents, e.g. after the initial fetch.
    ///
    /// Server-side drafts cannot exist, so any `"new"` entry in `todos` is
    /// dropped; a pending local draft is kept at the front.
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        let draft = self.take_draft();

        let mut todos: Vec<Todo> = todos.into_iter().filter(|t| !t.is_draft()).collect();
        todos.sort_by_key(|t| Reverse(t.created_at));

        self.todos = draft.into_iter().chain(todos).collect();
    }

    /// Prepends `draft`.
    ///
    /// Returns `false` without touching the cache if a draft already exists.
    pub fn insert_draft(&mut self, mut draft: Todo) -> bool {
        if self.has_draft() {
            return false;
        }

        draft.id = DRAFT_ID.to_string();
        self.todos.insert(0, draft);
        true
    }

    /// Adds one persisted todo at its `created_at` position.
    ///
    /// Returns `false` without touching the cache for a draft or an id that
    /// is already cached.
    pub fn insert(&mut self, todo: Todo) -> bool {
        if todo.is_draft() || self.position(&todo.id).is_some() {
            return false;
        }

        let index = self
            .todos
            .iter()
            .position(|cached| !cached.is_draft() && cached.created_at < todo.created_at)
            .unwrap_or(self.todos.len());
        self.todos.insert(index, todo);
        true
    }

    /// Removes the pending draft, if any.
    pub fn discard_draft(&mut self) -> Option<Todo> {
        self.take_draft()
    }

    /// Replaces the draft with the persisted todo built from `id` and `fields`.
    pub fn commit_draft(&mut self, id: impl Into<String>, fields: TodoFields) -> Result<&Todo> {
        let index = self
            .position(DRAFT_ID)
            .ok_or_else(|| TodosError::not_found("draft", DRAFT_ID))?;

        self.todos[index] = Todo::from_fields(id, fields);
        Ok(&self.todos[index])
    }

    /// Merges `patch` into the entry with `id`.
    pub fn patch(&mut self, id: &str, patch: &TodoPatch) -> bool {
        match self.get_mut(id) {
            Some(todo) => {
                todo.apply(patch);
                true
            }
            None => {
                tracing::warn!("[ListCache] patch: todo '{}' is not cached", id);
                false
            }
        }
    }

    /// Sets the client-only edit flag of the entry with `id`.
    pub fn set_editing(&mut self, id: &str, editing: bool) -> bool {
        match self.get_mut(id) {
            Some(todo) => {
                todo.is_editing = editing;
                true
            }
            None => {
                tracing::warn!("[ListCache] set_editing: todo '{}' is not cached", id);
                false
            }
        }
    }

    /// Drops the entry with `id`.
    pub fn remove(&mut self, id: &str) -> Option<Todo> {
        match self.position(id) {
            Some(index) => Some(self.todos.remove(index)),
            None => {
                tracing::warn!("[ListCache] remove: todo '{}' is not cached", id);
                None
            }
        }
    }

    /// Drops every entry whose id is in `ids` and returns how many went.
    pub fn remove_many<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let before = self.todos.len();
        self.todos
            .retain(|todo| !ids.iter().any(|id| id.as_ref() == todo.id));

        let removed = before - self.todos.len();
        if removed < ids.len() {
            tracing::warn!(
                "[ListCache] remove_many: {} of {} ids were not cached",
                ids.len() - removed,
                ids.len()
            );
        }
        removed
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn draft(&self) -> Option<&Todo> {
        self.get(DRAFT_ID)
    }

    pub fn has_draft(&self) -> bool {
        self.draft().is_some()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    fn take_draft(&mut self) -> Option<Todo> {
        self.position(DRAFT_ID).map(|index| self.todos.remove(index))
    }
}
