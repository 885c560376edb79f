//! Todo use case.
//!
//! `TodoStore` coordinates the remote [`TodoGateway`], the [`ListCache`] and
//! the selection state. Every cache mutation happens strictly after the
//! matching remote write succeeded; a failed write returns the error and
//! leaves cache and selection as they were.

use crate::list_cache::ListCache;
use crate::selection::{MultiSelect, Selection};
use chrono::{Local, Utc};
use std::borrow::Cow;
use std::sync::Arc;
use todos_core::todo::{
    DEFAULT_LIST_LIMIT, DRAFT_ID, SortBy, Todo, TodoFilter, TodoGateway, TodoPatch, TodoQuery,
    Visibility,
};
use todos_core::{Result, TodosError};

/// Outcome of [`TodoStore::toggle_draft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftToggle {
    /// A fresh draft was prepended and selected.
    Inserted,
    /// The pending draft was discarded.
    Discarded,
}

pub struct TodoStore {
    gateway: Arc<dyn TodoGateway>,
    cache: ListCache,
    selection: Selection,
    marks: MultiSelect,
    filter: TodoFilter,
    list_limit: u32,
}

impl TodoStore {
    pub fn new(gateway: Arc<dyn TodoGateway>) -> Self {
        Self {
            gateway,
            cache: ListCache::new(),
            selection: Selection::new(),
            marks: MultiSelect::new(),
            filter: TodoFilter::default(),
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn with_list_limit(mut self, limit: u32) -> Self {
        self.list_limit = limit;
        self
    }

    /// Fetches the collection and replaces the cache contents.
    pub async fn load(&mut self) -> Result<usize> {
        let todos = self
            .gateway
            .list(None, SortBy::CreatedAtDesc, self.list_limit)
            .await?;

        self.cache.replace_all(todos);
        if let Some(id) = self.selection.id().map(str::to_string)
            && !self.selection.is_draft()
        {
            match self.cache.get(&id) {
                Some(todo) => self.selection.select(todo.clone()),
                None => self.selection.clear(),
            }
        }

        tracing::info!("[TodoStore] Loaded {} todos", self.cache.len());
        Ok(self.cache.len())
    }

    /// Adds a draft when none exists; otherwise removes the pending one.
    ///
    /// Refused while a saved todo is in edit mode.
    pub fn toggle_draft(&mut self) -> Result<DraftToggle> {
        if let Some(todo) = self.selection.current()
            && todo.is_editing
        {
            return Err(TodosError::validation(format!(
                "Todo {} is in edit mode; save or leave edit mode first",
                todo.id
            )));
        }

        if self.cache.discard_draft().is_some() {
            if self.selection.is_draft() {
                self.selection.clear();
            }
            tracing::debug!("[TodoStore] Draft discarded");
            return Ok(DraftToggle::Discarded);
        }

        let draft = Todo::draft(Local::now());
        self.cache.insert_draft(draft.clone());
        self.selection.select(draft);
        tracing::debug!("[TodoStore] Draft inserted");
        Ok(DraftToggle::Inserted)
    }

    /// Opens the cached todo with `id` in the detail view.
    pub fn select(&mut self, id: &str) -> Result<&Todo> {
        let mut todo = self
            .cache
            .get(id)
            .cloned()
            .ok_or_else(|| TodosError::not_found("todo", id))?;

        todo.is_editing = false;
        self.selection.select(todo);
        self.selection
            .current()
            .ok_or_else(|| TodosError::not_found("todo", id))
    }

    /// Opens the todo with `id`, fetching it by id when the loaded page
    /// does not hold it.
    pub async fn open(&mut self, id: &str) -> Result<&Todo> {
        if self.cache.get(id).is_none() {
            let found = self
                .gateway
                .list(Some(&TodoQuery::by_id(id)), SortBy::CreatedAtDesc, 1)
                .await?
                .into_iter()
                .find(|todo| todo.id == id)
                .ok_or_else(|| TodosError::not_found("todo", id))?;

            tracing::debug!("[TodoStore] Fetched todo {} outside the loaded page", id);
            self.cache.insert(found);
        }

        self.select(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn edit_title(&mut self, title: impl Into<String>) -> Result<()> {
        if self.selection.set_title(title) {
            Ok(())
        } else {
            Err(Self::not_editable())
        }
    }

    pub fn edit_body(&mut self, body: impl Into<String>) -> Result<()> {
        if self.selection.set_body(body) {
            Ok(())
        } else {
            Err(Self::not_editable())
        }
    }

    /// Flips edit mode of the selected saved todo and returns the new mode.
    ///
    /// Edit mode lives on the selection only; the cached entry never carries
    /// it. Leaving edit mode without saving drops the unsaved working copy.
    pub fn toggle_editing(&mut self) -> Result<bool> {
        let id = self.selected_saved_id()?;
        let editing = self
            .selection
            .toggle_editing()
            .ok_or_else(|| TodosError::validation("Drafts are always editable"))?;

        if !editing && let Some(todo) = self.cache.get(&id) {
            self.selection.select(todo.clone());
        }
        Ok(editing)
    }

    /// Persists the selected draft or the edits of the selected todo.
    pub async fn save(&mut self) -> Result<Todo> {
        let current = self
            .selection
            .current()
            .cloned()
            .ok_or_else(|| TodosError::validation("Nothing is selected"))?;

        if !self.selection.can_save() {
            return Err(TodosError::validation("Title and body must not be empty"));
        }

        if current.is_draft() {
            let fields = current.to_fields(Utc::now());
            let id = self.gateway.insert(&fields).await?;
            let saved = self.cache.commit_draft(id, fields)?.clone();

            tracing::info!("[TodoStore] Created todo {}", saved.id);
            self.selection.select(saved.clone());
            return Ok(saved);
        }

        if !current.is_editing {
            return Err(TodosError::validation(format!(
                "Todo {} is not in edit mode",
                current.id
            )));
        }

        let patch = TodoPatch::new()
            .title(current.title.as_str())
            .body(current.body.as_str());
        self.gateway
            .update(&TodoQuery::by_id(current.id.as_str()), &patch)
            .await?;

        self.cache.patch(&current.id, &patch);
        self.cache.set_editing(&current.id, false);
        let saved = self.cache.get(&current.id).cloned().unwrap_or(Todo {
            is_editing: false,
            ..current
        });

        tracing::info!("[TodoStore] Updated todo {}", saved.id);
        self.selection.select(saved.clone());
        Ok(saved)
    }

    /// Marks the selected saved todo complete or incomplete.
    pub async fn set_completed(&mut self, completed: bool) -> Result<()> {
        let id = self.selected_saved_id()?;
        let stored = self
            .cache
            .get(&id)
            .cloned()
            .ok_or_else(|| TodosError::not_found("todo", id.as_str()))?;

        let patch = TodoPatch::new()
            .title(stored.title)
            .body(stored.body)
            .priority(stored.priority)
            .completed(completed);
        self.gateway
            .update(&TodoQuery::by_id(id.as_str()), &patch)
            .await?;

        let status = TodoPatch::new().completed(completed);
        self.cache.patch(&id, &status);
        self.selection.apply(&status);

        tracing::debug!("[TodoStore] Todo {} completed={}", id, completed);
        Ok(())
    }

    /// Deletes the selected saved todo and clears the selection.
    pub async fn delete_selected(&mut self) -> Result<String> {
        let id = self.selected_saved_id()?;
        let deleted = self
            .gateway
            .delete_one(&TodoQuery::by_id(id.as_str()))
            .await?;

        self.cache.remove(&id);
        self.selection.clear();

        tracing::info!("[TodoStore] Deleted todo {}", deleted);
        Ok(deleted)
    }

    /// Deletes every todo in `ids` with one request.
    ///
    /// Leaves bulk mode afterwards. A removed selection moves to the first
    /// remaining todo.
    pub async fn delete_many<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<u64> {
        if ids.is_empty() {
            self.marks.exit();
            return Ok(0);
        }

        if ids.iter().any(|id| id.as_ref() == DRAFT_ID) {
            return Err(TodosError::validation(
                "The draft is not stored remotely; discard it instead",
            ));
        }

        let query = TodoQuery::by_ids(ids.iter().map(|id| id.as_ref().to_string()));
        let deleted = self.gateway.delete_many(&query).await?;

        self.cache.remove_many(ids);
        self.selection.retain_after_removal(ids, self.cache.todos());
        self.marks.exit();

        tracing::info!("[TodoStore] Deleted {} todos", deleted);
        Ok(deleted)
    }

    /// Deletes the todos marked in bulk mode.
    pub async fn delete_marked(&mut self) -> Result<u64> {
        let ids = self.marks.ids();
        self.delete_many(&ids).await
    }

    pub fn enter_bulk_mode(&mut self) {
        self.marks.enter();
    }

    pub fn exit_bulk_mode(&mut self) {
        self.marks.exit();
    }

    /// Marks or unmarks a saved todo for bulk deletion.
    pub fn toggle_mark(&mut self, id: &str) -> Result<bool> {
        match self.cache.get(id) {
            Some(todo) if todo.is_draft() => Err(TodosError::validation(
                "The draft cannot be marked for deletion",
            )),
            Some(_) => Ok(self.marks.toggle(id)),
            None => Err(TodosError::not_found("todo", id)),
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.filter.visibility = visibility;
    }

    /// The cache as narrowed by the current search and visibility.
    pub fn visible(&self) -> Cow<'_, [Todo]> {
        self.filter.apply(self.cache.todos())
    }

    pub fn cache(&self) -> &ListCache {
        &self.cache
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn marks(&self) -> &MultiSelect {
        &self.marks
    }

    pub fn filter(&self) -> &TodoFilter {
        &self.filter
    }

    fn selected_saved_id(&self) -> Result<String> {
        match self.selection.current() {
            None => Err(TodosError::validation("Nothing is selected")),
            Some(todo) if todo.is_draft() => {
                Err(TodosError::validation("The draft has not been saved yet"))
            }
            Some(todo) => Ok(todo.id.clone()),
        }
    }

    fn not_editable() -> TodosError {
        TodosError::validation("Select a draft or enter edit mode first")
    }
}
