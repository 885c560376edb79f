use crate::render;
use anyhow::{Result, bail};
use todos_application::TodoStore;
use todos_core::todo::Visibility;

pub fn list(store: &mut TodoStore, search: String, visibility: Visibility) {
    store.set_search(search);
    store.set_visibility(visibility);

    let visible = store.visible();
    if visible.is_empty() {
        println!("{}", render::muted("No todos"));
        return;
    }

    for (index, todo) in visible.iter().enumerate() {
        println!("{}", render::todo_line(index + 1, todo, false, None));
    }

    if store.filter().is_active() {
        println!(
            "{}",
            render::muted(&format!(
                "{} of {} shown",
                visible.len(),
                store.cache().len()
            ))
        );
    }
}

pub async fn add(store: &mut TodoStore, title: String, body: String) -> Result<()> {
    store.toggle_draft()?;
    store.edit_title(title)?;
    store.edit_body(body)?;

    let saved = store.save().await?;
    println!("{}", render::success(&format!("Created {}", saved.id)));
    Ok(())
}

pub async fn edit(
    store: &mut TodoStore,
    id: &str,
    title: Option<String>,
    body: Option<String>,
) -> Result<()> {
    if title.is_none() && body.is_none() {
        bail!("Nothing to change: pass --title and/or --body");
    }

    store.open(id).await?;
    store.toggle_editing()?;
    if let Some(title) = title {
        store.edit_title(title)?;
    }
    if let Some(body) = body {
        store.edit_body(body)?;
    }

    let saved = store.save().await?;
    println!("{}", render::todo_detail(&saved));
    Ok(())
}

pub async fn set_completed(store: &mut TodoStore, id: &str, completed: bool) -> Result<()> {
    store.open(id).await?;
    store.set_completed(completed).await?;

    let state = if completed { "completed" } else { "incomplete" };
    println!("{}", render::success(&format!("Marked {id} {state}")));
    Ok(())
}

pub async fn delete(store: &mut TodoStore, id: &str) -> Result<()> {
    store.open(id).await?;
    let deleted = store.delete_selected().await?;

    println!("{}", render::success(&format!("Deleted {deleted}")));
    Ok(())
}

pub async fn delete_many(store: &mut TodoStore, ids: &[String]) -> Result<()> {
    let count = store.delete_many(ids).await?;

    println!("{}", render::success(&format!("Deleted {count} todos")));
    Ok(())
}
