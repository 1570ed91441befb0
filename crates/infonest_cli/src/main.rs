//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive `infonest_core` end to end against the in-process providers.
//! - Keep output deterministic for quick local sanity checks.

use infonest_core::{AppContext, MemoryDocumentStore, MemoryIdentityProvider};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    println!("infonest_core version={}", infonest_core::core_version());

    let provider = Arc::new(MemoryIdentityProvider::new());
    let store = Arc::new(MemoryDocumentStore::new());
    let context = AppContext::new(provider, store);

    let identity = match context.register("demo@example.com", "secret1").await {
        Ok(identity) => identity,
        Err(err) => {
            eprintln!("register failed: {err}");
            return;
        }
    };
    println!(
        "registered user_id={} display_name={}",
        identity.user_id, identity.display_name
    );

    let editor = context.editor();
    let note_id = match editor.save(None, "First note", "Hello from the probe").await {
        Ok(id) => id,
        Err(err) => {
            eprintln!("save failed: {err}");
            return;
        }
    };

    match editor.load_for_edit(&note_id).await {
        Ok(note) => println!("loaded title={} content={}", note.title, note.content),
        Err(err) => {
            eprintln!("load failed: {err}");
            return;
        }
    }

    if let Err(err) = editor
        .save(Some(note_id.as_str()), "First note", "Edited body")
        .await
    {
        eprintln!("update failed: {err}");
        return;
    }
    if let Err(err) = editor.delete(&note_id).await {
        eprintln!("delete failed: {err}");
        return;
    }

    context.logout().await;
    println!(
        "logged_out notes_observed={}",
        context.notes().current().len()
    );
}
