use infonest_core::{
    AppContext, EditorError, MemoryDocumentStore, MemoryIdentityProvider, Note, NotesWatcher,
    SyncError, ValidationError,
};
use std::sync::Arc;
use std::time::Duration;

fn context_with_account() -> (AppContext<MemoryIdentityProvider, MemoryDocumentStore>, Arc<MemoryDocumentStore>)
{
    let provider = Arc::new(
        MemoryIdentityProvider::new().with_account("a@b.com", "secret1", "A"),
    );
    let store = Arc::new(MemoryDocumentStore::new());
    let context = AppContext::new(provider, Arc::clone(&store));
    (context, store)
}

async fn wait_until(
    watcher: &mut NotesWatcher,
    predicate: impl Fn(&[Note]) -> bool,
) -> Vec<Note> {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let current = watcher.current();
            if predicate(&current) {
                return current;
            }
            assert!(watcher.changed().await, "engine dropped while waiting");
        }
    })
    .await
    .expect("condition not met within timeout")
}

#[tokio::test]
async fn created_note_loads_back_with_matching_fields() {
    let (context, _store) = context_with_account();
    context.login("a@b.com", "secret1").await.unwrap();

    let editor = context.editor();
    let id = editor.save(None, "Groceries", "milk, eggs").await.unwrap();
    let note = editor.load_for_edit(&id).await.unwrap();
    assert_eq!(note.title, "Groceries");
    assert_eq!(note.content, "milk, eggs");
}

#[tokio::test]
async fn save_trims_fields_and_preserves_ownership_on_update() {
    let (context, _store) = context_with_account();
    let identity = context.login("a@b.com", "secret1").await.unwrap();

    let editor = context.editor();
    let id = editor.save(None, "  Title  ", "  body  ").await.unwrap();
    let created = editor.load_for_edit(&id).await.unwrap();
    assert_eq!(created.title, "Title");
    assert_eq!(created.owner_id, identity.user_id);

    editor.save(Some(id.as_str()), "Title", "edited").await.unwrap();
    let mut watcher = context.notes();
    let notes = wait_until(&mut watcher, |notes| {
        notes.len() == 1 && notes[0].content == "edited"
    })
    .await;
    assert_eq!(notes[0].owner_id, identity.user_id);
    assert_eq!(notes[0].id, id);
}

#[tokio::test]
async fn blank_fields_are_rejected_before_the_store_is_touched() {
    let (context, store) = context_with_account();
    context.login("a@b.com", "secret1").await.unwrap();
    let writes_before = store.mutation_count();

    let editor = context.editor();
    assert_eq!(
        editor.save(None, "", "body").await,
        Err(EditorError::Validation(ValidationError::BlankTitle))
    );
    assert_eq!(
        editor.save(None, "title", "   ").await,
        Err(EditorError::Validation(ValidationError::BlankContent))
    );
    assert_eq!(store.mutation_count(), writes_before);
}

#[tokio::test]
async fn mutating_after_logout_fails_without_contacting_the_store() {
    let (context, store) = context_with_account();
    context.login("a@b.com", "secret1").await.unwrap();
    context.logout().await;
    let writes_before = store.mutation_count();

    let editor = context.editor();
    assert_eq!(
        editor.save(None, "T", "C").await,
        Err(EditorError::Sync(SyncError::NotAuthenticated))
    );
    assert_eq!(
        editor.delete("some-id").await,
        Err(EditorError::Sync(SyncError::NotAuthenticated))
    );
    assert_eq!(store.mutation_count(), writes_before);
}

// End-to-end walk: login, empty list, create, observe, update in
// place, delete, empty list again.
#[tokio::test]
async fn full_session_scenario() {
    let (context, _store) = context_with_account();
    let identity = context.login("a@b.com", "secret1").await.unwrap();
    assert_eq!(identity.email, "a@b.com");

    let mut watcher = context.notes();
    wait_until(&mut watcher, |notes| notes.is_empty()).await;

    let id = context.sync().create_note("T", "C").await.unwrap();
    let created = wait_until(&mut watcher, |notes| notes.len() == 1).await;
    assert_eq!(created[0].owner_id, identity.user_id);
    assert_eq!(created[0].title, "T");
    assert_eq!(created[0].content, "C");

    let mut edited = created[0].clone();
    edited.content = "C2".to_string();
    context.sync().update_note(edited).await.unwrap();
    let updated = wait_until(&mut watcher, |notes| {
        notes.len() == 1 && notes[0].content == "C2"
    })
    .await;
    assert_eq!(updated[0].id, id);

    context.sync().delete_note(&id).await.unwrap();
    wait_until(&mut watcher, |notes| notes.is_empty()).await;

    context.logout().await;
    assert!(context.notes().current().is_empty());
}
