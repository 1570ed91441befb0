use infonest_core::{
    AppContext, AuthErrorKind, IdentityProvider, MemoryDocumentStore, MemoryIdentityProvider,
    SessionError, SessionStore, ValidationError,
};
use std::sync::Arc;

fn auth_kind(result: Result<infonest_core::Identity, SessionError>) -> AuthErrorKind {
    match result {
        Err(SessionError::Auth(err)) => err.kind,
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn login_maps_provider_failures_to_closed_error_kinds() {
    let provider = Arc::new(
        MemoryIdentityProvider::new().with_account("a@b.com", "secret1", "A"),
    );
    let session = SessionStore::new(provider);

    assert_eq!(
        auth_kind(session.login("a@b.com", "wrong-password").await),
        AuthErrorKind::InvalidCredentials
    );
    assert_eq!(
        auth_kind(session.login("nobody@b.com", "secret1").await),
        AuthErrorKind::UnknownOrDisabledUser
    );
}

#[tokio::test]
async fn register_maps_weak_password_and_collision() {
    let provider = Arc::new(
        MemoryIdentityProvider::new().with_account("taken@b.com", "secret1", "T"),
    );
    let session = SessionStore::new(Arc::clone(&provider));

    // Short passwords are caught locally before the provider sees them.
    assert_eq!(
        session.register("new@b.com", "12345").await,
        Err(SessionError::Validation(ValidationError::PasswordTooShort))
    );
    assert_eq!(
        auth_kind(session.register("taken@b.com", "secret1").await),
        AuthErrorKind::EmailAlreadyInUse
    );
    // The provider's own weak-password rule is only reachable by
    // callers bypassing local validation.
    let direct = provider.sign_up("direct@b.com", "123").await;
    assert_eq!(direct.unwrap_err().kind, AuthErrorKind::WeakPassword);
}

#[tokio::test]
async fn invalid_input_never_reaches_the_provider() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let session = SessionStore::new(Arc::clone(&provider));

    let _ = session.login("", "secret1").await;
    let _ = session.login("bad@address", "secret1").await;
    let _ = session.login("a@b.com", "12345").await;
    let _ = session.register("   ", "secret1").await;
    let _ = session.reset_password("not an@address").await;

    assert_eq!(provider.auth_calls(), 0);
}

#[tokio::test]
async fn reset_password_is_fire_and_forget() {
    let provider = Arc::new(MemoryIdentityProvider::new());
    let session = SessionStore::new(Arc::clone(&provider));

    // Unknown addresses are accepted without leaking account existence.
    session
        .reset_password("whoever@example.com")
        .await
        .expect("reset request should be accepted");
    assert_eq!(provider.auth_calls(), 1);
}

#[tokio::test]
async fn login_starts_sync_and_logout_tears_it_down() {
    let provider = Arc::new(
        MemoryIdentityProvider::new().with_account("a@b.com", "secret1", "A"),
    );
    let store = Arc::new(MemoryDocumentStore::new());
    let context = AppContext::new(provider, Arc::clone(&store));

    context
        .login("a@b.com", "secret1")
        .await
        .expect("login should succeed");
    assert!(context.current_identity().is_some());
    assert_eq!(store.live_subscriptions(), 1);

    context.logout().await;
    assert!(context.current_identity().is_none());
    // Subscription is cancelled before provider sign-out, so nothing
    // remains attached to the store.
    assert_eq!(store.live_subscriptions(), 0);
}
