use rusty_library_lending::adapters::memory::InMemoryLibrary;
use rusty_library_lending::application::{
    ErrorKind, ServiceDependencies,
    auth::{AuthError, AuthSettings, authenticate, list_users, login, logout, register},
};
use rusty_library_lending::domain::{Role, commands::RegisterUser};
use std::sync::Arc;

fn setup() -> ServiceDependencies {
    Arc::new(InMemoryLibrary::new()).service_dependencies()
}

fn settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: "test-secret".to_string(),
        token_ttl: chrono::Duration::hours(1),
    }
}

fn alice() -> RegisterUser {
    RegisterUser {
        name: "Alice".to_string(),
        email: "Alice@Example.com".to_string(),
        password: "password123".to_string(),
    }
}

#[tokio::test]
async fn test_register_login_authenticate_logout() {
    let deps = setup();
    let settings = settings();

    let user = register(&deps, alice()).await.unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, Role::User);

    let issued = login(&deps, &settings, "alice@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(issued.user.user_id, user.user_id);

    let principal = authenticate(&deps, &settings, &issued.token).await.unwrap();
    assert_eq!(principal.user_id, user.user_id);

    logout(&deps, &principal, &issued.token).await.unwrap();

    let err = authenticate(&deps, &settings, &issued.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TokenRevoked));
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_register_duplicate_email_is_conflict() {
    let deps = setup();

    register(&deps, alice()).await.unwrap();
    let err = register(&deps, alice()).await.unwrap_err();

    assert!(matches!(err, AuthError::EmailTaken));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let deps = setup();
    register(&deps, alice()).await.unwrap();

    let err = login(&deps, &settings(), "alice@example.com", "wrong-password")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let deps = setup();
    register(&deps, alice()).await.unwrap();
    let issued = login(&deps, &settings(), "alice@example.com", "password123")
        .await
        .unwrap();

    let other = AuthSettings {
        jwt_secret: "other-secret".to_string(),
        ..settings()
    };
    let err = authenticate(&deps, &other, &issued.token).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidToken(_)));
}

#[tokio::test]
async fn test_list_users_omits_password_hash() {
    let deps = setup();
    register(&deps, alice()).await.unwrap();

    let users = list_users(&deps).await.unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Alice");
}
