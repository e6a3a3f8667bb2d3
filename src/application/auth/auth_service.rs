use chrono::{DateTime, Utc};

use crate::application::ServiceDependencies;
use crate::domain::{Role, User, UserId, UserSummary, commands::RegisterUser};
use crate::ports::StoreError;

use super::errors::{AuthError, Result};
use super::password::{hash_password, verify_password};
use super::token::{AuthSettings, Claims, Principal, issue_token, verify_token};

/// パスワードの最小文字数
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// ログイン結果
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(cmd: &RegisterUser) -> Result<()> {
    if cmd.name.trim().is_empty() {
        return Err(AuthError::InvalidInput("name is required".to_string()));
    }
    let email = cmd.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidInput("email is invalid".to_string()));
    }
    if cmd.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// 利用者を登録する
///
/// 新規利用者のロールは常に`USER`。
#[tracing::instrument(skip(deps, cmd))]
pub async fn register(deps: &ServiceDependencies, cmd: RegisterUser) -> Result<UserSummary> {
    validate_registration(&cmd)?;

    let user = User {
        user_id: UserId::new(),
        name: cmd.name.trim().to_string(),
        email: normalize_email(&cmd.email),
        password_hash: hash_password(&cmd.password)?,
        role: Role::User,
        created_at: Utc::now(),
    };

    deps.user_directory
        .create(user.clone())
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => AuthError::EmailTaken,
            other => AuthError::StoreError(other),
        })?;

    tracing::info!(user_id = %user.user_id, "User registered");

    Ok(user.summary())
}

/// メールアドレスとパスワードでログインし、トークンを発行する
#[tracing::instrument(skip(deps, settings, password))]
pub async fn login(
    deps: &ServiceDependencies,
    settings: &AuthSettings,
    email: &str,
    password: &str,
) -> Result<IssuedToken> {
    let user = deps
        .user_directory
        .find_by_email(&normalize_email(email))
        .await
        .map_err(AuthError::StoreError)?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let claims = Claims::for_user(&user, Utc::now(), settings.token_ttl);
    let token = issue_token(&claims, &settings.jwt_secret)?;

    Ok(IssuedToken {
        token,
        expires_at: claims.expires_at(),
        user: user.summary(),
    })
}

/// トークンを検証してプリンシパルを解決する
///
/// 署名・有効期限・ログアウト済みかどうか・利用者の存在を確認する。
pub async fn authenticate(
    deps: &ServiceDependencies,
    settings: &AuthSettings,
    token: &str,
) -> Result<Principal> {
    let claims = verify_token(token, &settings.jwt_secret)?;

    let revoked = deps
        .token_blocklist
        .is_invalidated(token)
        .await
        .map_err(AuthError::StoreError)?;
    if revoked {
        return Err(AuthError::TokenRevoked);
    }

    let principal = claims.into_principal();
    let exists = deps
        .user_directory
        .get_by_id(principal.user_id)
        .await
        .map_err(AuthError::StoreError)?
        .is_some();
    if !exists {
        return Err(AuthError::UnknownUser);
    }

    Ok(principal)
}

/// トークンを無効化する（ログアウト）
#[tracing::instrument(skip(deps, token, principal), fields(user_id = %principal.user_id))]
pub async fn logout(deps: &ServiceDependencies, principal: &Principal, token: &str) -> Result<()> {
    deps.token_blocklist
        .invalidate(token, principal.expires_at)
        .await
        .map_err(AuthError::StoreError)?;

    tracing::info!("User logged out");

    Ok(())
}

/// 利用者一覧
#[tracing::instrument(skip(deps))]
pub async fn list_users(deps: &ServiceDependencies) -> Result<Vec<UserSummary>> {
    deps.user_directory
        .list_all()
        .await
        .map_err(AuthError::StoreError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(name: &str, email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_registration_accepts_valid_input() {
        assert!(validate_registration(&cmd("Alice", "alice@example.com", "password123")).is_ok());
    }

    #[test]
    fn test_validate_registration_rejects_short_password() {
        let result = validate_registration(&cmd("Alice", "alice@example.com", "short"));
        assert!(matches!(result, Err(AuthError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_registration_rejects_bad_email() {
        let result = validate_registration(&cmd("Alice", "alice.example.com", "password123"));
        assert!(matches!(result, Err(AuthError::InvalidInput(_))));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
