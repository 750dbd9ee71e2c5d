use std::sync::Arc;

use log::{info, warn};

use super::{AuthResponse, PasswordHasher, TokenError, TokenService, TokenType};
use crate::error::AppError;
use crate::models::{normalize_email, User};
use crate::store::UserStore;

/// Register, login and refresh, built from explicitly passed collaborators.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Creates an account and signs it in.
    ///
    /// The existence check is only a fast path; a concurrent registration that
    /// slips past it is still rejected by the store's uniqueness rule and
    /// reported as `EmailTaken` all the same.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthResponse, AppError> {
        let email = normalize_email(email);
        if self.users.exists_by_email(&email).await? {
            warn!("Registration rejected: email already in use");
            return Err(AppError::EmailTaken);
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .save(User::new(&email, &password_hash, name))
            .await?;

        info!("Registered user {}", user.id);
        self.issue_pair(&user)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let email = normalize_email(email);
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!("Login failed: unknown account");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!("Login failed for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);
        self.issue_pair(&user)
    }

    /// Mints a new access token from a refresh token. The refresh token itself
    /// is handed back unchanged.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AppError> {
        let user_id = self.tokens.extract_subject(refresh_token)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let claims = self.tokens.verify(refresh_token, &user)?;
        if claims.token_type != TokenType::Refresh {
            return Err(TokenError::WrongType {
                expected: TokenType::Refresh,
                actual: claims.token_type,
            }
            .into());
        }

        let access_token = self.tokens.issue_access_token(&user)?;
        Ok(AuthResponse::bearer(
            access_token,
            refresh_token.to_string(),
            self.tokens.access_ttl_secs(),
        ))
    }

    fn issue_pair(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse::bearer(
            self.tokens.issue_access_token(user)?,
            self.tokens.issue_refresh_token(user)?,
            self.tokens.access_ttl_secs(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::error::INVALID_CREDENTIALS_MESSAGE;
    use crate::store::{InMemoryStore, StoreResult};
    use actix_web::ResponseError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    /// Reports every email as free, so only `save` can catch a duplicate.
    /// Stands in for a registration racing another one past the existence check.
    struct StaleExistenceCheck(Arc<InMemoryStore>);

    #[async_trait]
    impl UserStore for StaleExistenceCheck {
        async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
            UserStore::find_by_id(self.0.as_ref(), id).await
        }
        async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
            self.0.find_by_email(email).await
        }
        async fn exists_by_email(&self, _email: &str) -> StoreResult<bool> {
            Ok(false)
        }
        async fn exists_by_id(&self, id: Uuid) -> StoreResult<bool> {
            self.0.exists_by_id(id).await
        }
        async fn find_all(&self) -> StoreResult<Vec<User>> {
            self.0.find_all().await
        }
        async fn save(&self, user: User) -> StoreResult<User> {
            UserStore::save(self.0.as_ref(), user).await
        }
        async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
            UserStore::delete_by_id(self.0.as_ref(), id).await
        }
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        tokens: Arc<TokenService>,
        auth: AuthService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let tokens = Arc::new(TokenService::new(&JwtConfig {
            secret: "test_secret_key_at_least_32_bytes_long!".into(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 7 * 24 * 3600,
        }));
        let auth = AuthService::new(store.clone(), PasswordHasher::new(4), tokens.clone());
        Fixture {
            store,
            tokens,
            auth,
        }
    }

    #[actix_rt::test]
    async fn test_register_then_login_resolves_to_same_user() {
        let f = fixture();

        let registered = f.auth.register("alice@x.com", "secret1", "Alice").await.unwrap();
        let logged_in = f.auth.login("alice@x.com", "secret1").await.unwrap();

        let user = f.store.find_by_email("alice@x.com").await.unwrap().unwrap();
        for response in [&registered, &logged_in] {
            assert_eq!(response.token_type, "Bearer");
            assert_eq!(response.expires_in, 3600);
            let claims = f.tokens.verify(&response.access_token, &user).unwrap();
            assert_eq!(claims.user_id(), Ok(user.id));
        }
    }

    #[actix_rt::test]
    async fn test_password_is_stored_hashed() {
        let f = fixture();
        f.auth.register("alice@x.com", "secret1", "Alice").await.unwrap();

        let user = f.store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert!(user.password_hash.starts_with("$2b$04$"));
        assert!(!user.password_hash.contains("secret1"));
    }

    #[actix_rt::test]
    async fn test_duplicate_email_is_taken_regardless_of_case() {
        let f = fixture();
        f.auth.register("alice@x.com", "secret1", "Alice").await.unwrap();

        let result = f.auth.register("ALICE@x.com", "other12", "Alice 2").await;
        assert!(matches!(result, Err(AppError::EmailTaken)));
    }

    #[actix_rt::test]
    async fn test_store_uniqueness_rejects_duplicate_past_existence_check() {
        let f = fixture();
        let auth = AuthService::new(
            Arc::new(StaleExistenceCheck(f.store.clone())),
            PasswordHasher::new(4),
            f.tokens.clone(),
        );
        auth.register("alice@x.com", "secret1", "Alice").await.unwrap();

        let result = auth.register("Alice@X.com", "other12", "Alice 2").await;

        assert!(matches!(result, Err(AppError::EmailTaken)));
        let accounts = f.store.find_all().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Alice");
    }

    #[actix_rt::test]
    async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
        let f = fixture();
        f.auth.register("alice@x.com", "secret1", "Alice").await.unwrap();

        let wrong_password = f.auth.login("alice@x.com", "wrong").await.unwrap_err();
        let unknown_email = f.auth.login("nobody@x.com", "secret1").await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.status_code(), unknown_email.status_code());
        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[test_log::test(actix_rt::test)]
    async fn test_refresh_returns_access_token_for_same_subject() {
        let f = fixture();
        let pair = f.auth.register("alice@x.com", "secret1", "Alice").await.unwrap();

        let refreshed = f.auth.refresh(&pair.refresh_token).await.unwrap();

        assert_eq!(refreshed.refresh_token, pair.refresh_token);
        assert_eq!(
            f.tokens.extract_subject(&refreshed.access_token),
            f.tokens.extract_subject(&pair.refresh_token)
        );
        let claims = f.tokens.authenticate_access(&refreshed.access_token).unwrap();
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[actix_rt::test]
    async fn test_refresh_with_access_token_is_invalid() {
        let f = fixture();
        let pair = f.auth.register("alice@x.com", "secret1", "Alice").await.unwrap();

        let result = f.auth.refresh(&pair.access_token).await;

        assert!(matches!(
            result,
            Err(AppError::InvalidToken(TokenError::WrongType {
                expected: TokenType::Refresh,
                actual: TokenType::Access,
            }))
        ));
    }

    #[actix_rt::test]
    async fn test_refresh_with_garbage_is_invalid() {
        let f = fixture();
        let result = f.auth.refresh("not-a-token").await;
        assert!(matches!(
            result,
            Err(AppError::InvalidToken(TokenError::Malformed(_)))
        ));
    }

    #[actix_rt::test]
    async fn test_refresh_for_deleted_user_is_invalid_credentials() {
        let f = fixture();
        let pair = f.auth.register("alice@x.com", "secret1", "Alice").await.unwrap();
        let user = f.store.find_by_email("alice@x.com").await.unwrap().unwrap();
        UserStore::delete_by_id(f.store.as_ref(), user.id).await.unwrap();

        let result = f.auth.refresh(&pair.refresh_token).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
}
