//! Account and bearer token service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use pic4pick_common::{AppError, AppResult, config::AuthConfig};
use pic4pick_db::{
    entities::user::{self, UserRole, UserStatus},
    repositories::UserRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i64,
    pub username: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated caller, as carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

impl Identity {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Missing authentication token")]
    Missing,
    #[error("Invalid token")]
    Invalid,
    #[error("Token expired")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub email: Option<String>,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
            status: model.status,
            email: model.email,
        }
    }
}

/// Token plus the account it was issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

/// Input for registering an account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

/// Input for logging in.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Account and token service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_hours: i64,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(user_repo: UserRepository, config: &AuthConfig) -> Self {
        Self {
            user_repo,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    /// Register an active viewer account.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        input.validate()?;
        let user = self.create_user(input, UserRole::Viewer).await?;
        tracing::info!(user_id = user.id, username = %user.username, "Registered user");
        self.respond(user)
    }

    /// Create the first admin. Refused once any admin exists.
    pub async fn init_admin(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        input.validate()?;
        if self.user_repo.admin_exists().await? {
            return Err(AppError::Forbidden(
                "Admin account already initialized".to_string(),
            ));
        }

        let user = self.create_user(input, UserRole::Admin).await?;
        tracing::info!(user_id = user.id, username = %user.username, "Initialized admin account");
        self.respond(user)
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        input.validate()?;

        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

        let user = self
            .user_repo
            .find_by_username(input.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&input.password, &user.password_hash) {
            return Err(invalid());
        }
        if user.status == UserStatus::Disabled {
            return Err(AppError::Forbidden("Account is disabled".to_string()));
        }

        self.respond(user)
    }

    /// Current account details for a verified identity.
    pub async fn me(&self, identity: &Identity) -> AppResult<UserView> {
        self.user_repo.get_by_id(identity.id).await.map(Into::into)
    }

    /// Sign a token for `user`.
    pub fn issue_token(&self, user: &user::Model) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now,
            exp: now + self.token_ttl_hours * 3600,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a bearer token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    async fn create_user(&self, input: RegisterInput, role: UserRole) -> AppResult<user::Model> {
        let username = input.username.trim().to_string();
        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::BadRequest("Username already exists".to_string()));
        }

        let now = Utc::now();
        let model = user::ActiveModel {
            username: Set(username),
            password_hash: Set(hash_password(&input.password)?),
            role: Set(role),
            status: Set(UserStatus::Active),
            email: Set(input.email.filter(|e| !e.trim().is_empty())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        self.user_repo.create(model).await
    }

    fn respond(&self, user: user::Model) -> AppResult<AuthResponse> {
        let token = self.issue_token(&user)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
///
/// Accepts argon2 PHC strings and legacy bcrypt (`$2a$`/`$2b$`/`$2y$`)
/// hashes. A hash that cannot be parsed never matches.
fn verify_password(password: &str, hash: &str) -> bool {
    if hash.starts_with("$2") {
        return bcrypt::verify(password, hash).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unreadable bcrypt password hash");
            false
        });
    }

    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable password hash");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
        }
    }

    fn create_test_user(password: &str, status: UserStatus) -> user::Model {
        user::Model {
            id: 7,
            username: "alice".to_string(),
            password_hash: hash_password(password).unwrap(),
            role: UserRole::Viewer,
            status,
            email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service_with(db: MockDatabase) -> AuthService {
        let repo = UserRepository::new(Arc::new(db.into_connection()));
        AuthService::new(repo, &test_config())
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn test_legacy_bcrypt_hash_verifies() {
        let hash = bcrypt::hash("hunter22", 4).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn test_unparseable_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-hash"));
        assert!(!verify_password("anything", "$2b$broken"));
    }

    #[test]
    fn test_token_roundtrip_carries_identity() {
        let service = service_with(MockDatabase::new(DatabaseBackend::MySql));
        let user = create_test_user("pw", UserStatus::Active);

        let token = service.issue_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, UserRole::Viewer);

        let identity = Identity::from(claims);
        assert!(!identity.is_admin());
    }

    #[test]
    fn test_expired_and_tampered_tokens_are_distinguished() {
        let service = service_with(MockDatabase::new(DatabaseBackend::MySql));
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: "old".to_string(),
            role: UserRole::Admin,
            iat: now - 7200,
            exp: now - 3600,
        };
        let expired = encode(&Header::default(), &claims, &service.encoding_key).unwrap();
        assert_eq!(service.verify_token(&expired), Err(TokenError::Expired));

        assert_eq!(service.verify_token("not-a-jwt"), Err(TokenError::Invalid));

        let other = AuthService::new(
            UserRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::MySql).into_connection(),
            )),
            &AuthConfig {
                jwt_secret: "other-secret".to_string(),
                token_ttl_hours: 1,
            },
        );
        let foreign = other
            .issue_token(&create_test_user("pw", UserStatus::Active))
            .unwrap();
        assert_eq!(service.verify_token(&foreign), Err(TokenError::Invalid));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[create_test_user("right-pass", UserStatus::Active)]]),
        );

        let result = service
            .login(LoginInput {
                username: "alice".to_string(),
                password: "wrong-pass".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_rejects_disabled_account_with_correct_password() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[create_test_user("right-pass", UserStatus::Disabled)]]),
        );

        let result = service
            .login(LoginInput {
                username: "alice".to_string(),
                password: "right-pass".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[create_test_user("right-pass", UserStatus::Active)]]),
        );

        let response = service
            .login(LoginInput {
                username: "alice".to_string(),
                password: "right-pass".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.username, "alice");
        assert_eq!(service.verify_token(&response.token).unwrap().sub, 7);
    }

    #[tokio::test]
    async fn test_login_with_bcrypt_row_issues_token() {
        let mut user = create_test_user("unused", UserStatus::Active);
        user.password_hash = bcrypt::hash("right-pass", 4).unwrap();
        let service =
            service_with(MockDatabase::new(DatabaseBackend::MySql).append_query_results([[user]]));

        let response = service
            .login(LoginInput {
                username: "alice".to_string(),
                password: "right-pass".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(service.verify_token(&response.token).unwrap().sub, 7);
    }

    #[tokio::test]
    async fn test_login_with_corrupt_hash_is_unauthorized() {
        let mut user = create_test_user("unused", UserStatus::Active);
        user.password_hash = "corrupt".to_string();
        let service =
            service_with(MockDatabase::new(DatabaseBackend::MySql).append_query_results([[user]]));

        let result = service
            .login(LoginInput {
                username: "alice".to_string(),
                password: "right-pass".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_init_admin_refused_when_admin_exists() {
        let service = service_with(MockDatabase::new(DatabaseBackend::MySql).append_query_results([
            [maplit::btreemap! {
                "num_items" => sea_orm::Value::Int(Some(1))
            }],
        ]));

        let result = service
            .init_admin(RegisterInput {
                username: "root".to_string(),
                password: "secret123".to_string(),
                email: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[create_test_user("pw", UserStatus::Active)]]),
        );

        let result = service
            .register(RegisterInput {
                username: "alice".to_string(),
                password: "secret123".to_string(),
                email: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_register_input_validation() {
        let input = RegisterInput {
            username: "ab".to_string(),
            password: "123".to_string(),
            email: Some("nope".to_string()),
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("email"));
    }
}
