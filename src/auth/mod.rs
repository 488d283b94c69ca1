//! JWT authentication: registration, login, token validation, and the
//! role-gating middleware used by the HTTP routers.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::user::{self, Entity as UserEntity, UserRole};

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // Subject (user ID)
    pub name: Option<String>, // User's name
    pub email: Option<String>,
    pub role: String, // "customer" or "employee"
    pub jti: String,  // JWT ID (unique identifier for this token)
    pub iat: i64,     // Issued at time
    pub exp: i64,     // Expiration time
    pub nbf: i64,     // Not valid before time
    pub iss: String,  // Issuer
    pub aud: String,  // Audience
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub token_id: String,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    pub fn is_employee(&self) -> bool {
        self.has_role("employee")
    }

    /// Guard for endpoints reserved to workshop staff.
    pub fn require_employee(&self) -> Result<(), crate::errors::ServiceError> {
        if self.is_employee() {
            Ok(())
        } else {
            Err(crate::errors::ServiceError::Forbidden(
                "Employee access required".to_string(),
            ))
        }
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_issuer: String,
        jwt_audience: String,
        access_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            access_token_expiration,
        }
    }
}

/// Authentication service that handles account management and token issuance
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Registers a new customer account and returns a signed token.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterInput) -> Result<(user::Model, AuthToken), AuthError> {
        input
            .validate()
            .map_err(|e| AuthError::InvalidInput(e.to_string()))?;

        let existing = UserEntity::find()
            .filter(user::Column::Email.eq(input.email.clone()))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if existing.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            password_hash: Set(password_hash),
            role: Set(UserRole::Customer),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = model
            .insert(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        info!(user_id = %created.id, "Registered new customer account");

        let token = self.generate_token(&created)?;
        Ok((created, token))
    }

    /// Verifies credentials and returns a signed token.
    #[instrument(skip(self, credentials))]
    pub async fn login(
        &self,
        credentials: LoginCredentials,
    ) -> Result<(user::Model, AuthToken), AuthError> {
        let found = UserEntity::find()
            .filter(user::Column::Email.eq(credentials.email.clone()))
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&credentials.password, &found.password_hash)?;

        let token = self.generate_token(&found)?;
        Ok((found, token))
    }

    /// Loads a user row by id.
    pub async fn get_user(&self, user_id: Uuid) -> Result<user::Model, AuthError> {
        UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?
            .ok_or(AuthError::UserNotFound)
    }

    /// Generates a signed JWT for the given user.
    pub fn generate_token(&self, user: &user::Model) -> Result<AuthToken, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let role = match user.role {
            UserRole::Customer => "customer",
            UserRole::Employee => "employee",
        };

        let claims = Claims {
            sub: user.id.to_string(),
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            role: role.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(AuthToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
        })
    }

    /// Validates a JWT and extracts the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.jwt_audience]);
        validation.set_issuer(&[&self.config.jwt_issuer]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        Ok(claims)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Signed token response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login credentials
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Registration payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient role")]
    InsufficientRole,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Hash error: {0}")]
    HashError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message): (StatusCode, &str, String) = match &self {
            Self::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING",
                "Authentication required".to_string(),
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token".to_string(),
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired".to_string(),
            ),
            Self::TokenCreation(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_TOKEN_CREATION_FAILED",
                msg.clone(),
            ),
            Self::EmailTaken => (
                StatusCode::CONFLICT,
                "AUTH_EMAIL_TAKEN",
                "Email is already registered".to_string(),
            ),
            Self::UserNotFound => (
                StatusCode::NOT_FOUND,
                "AUTH_USER_NOT_FOUND",
                "User not found".to_string(),
            ),
            Self::InsufficientRole => (
                StatusCode::FORBIDDEN,
                "AUTH_INSUFFICIENT_ROLE",
                "Insufficient role".to_string(),
            ),
            Self::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "AUTH_INVALID_INPUT", msg.clone())
            }
            Self::HashError(_) | Self::DatabaseError(_) | Self::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Authentication middleware that extracts and validates bearer tokens.
/// Requires an `Arc<AuthService>` in the request extensions (installed
/// app-wide in `main`).
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication service not available",
            )
                .into_response();
        }
    };

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .map(str::to_string);

    let Some(token) = token else {
        return AuthError::MissingAuth.into_response();
    };

    match auth_service.validate_token(&token) {
        Ok(claims) => {
            let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
                return AuthError::InvalidToken.into_response();
            };
            let user = AuthUser {
                user_id,
                name: claims.name,
                email: claims.email,
                role: claims.role,
                token_id: claims.jti,
            };
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Role middleware to check if a user has the required role
pub async fn role_middleware(
    State(required_role): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = match request.extensions().get::<AuthUser>() {
        Some(user) => user.clone(),
        None => return Err(AuthError::MissingAuth),
    };

    if !user.has_role(&required_role) {
        return Err(AuthError::InsufficientRole);
    }

    Ok(next.run(request).await)
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_role(self, role: &str) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_role(self, role: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            role.to_string(),
            role_middleware,
        ))
        .with_auth()
    }
}

/// Authentication routes
pub fn auth_routes() -> axum::Router<Arc<AuthService>> {
    axum::Router::new()
        .route("/register", axum::routing::post(register_handler))
        .route("/login", axum::routing::post(login_handler))
        .route("/me", axum::routing::get(me_handler))
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: AuthToken,
    user: user::Model,
}

async fn register_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let (user, token) = auth_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

async fn login_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<AuthResponse>, AuthError> {
    let (user, token) = auth_service.login(credentials).await?;
    Ok(Json(AuthResponse { token, user }))
}

/// Returns the account behind the supplied bearer token. Token parsing is
/// done inline because /auth routes sit outside the auth middleware.
async fn me_handler(
    State(auth_service): State<Arc<AuthService>>,
    headers: axum::http::HeaderMap,
) -> Result<Json<user::Model>, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingAuth)?;

    let claims = auth_service.validate_token(token)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
    let user = auth_service.get_user(user_id).await?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn register_input_validation() {
        let bad_email = RegisterInput {
            name: "Ana".into(),
            email: "not-an-email".into(),
            password: "password123".into(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterInput {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "short".into(),
        };
        assert!(short_password.validate().is_err());
    }
}
