//! Credentials and their verification.
//!
//! The session delegates "is this password right for this email" to a
//! [`CredentialVerifier`], so the production path hashes with argon2 while
//! tests can swap in [`AcceptAnyPassword`].

use crate::clients::UserClient;
use crate::model::{Role, User, UserCreate, UserStatus};
use crate::order_actor::OrderError;
use crate::storage::StorageError;
use crate::user_actor::UserError;
use crate::framework::EntityClient;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Length rule shared by registration, password changes and resets.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Login form.
#[derive(Clone, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Registration form.
#[derive(Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

impl Registration {
    /// Checks the form before anything is written.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.name.trim().is_empty() {
            return Err(AuthError::Validation("name is required".into()));
        }
        if !self.email.contains('@') {
            return Err(AuthError::Validation("email is invalid".into()));
        }
        validate_password(&self.password)
    }

    /// `Admin` when the email contains `marker`, otherwise `Customer`.
    pub fn role(&self, marker: Option<&str>) -> Role {
        match marker {
            Some(marker) if self.email.to_lowercase().contains(&marker.to_lowercase()) => Role::Admin,
            _ => Role::Customer,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Password hashing failed")]
    PasswordHash,
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Decides whether a credential identifies a user.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Hashes a password for storage on a new account.
    fn hash_password(&self, password: &str) -> Result<String, AuthError>;

    /// Returns the user the credential belongs to.
    async fn verify(&self, users: &UserClient, credential: &Credential) -> Result<User, AuthError>;
}

/// Argon2id password hashes stored on the user record.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Verifier;

#[async_trait]
impl CredentialVerifier for Argon2Verifier {
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    async fn verify(&self, users: &UserClient, credential: &Credential) -> Result<User, AuthError> {
        let Some(user) = users.find_by_email(&credential.email).await? else {
            debug!(email = %credential.email, "Unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        if user.status == UserStatus::Banned {
            debug!(user_id = %user.id, "Banned account");
            return Err(AuthError::InvalidCredentials);
        }
        let Some(stored) = user.password_hash.as_deref() else {
            debug!(user_id = %user.id, "Account has no password");
            return Err(AuthError::InvalidCredentials);
        };
        let parsed = PasswordHash::new(stored).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(credential.password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)?;
        Ok(user)
    }
}

/// Test double: any password is right, unknown emails get a fresh customer account.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAnyPassword;

#[cfg(any(test, feature = "testing"))]
#[async_trait]
impl CredentialVerifier for AcceptAnyPassword {
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{}", password.len()))
    }

    async fn verify(&self, users: &UserClient, credential: &Credential) -> Result<User, AuthError> {
        if let Some(user) = users.find_by_email(&credential.email).await? {
            return Ok(user);
        }
        let name = credential
            .email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or("Customer")
            .to_string();
        let id = users
            .create_user(UserCreate {
                name,
                email: credential.email.trim().to_string(),
                ..Default::default()
            })
            .await?;
        users
            .get(id)
            .await?
            .ok_or_else(|| AuthError::User(UserError::NotFound(id.to_string())))
    }
}
