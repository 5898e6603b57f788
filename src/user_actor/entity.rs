//! Entity trait implementation for the User domain type.
//!
//! See the trait implementation on [`User`] for method documentation.

use super::error::UserError;
use super::seed;
use crate::framework::Entity;
use crate::model::{User, UserCreate, UserFilter, UserId, UserUpdate};
use crate::storage::keys;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Custom actions for User entities.
#[derive(Clone, PartialEq)]
pub enum UserAction {
    /// Stamps `last_login` with the current time.
    RecordLogin,
    /// Replaces the stored password hash.
    SetPasswordHash(String),
}

impl std::fmt::Debug for UserAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserAction::RecordLogin => f.write_str("RecordLogin"),
            UserAction::SetPasswordHash(_) => f.write_str("SetPasswordHash(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserActionResult {
    RecordLogin(DateTime<Utc>),
    PasswordSet,
}

#[async_trait]
impl Entity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = UserAction;
    type ActionResult = UserActionResult;
    type Filter = UserFilter;
    type Context = ();
    type Error = UserError;

    const COLLECTION: &'static str = keys::USERS;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn next_id(existing: &HashMap<UserId, Self>, last_issued: Option<&UserId>) -> UserId {
        let high = existing.keys().chain(last_issued).map(|id| id.0).max().unwrap_or(0);
        UserId(high + 1)
    }

    fn seed() -> Vec<Self> {
        seed::users()
    }

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, UserError> {
        validate_email(&params.email)?;
        Ok(User::new(id, params))
    }

    /// Handles updates to the User entity.
    ///
    /// # Fields Updated
    /// - `name`, `email`, `phone`: contact details
    /// - `role`, `status`: back-office fields
    /// - `addresses`, `notifications`: profile settings
    ///
    /// Stamps `updated_at`.
    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), UserError> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(UserError::ValidationError("name is empty".into()));
            }
            self.name = name;
        }
        if let Some(email) = update.email {
            validate_email(&email)?;
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone).filter(|p| !p.trim().is_empty());
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(addresses) = update.addresses {
            self.addresses = addresses;
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: UserAction,
        _ctx: &(),
    ) -> Result<UserActionResult, UserError> {
        match action {
            UserAction::RecordLogin => {
                let now = Utc::now();
                self.last_login = Some(now);
                Ok(UserActionResult::RecordLogin(now))
            }
            UserAction::SetPasswordHash(hash) => {
                if hash.trim().is_empty() {
                    return Err(UserError::ValidationError("password hash is empty".into()));
                }
                self.password_hash = Some(hash);
                self.updated_at = Utc::now();
                Ok(UserActionResult::PasswordSet)
            }
        }
    }

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        if let Some(phone) = &self.phone {
            fields.push(phone);
        }
        fields
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        filter.matches(self)
    }
}

fn validate_email(email: &str) -> Result<(), UserError> {
    if !email.contains('@') {
        return Err(UserError::ValidationError(format!("invalid email {email}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn user() -> User {
        User::new(
            UserId(3),
            UserCreate {
                name: "Ivan Petrov".into(),
                email: "ivan@example.com".into(),
                phone: Some("+7 900 000-00-00".into()),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_record_login_stamps_last_login() {
        let mut u = user();
        assert!(u.last_login.is_none());
        let result = u.handle_action(UserAction::RecordLogin, &()).await.unwrap();
        let UserActionResult::RecordLogin(at) = result else {
            panic!("unexpected result {result:?}");
        };
        assert_eq!(u.last_login, Some(at));
    }

    #[tokio::test]
    async fn test_set_password_hash() {
        let mut u = user();
        let action = UserAction::SetPasswordHash("$argon2id$v=19$abc".into());
        assert_eq!(format!("{action:?}"), "SetPasswordHash(..)");

        let result = u.handle_action(action, &()).await.unwrap();
        assert_eq!(result, UserActionResult::PasswordSet);
        assert_eq!(u.password_hash.as_deref(), Some("$argon2id$v=19$abc"));

        let blank = u.handle_action(UserAction::SetPasswordHash(" ".into()), &()).await;
        assert!(matches!(blank, Err(UserError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_bad_email() {
        let mut u = user();
        let update = UserUpdate {
            email: Some("nope".into()),
            role: Some(Role::Admin),
            ..Default::default()
        };
        assert!(u.on_update(update, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_update_merges_only_given_fields() {
        let mut u = user();
        u.updated_at = crate::model::seeded_at(0);
        let before = u.clone();
        let update = UserUpdate {
            name: Some("Ivan P.".into()),
            ..Default::default()
        };
        u.on_update(update, &()).await.unwrap();

        assert_eq!(u.name, "Ivan P.");
        assert!(u.updated_at > before.updated_at);
        let restored = User {
            name: before.name.clone(),
            updated_at: before.updated_at,
            ..u
        };
        assert_eq!(restored, before);
    }

    #[test]
    fn test_search_text_includes_phone() {
        assert!(user().search_text().contains(&"+7 900 000-00-00"));
    }
}
