use chrono::Utc;
use rand::RngCore;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::Service;
use crate::contract::model::{AuthToken, NewUser, User, UserPatch};
use crate::domain::error::DomainError;

/// Lower-case the domain part of an address, keep the local part verbatim.
///
/// `Test2@Example.com` becomes `Test2@example.com`.
pub fn normalize_email(raw: &str) -> String {
    let email = raw.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// 40 hex characters from 20 random bytes.
fn generate_token_key() -> String {
    let mut bytes = [0u8; 20];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl Service {
    #[instrument(name = "recipes.service.create_user", skip(self, new_user), fields(email = %new_user.email))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        self.insert_user(new_user, false).await
    }

    #[instrument(name = "recipes.service.create_superuser", skip(self, new_user), fields(email = %new_user.email))]
    pub async fn create_superuser(&self, new_user: NewUser) -> Result<User, DomainError> {
        self.insert_user(new_user, true).await
    }

    async fn insert_user(&self, new_user: NewUser, elevated: bool) -> Result<User, DomainError> {
        info!("Creating new user");

        let email = self.validate_email(&new_user.email)?;
        self.validate_password(&new_user.password)?;
        let name = self.validate_display_name(&new_user.name)?;

        if self.users.email_exists(&email).await? {
            return Err(DomainError::email_already_exists(email));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash: self.passwords.hash(&new_user.password)?,
            is_active: true,
            is_staff: elevated,
            is_superuser: elevated,
            created_at: now,
            updated_at: now,
        };
        // A concurrent insert can still win between the check and the write.
        if !self.users.insert(user.clone()).await? {
            return Err(DomainError::email_already_exists(user.email));
        }

        info!(user_id = %user.id, "Successfully created user");
        Ok(user)
    }

    #[instrument(name = "recipes.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(name = "recipes.service.update_user", skip(self, patch), fields(user_id = %id))]
    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");

        let mut current = self.get_user(id).await?;

        if let Some(ref raw) = patch.email {
            let email = self.validate_email(raw)?;
            if email != current.email && self.users.email_exists(&email).await? {
                return Err(DomainError::email_already_exists(email));
            }
            current.email = email;
        }
        if let Some(ref name) = patch.name {
            current.name = self.validate_display_name(name)?;
        }
        if let Some(ref password) = patch.password {
            self.validate_password(password)?;
            current.password_hash = self.passwords.hash(password)?;
        }
        current.updated_at = Utc::now();

        if !self.users.update(current.clone()).await? {
            return Err(DomainError::email_already_exists(current.email));
        }
        info!("Successfully updated user");
        Ok(current)
    }

    /// Exchange credentials for the user's token, creating it on first use.
    #[instrument(name = "recipes.service.issue_token", skip(self, password))]
    pub async fn issue_token(&self, email: &str, password: &str) -> Result<AuthToken, DomainError> {
        let email = normalize_email(email);
        let user = match self.users.find_by_email(&email).await? {
            Some(u) if u.is_active && u.check_password(password) => u,
            _ => {
                debug!("Credential check failed");
                return Err(DomainError::InvalidCredentials);
            }
        };

        if let Some(token) = self.users.find_token_for_user(user.id).await? {
            return Ok(token);
        }

        let token = AuthToken {
            key: generate_token_key(),
            user_id: user.id,
            created_at: Utc::now(),
        };
        self.users.insert_token(token.clone()).await?;
        info!(user_id = %user.id, "Issued API token");
        Ok(token)
    }

    /// Resolve a token key; unknown keys and inactive users yield `None`.
    #[instrument(name = "recipes.service.authenticate", skip_all)]
    pub async fn authenticate(&self, key: &str) -> Result<Option<User>, DomainError> {
        let user = self.users.find_user_by_token(key).await?;
        Ok(user.filter(|u| u.is_active))
    }

    // --- validation helpers ---

    fn validate_email(&self, raw: &str) -> Result<String, DomainError> {
        let email = normalize_email(raw);
        if email.is_empty() {
            return Err(DomainError::EmailRequired);
        }
        match email.rsplit_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(DomainError::invalid_email(email)),
        }
        if email.chars().count() > self.config.max_name_length {
            return Err(DomainError::validation("email", "Email address is too long."));
        }
        Ok(email)
    }

    fn validate_password(&self, password: &str) -> Result<(), DomainError> {
        if password.chars().count() < self.config.min_password_length {
            return Err(DomainError::password_too_short(
                self.config.min_password_length,
            ));
        }
        Ok(())
    }

    /// Display names may be empty.
    fn validate_display_name(&self, raw: &str) -> Result<String, DomainError> {
        let name = raw.trim();
        if name.chars().count() > self.config.max_name_length {
            return Err(DomainError::validation("name", "Name is too long."));
        }
        Ok(name.to_string())
    }
}
