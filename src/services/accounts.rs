//! Account management and authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, Role, UpdateUser, User, UserClaims},
    policy::Action,
    repository::Repository,
};

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    config: AuthConfig,
}

impl AccountsService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password, returning a session token and the
    /// user. Unknown email and wrong password produce the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Create a signed session token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + self.config.session_days * 24 * 3600;

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a password against the stored argon2 hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Create a new user account (admin only)
    pub async fn create_user(&self, identity: &UserClaims, user: CreateUser) -> AppResult<User> {
        identity.authorize(Action::ManageAccounts)?;
        self.create_account(user).await
    }

    /// Create an account without an authorization gate; shared by the admin
    /// operation and the startup bootstrap
    async fn create_account(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let hash = self.hash_password(&user.password)?;
        let role = user.role.unwrap_or(Role::Regular);

        self.repository
            .users
            .create(&user.name, &user.email, &hash, role)
            .await
    }

    /// Update an existing user (admin only, partial)
    pub async fn update_user(
        &self,
        identity: &UserClaims,
        id: i32,
        user: UpdateUser,
    ) -> AppResult<User> {
        identity.authorize(Action::ManageAccounts)?;

        self.repository.users.get_by_id(id).await?;

        if let Some(ref email) = user.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }
        }

        let password_hash = match user.password {
            Some(ref password) => Some(self.hash_password(password)?),
            None => None,
        };

        self.repository.users.update(id, &user, password_hash).await
    }

    /// Delete a user (admin only); refused while outstanding borrows exist
    pub async fn delete_user(&self, identity: &UserClaims, id: i32) -> AppResult<()> {
        identity.authorize(Action::ManageAccounts)?;

        self.repository.users.get_by_id(id).await?;

        if self.repository.users.has_outstanding_borrows(id).await? {
            return Err(AppError::Conflict(
                "User still has outstanding borrowed copies".to_string(),
            ));
        }

        self.repository.users.delete(id).await?;
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }

    /// List all user profiles (admin only); the password hash is never
    /// serialized
    pub async fn list_profiles(&self, identity: &UserClaims) -> AppResult<Vec<User>> {
        identity.authorize(Action::ManageAccounts)?;
        self.repository.users.list().await
    }

    /// Get the requesting user's own profile
    pub async fn get_own_profile(&self, identity: &UserClaims) -> AppResult<User> {
        identity.authorize(Action::ViewOwnProfile)?;
        self.repository.users.get_by_id(identity.user_id).await
    }

    /// Create the configured administrator account when the users table is
    /// empty, so a fresh deployment has a usable admin
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let admin = self
            .create_account(CreateUser {
                name: "Administrator".to_string(),
                email: self.config.bootstrap_admin_email.clone(),
                password: self.config.bootstrap_admin_password.clone(),
                role: Some(Role::Administrator),
            })
            .await?;

        tracing::info!(email = %admin.email, "created bootstrap administrator account");
        Ok(())
    }
}
