use super::{
    auth::{AuthToken, AuthTokenValue, PasswordCredentials, RadioHasher},
    permissions::{Permission, UserRole},
    user_models::{FullProfile, NewUser, User},
    FullUserStore,
};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

pub struct UserManager {
    user_store: Arc<dyn FullUserStore>,
}

impl UserManager {
    pub fn new(user_store: Arc<dyn FullUserStore>) -> Self {
        Self { user_store }
    }

    pub fn add_user(&self, user: &NewUser) -> Result<i64> {
        if user.handle.trim().is_empty() {
            bail!("The user handle cannot be empty.")
        }
        if self.user_store.get_user_by_handle(&user.handle)?.is_some() {
            bail!("User handle already exists.");
        }
        let user_id = self.user_store.create_user(user)?;
        info!("Created user {} ({})", user.handle, user_id);
        Ok(user_id)
    }

    pub fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.user_store.get_user(user_id)
    }

    pub fn get_user_by_handle(&self, handle: &str) -> Result<Option<User>> {
        self.user_store.get_user_by_handle(handle)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.user_store.list_users()
    }

    fn require_user(&self, handle: &str) -> Result<User> {
        self.user_store
            .get_user_by_handle(handle)?
            .with_context(|| format!("User with handle {} not found.", handle))
    }

    pub fn set_user_flags(
        &self,
        handle: &str,
        is_staff: Option<bool>,
        is_dj: Option<bool>,
    ) -> Result<User> {
        let user = self.require_user(handle)?;
        self.user_store.set_user_flags(user.id, is_staff, is_dj)?;
        self.require_user(handle)
    }

    fn create_hashed_password(user_id: i64, password: &str) -> Result<PasswordCredentials> {
        let hasher = RadioHasher::Argon2;
        let salt = hasher.generate_b64_salt();
        let hash = hasher.hash(password.as_bytes(), &salt)?;
        Ok(PasswordCredentials {
            user_id,
            salt,
            hash,
            hasher,
            created: Utc::now(),
            last_tried: None,
            last_used: None,
        })
    }

    /// Sets or replaces the password of a user.
    pub fn set_password(&self, handle: &str, password: &str) -> Result<()> {
        if password.is_empty() {
            bail!("The password cannot be empty.");
        }
        let user = self.require_user(handle)?;
        let credentials = Self::create_hashed_password(user.id, password)?;
        self.user_store.set_password_credentials(&credentials)
    }

    /// Returns a fresh session token when the handle and password match an
    /// active user, Ok(None) otherwise.
    pub fn login(&self, handle: &str, password: &str) -> Result<Option<AuthToken>> {
        let Some(user) = self.user_store.get_user_by_handle(handle)? else {
            debug!("Login attempt for unknown handle {}", handle);
            return Ok(None);
        };
        if !user.is_active {
            debug!("Login attempt for inactive user {}", handle);
            return Ok(None);
        }
        let Some(credentials) = self.user_store.get_password_credentials(user.id)? else {
            return Ok(None);
        };
        let verified = credentials.hasher.verify(password, &credentials.hash)?;
        let now = Utc::now();
        self.user_store
            .record_password_attempt(user.id, now, verified)?;
        if !verified {
            return Ok(None);
        }
        self.user_store.record_login(user.id, now)?;
        Ok(Some(self.generate_auth_token(user.id)?))
    }

    pub fn generate_auth_token(&self, user_id: i64) -> Result<AuthToken> {
        let token = AuthToken {
            user_id,
            value: AuthTokenValue::generate(),
            created: Utc::now(),
            last_used: None,
        };
        self.user_store.add_user_auth_token(&token)?;
        Ok(token)
    }

    pub fn issue_token_for_handle(&self, handle: &str) -> Result<AuthToken> {
        let user = self.require_user(handle)?;
        self.generate_auth_token(user.id)
    }

    pub fn get_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>> {
        self.user_store.get_user_auth_token(value)
    }

    pub fn touch_auth_token(&self, value: &AuthTokenValue) -> Result<()> {
        self.user_store
            .update_user_auth_token_last_used_timestamp(value)
    }

    pub fn delete_auth_token(&self, user_id: i64, token_value: &AuthTokenValue) -> Result<()> {
        let removed = self.user_store.delete_user_auth_token(token_value)?;
        match removed {
            Some(removed) => {
                if removed.user_id == user_id {
                    Ok(())
                } else {
                    self.user_store.add_user_auth_token(&removed)?;
                    bail!(
                        "Tried to delete an auth token of user {}, but the authenticated user {} was not the owner.",
                        removed.user_id,
                        user_id
                    )
                }
            }
            None => bail!("Did not find the auth token."),
        }
    }

    pub fn get_user_tokens(&self, handle: &str) -> Result<Vec<AuthToken>> {
        let user = self.require_user(handle)?;
        self.user_store.get_user_auth_tokens(user.id)
    }

    pub fn get_user_role(&self, user_id: i64) -> Result<Option<UserRole>> {
        Ok(self
            .user_store
            .get_user(user_id)?
            .map(|u| UserRole::from_flags(u.is_staff, u.is_dj)))
    }

    pub fn get_user_permissions(&self, user_id: i64) -> Result<Vec<Permission>> {
        Ok(self
            .get_user_role(user_id)?
            .map(|role| role.permissions().to_vec())
            .unwrap_or_default())
    }

    pub fn get_profile_for_user(&self, user_id: i64) -> Result<Option<FullProfile>> {
        self.user_store.get_profile_for_user(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::create_tmp_store;
    use crate::user::ProfileStore;

    fn manager() -> (UserManager, Arc<crate::store::SqliteRadioStore>, tempfile::TempDir) {
        let (store, temp_dir) = create_tmp_store();
        let store = Arc::new(store);
        (UserManager::new(store.clone()), store, temp_dir)
    }

    fn new_user(handle: &str) -> NewUser {
        NewUser {
            handle: handle.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_empty_and_duplicate_handles() {
        let (manager, _store, _temp_dir) = manager();
        assert!(manager.add_user(&new_user("")).is_err());
        manager.add_user(&new_user("alice")).unwrap();
        let err = manager.add_user(&new_user("alice")).unwrap_err();
        assert_eq!(err.to_string(), "User handle already exists.");
    }

    #[test]
    fn login_with_password() {
        let (manager, _store, _temp_dir) = manager();
        let user_id = manager.add_user(&new_user("bob")).unwrap();
        manager.set_password("bob", "hunter2").unwrap();

        assert!(manager.login("bob", "wrong").unwrap().is_none());
        assert!(manager.login("nobody", "hunter2").unwrap().is_none());

        let token = manager.login("bob", "hunter2").unwrap().unwrap();
        assert_eq!(token.user_id, user_id);
        assert!(manager.get_auth_token(&token.value).unwrap().is_some());
        assert!(manager.get_user(user_id).unwrap().unwrap().last_login.is_some());
    }

    #[test]
    fn disabled_profile_cannot_login() {
        let (manager, store, _temp_dir) = manager();
        let user_id = manager.add_user(&new_user("carol")).unwrap();
        manager.set_password("carol", "pw").unwrap();
        let profile = manager.get_profile_for_user(user_id).unwrap().unwrap();
        store
            .set_profile_enabled(profile.profile.id, false, "banned")
            .unwrap();
        assert!(manager.login("carol", "pw").unwrap().is_none());
    }

    #[test]
    fn only_owner_deletes_token() {
        let (manager, _store, _temp_dir) = manager();
        let owner = manager.add_user(&new_user("dave")).unwrap();
        let other = manager.add_user(&new_user("erin")).unwrap();
        let token = manager.generate_auth_token(owner).unwrap();

        assert!(manager.delete_auth_token(other, &token.value).is_err());
        assert!(manager.get_auth_token(&token.value).unwrap().is_some());

        manager.delete_auth_token(owner, &token.value).unwrap();
        assert!(manager.get_auth_token(&token.value).unwrap().is_none());
        assert!(manager.delete_auth_token(owner, &token.value).is_err());
    }

    #[test]
    fn permissions_follow_flags() {
        let (manager, _store, _temp_dir) = manager();
        let user_id = manager.add_user(&new_user("frank")).unwrap();
        assert_eq!(
            manager.get_user_role(user_id).unwrap(),
            Some(UserRole::Listener)
        );
        manager.set_user_flags("frank", None, Some(true)).unwrap();
        assert!(manager
            .get_user_permissions(user_id)
            .unwrap()
            .contains(&Permission::ControlPlayback));
        assert!(manager.get_user_permissions(999).unwrap().is_empty());
    }
}
