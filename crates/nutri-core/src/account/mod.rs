//! Local user accounts and the signed-in session.
//!
//! `Accounts` is the session context: it is hydrated from the store when the
//! program starts, updated on login, and cleared on logout. Admin-only
//! operations check the current session before touching the user list.

pub mod session;
pub mod store;
pub mod users;

use crate::config::Config;
use crate::error::NutriError;
use session::{Role, Session, SESSION_KEY};
use store::{get_json, set_json, KeyValueStore};
use tracing::{info, warn};
use users::{
    find_user, load_users, require_email, require_password, same_email, save_users, UserCredential,
};

/// Credential settings taken from configuration.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub admin_email: String,
    pub admin_password_hash: Option<String>,
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            admin_email: config.admin_email.clone(),
            admin_password_hash: config.admin_password_hash.clone(),
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

pub struct Accounts<S: KeyValueStore> {
    store: S,
    settings: AuthSettings,
    session: Option<Session>,
}

impl<S: KeyValueStore> Accounts<S> {
    /// Load the persisted session, if any. A corrupt session record is
    /// discarded and the user starts signed out.
    pub fn hydrate(mut store: S, settings: AuthSettings) -> Result<Self, NutriError> {
        let session = match get_json::<Session>(&store, SESSION_KEY) {
            Ok(session) => session,
            Err(NutriError::Json(e)) => {
                warn!(error = %e, "discarding unreadable session record");
                store.remove(SESSION_KEY)?;
                None
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            store,
            settings,
            session,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new user.
    pub fn signup(&mut self, email: &str, password: &str, confirm: &str) -> Result<(), NutriError> {
        let email = require_email("email", email)?;
        require_password("password", password)?;
        if password != confirm {
            return Err(NutriError::validation("confirm", "passwords do not match"));
        }

        let mut users = load_users(&self.store)?;
        if same_email(&email, &self.settings.admin_email) || find_user(&users, &email).is_some() {
            return Err(NutriError::DuplicateUser(email));
        }

        let password_hash = bcrypt::hash(password, self.settings.bcrypt_cost)?;
        users.push(UserCredential {
            email: email.clone(),
            password_hash,
        });
        save_users(&mut self.store, &users)?;
        info!(%email, "user registered");
        Ok(())
    }

    /// Sign in as the admin or as a registered user and persist the session.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&Session, NutriError> {
        let email = email.trim();
        let session = if self.is_admin_login(email, password) {
            Session {
                email: self.settings.admin_email.clone(),
                role: Role::Admin,
            }
        } else {
            let users = load_users(&self.store)?;
            let user = find_user(&users, email).ok_or(NutriError::InvalidCredentials)?;
            if !verify_password(password, &user.password_hash, &user.email) {
                return Err(NutriError::InvalidCredentials);
            }
            Session {
                email: user.email.clone(),
                role: Role::User,
            }
        };

        set_json(&mut self.store, SESSION_KEY, &session)?;
        info!(email = %session.email, role = %session.role, "signed in");
        let session: &Session = self.session.insert(session);
        Ok(session)
    }

    fn is_admin_login(&self, email: &str, password: &str) -> bool {
        if !same_email(email, &self.settings.admin_email) {
            return false;
        }
        match self.settings.admin_password_hash {
            Some(ref hash) => verify_password(password, hash, email),
            None => {
                warn!("admin login attempted but no admin password hash is configured");
                false
            }
        }
    }

    /// Clear the session in memory and in the store.
    pub fn logout(&mut self) -> Result<(), NutriError> {
        self.store.remove(SESSION_KEY)?;
        if let Some(session) = self.session.take() {
            info!(email = %session.email, "signed out");
        }
        Ok(())
    }

    pub fn require_admin(&self) -> Result<&Session, NutriError> {
        match self.session {
            Some(ref s) if s.is_admin() => Ok(s),
            Some(ref s) => Err(NutriError::Forbidden(format!(
                "'{}' is not an administrator",
                s.email
            ))),
            None => Err(NutriError::Forbidden("sign in as admin first".into())),
        }
    }

    /// Registered user emails, in registration order. Admin only.
    pub fn list_users(&self) -> Result<Vec<String>, NutriError> {
        self.require_admin()?;
        Ok(load_users(&self.store)?
            .into_iter()
            .map(|u| u.email)
            .collect())
    }

    /// Replace a user's email and password. Admin only.
    pub fn update_user(
        &mut self,
        email: &str,
        new_email: &str,
        new_password: &str,
    ) -> Result<(), NutriError> {
        self.require_admin()?;
        let new_email = require_email("new_email", new_email)?;
        require_password("new_password", new_password)?;

        let mut users = load_users(&self.store)?;
        let idx = users
            .iter()
            .position(|u| same_email(&u.email, email))
            .ok_or_else(|| NutriError::UserNotFound(email.trim().to_string()))?;

        let collides = same_email(&new_email, &self.settings.admin_email)
            || users
                .iter()
                .enumerate()
                .any(|(i, u)| i != idx && same_email(&u.email, &new_email));
        if collides {
            return Err(NutriError::DuplicateUser(new_email));
        }

        users[idx] = UserCredential {
            email: new_email.clone(),
            password_hash: bcrypt::hash(new_password, self.settings.bcrypt_cost)?,
        };
        save_users(&mut self.store, &users)?;
        let old_email = email.trim();
        info!(old = %old_email, new = %new_email, "user updated");
        Ok(())
    }

    /// Remove a user. Admin only.
    pub fn delete_user(&mut self, email: &str) -> Result<(), NutriError> {
        self.require_admin()?;
        let mut users = load_users(&self.store)?;
        let before = users.len();
        users.retain(|u| !same_email(&u.email, email));
        if users.len() == before {
            return Err(NutriError::UserNotFound(email.trim().to_string()));
        }
        save_users(&mut self.store, &users)?;
        let email = email.trim();
        info!(%email, "user deleted");
        Ok(())
    }
}

/// Check a password against a stored hash. An unreadable hash counts as a
/// mismatch so callers cannot tell it apart from a wrong password.
fn verify_password(password: &str, hash: &str, email: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            warn!(%email, error = %e, "stored password hash is unreadable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::store::MemoryStore;

    fn settings() -> AuthSettings {
        AuthSettings {
            admin_email: "admin".into(),
            admin_password_hash: Some(bcrypt::hash("s3cret", 4).unwrap()),
            bcrypt_cost: 4,
        }
    }

    fn accounts() -> Accounts<MemoryStore> {
        Accounts::hydrate(MemoryStore::new(), settings()).unwrap()
    }

    #[test]
    fn test_signup_and_login() {
        let mut acc = accounts();
        acc.signup("ada@example.org", "pw1", "pw1").unwrap();
        let session = acc.login("ada@example.org", "pw1").unwrap();
        assert_eq!(session.role, Role::User);
        assert_eq!(acc.session().unwrap().email, "ada@example.org");
    }

    #[test]
    fn test_password_is_hashed() {
        let mut acc = accounts();
        acc.signup("ada@example.org", "plain-text", "plain-text").unwrap();
        let raw = acc.store().get(users::USERS_KEY).unwrap().unwrap();
        assert!(!raw.contains("plain-text"));
    }

    #[test]
    fn test_signup_validation() {
        let mut acc = accounts();
        let err = acc.signup(" ", "pw", "pw").unwrap_err();
        assert!(matches!(err, NutriError::Validation { ref field, .. } if field == "email"));
        let err = acc.signup("a@b.c", "", "").unwrap_err();
        assert!(matches!(err, NutriError::Validation { ref field, .. } if field == "password"));
        let err = acc.signup("a@b.c", "pw", "other").unwrap_err();
        assert!(matches!(err, NutriError::Validation { ref field, .. } if field == "confirm"));
    }

    #[test]
    fn test_duplicate_signup_rejected() {
        let mut acc = accounts();
        acc.signup("ada@example.org", "pw", "pw").unwrap();
        assert!(matches!(
            acc.signup("ADA@example.org", "pw2", "pw2"),
            Err(NutriError::DuplicateUser(_))
        ));
        assert!(matches!(
            acc.signup("admin", "pw", "pw"),
            Err(NutriError::DuplicateUser(_))
        ));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let mut acc = accounts();
        acc.signup("ada@example.org", "pw", "pw").unwrap();
        assert!(matches!(
            acc.login("ada@example.org", "nope"),
            Err(NutriError::InvalidCredentials)
        ));
        assert!(matches!(
            acc.login("ghost@example.org", "pw"),
            Err(NutriError::InvalidCredentials)
        ));
        assert!(acc.session().is_none());
    }

    #[test]
    fn test_corrupt_hash_is_invalid_credentials() {
        let mut acc = accounts();
        acc.signup("ada@example.org", "pw", "pw").unwrap();
        let mut users = load_users(acc.store()).unwrap();
        users[0].password_hash = "not-a-bcrypt-hash".into();
        save_users(&mut acc.store, &users).unwrap();

        assert!(matches!(
            acc.login("ada@example.org", "pw"),
            Err(NutriError::InvalidCredentials)
        ));
        assert!(acc.session().is_none());

        let mut s = settings();
        s.admin_password_hash = Some("garbage".into());
        let mut acc = Accounts::hydrate(MemoryStore::new(), s).unwrap();
        assert!(matches!(
            acc.login("admin", "anything"),
            Err(NutriError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_admin_login_and_gating() {
        let mut acc = accounts();
        acc.signup("ada@example.org", "pw", "pw").unwrap();

        assert!(matches!(acc.list_users(), Err(NutriError::Forbidden(_))));
        acc.login("ada@example.org", "pw").unwrap();
        assert!(matches!(acc.list_users(), Err(NutriError::Forbidden(_))));

        let session = acc.login("admin", "s3cret").unwrap();
        assert_eq!(session.role, Role::Admin);
        assert_eq!(acc.list_users().unwrap(), vec!["ada@example.org"]);
    }

    #[test]
    fn test_admin_disabled_without_hash() {
        let mut s = settings();
        s.admin_password_hash = None;
        let mut acc = Accounts::hydrate(MemoryStore::new(), s).unwrap();
        assert!(matches!(
            acc.login("admin", "anything"),
            Err(NutriError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_admin_edit_and_delete() {
        let mut acc = accounts();
        acc.signup("ada@example.org", "pw", "pw").unwrap();
        acc.signup("bob@example.org", "pw", "pw").unwrap();
        acc.login("admin", "s3cret").unwrap();

        assert!(matches!(
            acc.update_user("ada@example.org", "bob@example.org", "x"),
            Err(NutriError::DuplicateUser(_))
        ));
        assert!(matches!(
            acc.update_user("ada@example.org", "", "x"),
            Err(NutriError::Validation { .. })
        ));
        assert!(matches!(
            acc.update_user("nobody@example.org", "n@example.org", "x"),
            Err(NutriError::UserNotFound(_))
        ));

        acc.update_user("ada@example.org", "ada@new.org", "fresh").unwrap();
        assert_eq!(acc.list_users().unwrap(), vec!["ada@new.org", "bob@example.org"]);

        acc.delete_user("bob@example.org").unwrap();
        assert!(matches!(
            acc.delete_user("bob@example.org"),
            Err(NutriError::UserNotFound(_))
        ));
        assert_eq!(acc.list_users().unwrap(), vec!["ada@new.org"]);

        acc.logout().unwrap();
        acc.login("ada@new.org", "fresh").unwrap();
    }

    #[test]
    fn test_session_hydrates_and_clears() {
        let mut acc = accounts();
        acc.signup("ada@example.org", "pw", "pw").unwrap();
        acc.login("ada@example.org", "pw").unwrap();

        let store = acc.store().clone();
        let mut restored = Accounts::hydrate(store, settings()).unwrap();
        assert_eq!(restored.session().unwrap().email, "ada@example.org");

        restored.logout().unwrap();
        assert!(restored.session().is_none());
        assert!(restored.store().get(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_session_discarded() {
        let mut store = MemoryStore::new();
        store.set(SESSION_KEY, "{not json").unwrap();
        let acc = Accounts::hydrate(store, settings()).unwrap();
        assert!(acc.session().is_none());
        assert!(acc.store().get(SESSION_KEY).unwrap().is_none());
    }
}
