use crate::account::store::{get_json, set_json, KeyValueStore};
use crate::error::NutriError;
use serde::{Deserialize, Serialize};

pub const USERS_KEY: &str = "users";

/// A registered user. Only the bcrypt hash of the password is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredential {
    pub email: String,
    pub password_hash: String,
}

pub fn load_users(store: &impl KeyValueStore) -> Result<Vec<UserCredential>, NutriError> {
    Ok(get_json(store, USERS_KEY)?.unwrap_or_default())
}

pub fn save_users(
    store: &mut impl KeyValueStore,
    users: &[UserCredential],
) -> Result<(), NutriError> {
    set_json(store, USERS_KEY, &users)
}

pub fn find_user<'a>(users: &'a [UserCredential], email: &str) -> Option<&'a UserCredential> {
    users.iter().find(|u| same_email(&u.email, email))
}

/// Emails compare case-insensitively after trimming.
pub fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Trimmed, non-empty email or a validation error on `field`.
pub fn require_email(field: &str, email: &str) -> Result<String, NutriError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(NutriError::validation(field, "email cannot be empty"));
    }
    Ok(email.to_string())
}

pub fn require_password(field: &str, password: &str) -> Result<(), NutriError> {
    if password.is_empty() {
        return Err(NutriError::validation(field, "password cannot be empty"));
    }
    Ok(())
}
