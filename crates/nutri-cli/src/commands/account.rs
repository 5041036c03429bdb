use nutri_core::account::store::FileStore;
use nutri_core::account::{Accounts, AuthSettings};
use nutri_core::config::Config;
use nutri_core::error::NutriError;
use std::io::{self, BufRead, Write};

fn open(config: &Config) -> Result<Accounts<FileStore>, NutriError> {
    let store = FileStore::open(&config.data_dir)?;
    Accounts::hydrate(store, AuthSettings::from_config(config))
}

/// Use the flag value, or read one line from stdin after a prompt on stderr.
fn secret(value: Option<String>, prompt: &str) -> Result<String, NutriError> {
    if let Some(v) = value {
        return Ok(v);
    }
    eprint!("{prompt}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn signup(
    config: &Config,
    email: &str,
    password: Option<String>,
    confirm: Option<String>,
) -> Result<(), NutriError> {
    let mut accounts = open(config)?;
    let password = secret(password, "Password")?;
    let confirm = secret(confirm, "Confirm password")?;
    accounts.signup(email, &password, &confirm)?;
    println!("Registered {}. Sign in with `nutri account login`.", email.trim());
    Ok(())
}

pub fn login(config: &Config, email: &str, password: Option<String>) -> Result<(), NutriError> {
    let mut accounts = open(config)?;
    let password = secret(password, "Password")?;
    let session = accounts.login(email, &password)?;
    println!("Signed in as {} ({}).", session.email, session.role);
    Ok(())
}

pub fn logout(config: &Config) -> Result<(), NutriError> {
    let mut accounts = open(config)?;
    let was_signed_in = accounts.session().is_some();
    accounts.logout()?;
    if was_signed_in {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub fn whoami(config: &Config) -> Result<(), NutriError> {
    let accounts = open(config)?;
    match accounts.session() {
        Some(session) => println!("{} ({})", session.email, session.role),
        None => println!("Not signed in."),
    }
    Ok(())
}

pub fn hash_password(config: &Config, password: Option<String>) -> Result<(), NutriError> {
    let password = secret(password, "Password")?;
    if password.is_empty() {
        return Err(NutriError::validation("password", "password is required"));
    }
    println!("{}", bcrypt::hash(password, config.bcrypt_cost)?);
    Ok(())
}

pub fn list_users(config: &Config) -> Result<(), NutriError> {
    let accounts = open(config)?;
    let users = accounts.list_users()?;
    if users.is_empty() {
        println!("No registered users.");
        return Ok(());
    }
    println!("Registered users ({}):\n", users.len());
    for email in &users {
        println!("  {email}");
    }
    Ok(())
}

pub fn edit_user(
    config: &Config,
    email: &str,
    new_email: &str,
    password: Option<String>,
) -> Result<(), NutriError> {
    let mut accounts = open(config)?;
    accounts.require_admin()?;
    let password = secret(password, "New password")?;
    accounts.update_user(email, new_email, &password)?;
    println!("Updated {} -> {}.", email.trim(), new_email.trim());
    Ok(())
}

pub fn delete_user(config: &Config, email: &str) -> Result<(), NutriError> {
    let mut accounts = open(config)?;
    accounts.delete_user(email)?;
    println!("Deleted {}.", email.trim());
    Ok(())
}
