use anyhow::{Context, Result};
use keyring::Entry;

/// The keyring service session tokens are saved under (one entry per email).
const SERVICE: &str = "keeptally";

fn entry_for(email: &str) -> Result<Entry> {
    Entry::new(SERVICE, email).with_context(|| format!("failed to open keyring entry for {email}"))
}

/// Saves the session token for the given user in the system keyring.
pub fn save_token(email: &str, token: &str) -> Result<()> {
    write_token(&entry_for(email)?, token)
        .with_context(|| format!("failed to save token for {email} in keyring"))
}

/// Loads the session token for the given user, if one has been saved.
pub fn load_token(email: &str) -> Result<Option<String>> {
    read_token(&entry_for(email)?)
        .with_context(|| format!("failed to load token for {email} from keyring"))
}

fn write_token(entry: &Entry, token: &str) -> keyring::Result<()> {
    entry.set_password(token)
}

/// Reads the token from the given entry. A missing or blank entry is no token at all.
fn read_token(entry: &Entry) -> keyring::Result<Option<String>> {
    match entry.get_password() {
        Ok(token) if !token.is_empty() => Ok(Some(token)),
        Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err),
    }
}
