use super::note::{Label, NewNote, Note};
use super::{token, NoteSource};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// A session with the remote note store, authenticated with a bearer token.
pub struct NoteStore {
    address: String,
    token: String,
}
impl NoteStore {
    /// Logs into the note store at the given address, returning a fresh session token. This does
    /// not save the token anywhere.
    pub fn login(address: &str, email: &str, password: &str) -> Result<String> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }
        #[derive(Deserialize)]
        struct LoginResponse {
            token: String,
        }

        let mut res = ureq::post(&format!("http://{address}/auth/login"))
            .config()
            .http_status_as_error(false)
            .build()
            .send_json(LoginRequest { email, password })?;
        if res.status() != 200 {
            bail!(
                "failed to log into {address} as {email}, received status {}",
                res.status()
            );
        }

        let res: LoginResponse = serde_json::from_reader(res.body_mut().as_reader())
            .with_context(|| format!("failed to deserialize login response from {address}"))?;
        Ok(res.token)
    }

    /// Resumes a session with the token saved for the given user, checking the store still
    /// accepts it.
    pub fn resume(address: &str, email: &str) -> Result<Self> {
        let token = token::load_token(email)?.with_context(|| {
            format!("no saved token for {email}, please authenticate with `keeptally login`")
        })?;
        let store = Self {
            address: address.to_string(),
            token,
        };

        let res = ureq::get(&store.url("/auth/session"))
            .config()
            .http_status_as_error(false)
            .build()
            .header("Authorization", store.bearer())
            .call()?;
        if res.status() != 200 {
            bail!(
                "the saved token for {email} was rejected by {address} (status {}), try re-authenticating with `keeptally login`",
                res.status()
            );
        }
        info!("resumed session with {address} as {email}");

        Ok(store)
    }

    /// Lists every label defined in the store.
    pub fn labels(&self) -> Result<Vec<Label>> {
        let mut res = ureq::get(&self.url("/labels"))
            .config()
            .http_status_as_error(false)
            .build()
            .header("Authorization", self.bearer())
            .call()?;
        if res.status() != 200 {
            bail!(
                "failed to fetch labels from {}, received status {}",
                self.address,
                res.status()
            );
        }

        serde_json::from_reader(res.body_mut().as_reader())
            .with_context(|| format!("failed to deserialize labels from {}", self.address))
    }

    /// Creates a new note in the store.
    pub fn create(&self, note: &NewNote) -> Result<()> {
        let res = ureq::post(&self.url("/notes"))
            .config()
            .http_status_as_error(false)
            .build()
            .header("Authorization", self.bearer())
            .send_json(note)?;
        if res.status() != 200 && res.status() != 201 {
            bail!(
                "failed to create note '{}' in {}, received status {}",
                note.title,
                self.address,
                res.status()
            );
        }
        debug!("created note '{}'", note.title);

        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.address)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
impl NoteSource for NoteStore {
    fn find(&self, keyword: &str) -> Result<Vec<Note>> {
        let keyword_url = urlencoding::encode(keyword);
        let mut res = ureq::get(&self.url(&format!("/notes/search/{keyword_url}")))
            .config()
            .http_status_as_error(false)
            .build()
            .header("Authorization", self.bearer())
            .query("use_bincode", "true")
            .call()?;
        if res.status() != 200 {
            bail!(
                "failed to search {} for '{keyword}', received status {}",
                self.address,
                res.status()
            );
        }

        let notes: Vec<Note> = bincode::deserialize_from(res.body_mut().as_reader())
            .with_context(|| format!("failed to deserialize notes matching '{keyword}'"))?;
        debug!("found {} notes matching '{keyword}'", notes.len());
        Ok(notes)
    }
}
