mod client;
mod note;
mod token;

use anyhow::Result;

pub use client::NoteStore;
pub use note::*;
pub use token::save_token;

/// Anything that can be searched for notes by keyword. The remote store is the real source, but
/// statistics only need this much of it.
pub trait NoteSource {
    /// Finds every note matching the given keyword. Notes that aren't checklists may be included,
    /// and are for the caller to skip.
    fn find(&self, keyword: &str) -> Result<Vec<Note>>;
}
