//! The shapes the note store exchanges with us. Notes come back from searches in bincode, while
//! everything we send (and labels) goes over JSON.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// A note as returned by a search.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Note {
    /// The note's unique identifier in the store.
    pub id: Uuid,
    /// The title of the note, which is where bucket identifiers live.
    pub title: String,
    /// The checklist items on this note. Plain-text notes have no checklist at all, which is
    /// distinct from a checklist with no items in it.
    pub items: Option<Vec<ListItem>>,
}
impl Note {
    /// Whether or not this note is a checklist (even an empty one).
    pub fn is_checklist(&self) -> bool {
        self.items.is_some()
    }

    pub fn checked_count(&self) -> usize {
        self.items
            .iter()
            .flatten()
            .filter(|item| item.checked)
            .count()
    }

    pub fn unchecked_count(&self) -> usize {
        self.items
            .iter()
            .flatten()
            .filter(|item| !item.checked)
            .count()
    }
}

/// A single checklist item.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ListItem {
    pub text: String,
    pub checked: bool,
}

/// A label that can be attached to notes.
#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Label {
    pub id: Uuid,
    pub name: String,
}

/// A request to create a new checklist note.
#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct NewNote {
    pub title: String,
    pub items: Vec<ListItem>,
    /// The IDs of the labels to attach.
    pub labels: Vec<Uuid>,
    pub color: Option<Color>,
}

/// The colours a note can be displayed in.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
    DarkBlue,
    Purple,
    Pink,
    Brown,
    Gray,
}
impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the same spellings as the serialised form, plus a few loose ones from configs
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "default" | "white" => Ok(Self::Default),
            "red" => Ok(Self::Red),
            "orange" => Ok(Self::Orange),
            "yellow" => Ok(Self::Yellow),
            "green" => Ok(Self::Green),
            "teal" => Ok(Self::Teal),
            "blue" => Ok(Self::Blue),
            "dark_blue" | "darkblue" => Ok(Self::DarkBlue),
            "purple" => Ok(Self::Purple),
            "pink" => Ok(Self::Pink),
            "brown" => Ok(Self::Brown),
            "gray" | "grey" => Ok(Self::Gray),
            _ => anyhow::bail!("unknown note colour '{s}'"),
        }
    }
}
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Teal => "teal",
            Self::Blue => "blue",
            Self::DarkBlue => "dark_blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Brown => "brown",
            Self::Gray => "gray",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_items() {
        let note = Note {
            id: Uuid::nil(),
            title: "Habits 2024-01-01".to_string(),
            items: Some(vec![
                ListItem {
                    text: "run".to_string(),
                    checked: true,
                },
                ListItem {
                    text: "read".to_string(),
                    checked: false,
                },
                ListItem {
                    text: "write".to_string(),
                    checked: false,
                },
            ]),
        };
        assert!(note.is_checklist());
        assert_eq!((note.checked_count(), note.unchecked_count()), (1, 2));

        let plain = Note { items: None, ..note };
        assert!(!plain.is_checklist());
        assert_eq!((plain.checked_count(), plain.unchecked_count()), (0, 0));
    }

    #[test]
    fn parses_colours() {
        assert_eq!("Dark Blue".parse::<Color>().unwrap(), Color::DarkBlue);
        assert_eq!("grey".parse::<Color>().unwrap(), Color::Gray);
        assert!("magenta".parse::<Color>().is_err());
        assert_eq!(Color::DarkBlue.to_string(), "dark_blue");
    }

    #[test]
    fn new_notes_serialise_as_json() {
        let note = NewNote {
            title: "Habits 2024-01-01".to_string(),
            items: vec![ListItem {
                text: "run".to_string(),
                checked: false,
            }],
            labels: vec![Uuid::nil()],
            color: Some(Color::DarkBlue),
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["color"], "dark_blue");
        assert_eq!(json["items"][0]["checked"], false);
        assert_eq!(json["labels"][0], Uuid::nil().to_string());
    }
}
