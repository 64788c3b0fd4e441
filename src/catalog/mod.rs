//! Catalog Module
//!
//! Game records and the per-row editor.

pub mod editor;
pub mod form;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque primary key of a game row. The service may hand it out as a
/// JSON number or string; it is kept as text either way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

impl Serialize for GameId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One row of the `games` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "game_id")]
    pub id: GameId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
}

impl Game {
    pub fn new(id: impl Into<String>, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: GameId::new(id),
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

/// Update body: the identifier is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GamePatch {
    pub name: String,
    pub image_url: String,
}

/// Parent-supplied listing reload, invoked after a successful mutation.
pub type Refetch = Arc<dyn Fn() + Send + Sync>;

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Re-exports
pub use editor::RowEditor;
pub use form::EditGameForm;
