use serde::{Deserialize, Serialize};

use crate::core::types::{ChapterId, TextId};

/// A chapter of a known text: one corpus entry that fragments are matched against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Unique identifier
    pub id: ChapterId,

    /// Text this chapter belongs to
    pub text_id: TextId,

    /// Period / stage of the chapter (e.g. "Old Babylonian")
    #[serde(default)]
    pub stage: String,

    /// Chapter name within its text
    pub name: String,

    /// Recorded sign text, one manuscript line per line.
    /// Matched as raw text, never parsed into a grid.
    #[serde(default)]
    pub signs: String,
}

impl Chapter {
    pub fn new(
        id: impl Into<String>,
        text_id: impl Into<String>,
        name: impl Into<String>,
        signs: impl Into<String>,
    ) -> Self {
        Self {
            id: ChapterId::new(id),
            text_id: TextId::new(text_id),
            stage: String::new(),
            name: name.into(),
            signs: signs.into(),
        }
    }

    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }

    /// Projection returned by corpus pattern searches
    #[must_use]
    pub fn to_match(&self) -> ChapterMatch {
        ChapterMatch {
            id: self.id.clone(),
            text_id: self.text_id.clone(),
            stage: self.stage.clone(),
            name: self.name.clone(),
        }
    }
}

/// A chapter found by a sign pattern search, without its sign text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterMatch {
    pub id: ChapterId,
    pub text_id: TextId,
    pub stage: String,
    pub name: String,
}

/// A known text, looked up by id for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    pub id: TextId,
    pub name: String,
}

impl TextRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TextId::new(id),
            name: name.into(),
        }
    }
}
