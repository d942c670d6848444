use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::chapter::{Chapter, ChapterMatch, TextRecord};
use crate::core::types::{ChapterId, TextId};
use crate::corpus::source::{CorpusError, CorpusLookup};
use crate::matching::matcher::match_chapters;
use crate::matching::pattern::SignPattern;

/// Corpus file version for compatibility checking
pub const CORPUS_VERSION: &str = "1.0.0";

/// Serializable corpus format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusData {
    pub version: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub texts: Vec<TextRecord>,
    pub chapters: Vec<Chapter>,
}

/// In-memory corpus of chapters and the texts they belong to
#[derive(Debug, Default)]
pub struct CorpusStore {
    /// All chapters, in load order
    pub chapters: Vec<Chapter>,

    /// Index: chapter ID -> index in chapters vec
    id_to_index: HashMap<ChapterId, usize>,

    /// Index: text ID -> text record
    texts: HashMap<TextId, TextRecord>,
}

impl CorpusStore {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded sample corpus
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn load_embedded() -> Result<Self, CorpusError> {
        // Validated at compile time by build.rs
        const EMBEDDED_CORPUS: &str = include_str!("../../data/sample_corpus.json");
        Self::from_json(EMBEDDED_CORPUS)
    }

    /// Load a corpus from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a corpus from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or two chapters share an id.
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let data: CorpusData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CORPUS_VERSION {
            warn!(
                expected = CORPUS_VERSION,
                found = %data.version,
                "Corpus version mismatch"
            );
        }

        let mut corpus = Self::new();
        for text in data.texts {
            corpus.add_text(text);
        }
        for chapter in data.chapters {
            corpus.add_chapter(chapter)?;
        }

        debug!(
            chapters = corpus.len(),
            texts = corpus.texts.len(),
            "Loaded corpus"
        );
        Ok(corpus)
    }

    /// Add or replace a text record
    pub fn add_text(&mut self, text: TextRecord) {
        self.texts.insert(text.id.clone(), text);
    }

    /// Add a chapter to the corpus
    ///
    /// CRLF line endings in the sign text are stored as `\n`, since row
    /// patterns join lines with a bare newline.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::DuplicateChapter` if a chapter with the same id exists.
    pub fn add_chapter(&mut self, mut chapter: Chapter) -> Result<(), CorpusError> {
        if self.id_to_index.contains_key(&chapter.id) {
            return Err(CorpusError::DuplicateChapter(chapter.id));
        }
        if chapter.signs.contains('\r') {
            chapter.signs = chapter.signs.replace("\r\n", "\n");
        }
        self.id_to_index
            .insert(chapter.id.clone(), self.chapters.len());
        self.chapters.push(chapter);
        Ok(())
    }

    /// Get a chapter by ID
    pub fn get(&self, id: &ChapterId) -> Option<&Chapter> {
        self.id_to_index.get(id).map(|&idx| &self.chapters[idx])
    }

    /// Get a text by ID
    pub fn text(&self, id: &TextId) -> Option<&TextRecord> {
        self.texts.get(id)
    }

    /// All texts, sorted by id
    pub fn texts(&self) -> Vec<&TextRecord> {
        let mut texts: Vec<_> = self.texts.values().collect();
        texts.sort_by(|a, b| a.id.cmp(&b.id));
        texts
    }

    /// Export corpus to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CorpusError> {
        let data = CorpusData {
            version: CORPUS_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            texts: self.texts().into_iter().cloned().collect(),
            chapters: self.chapters.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of chapters in the corpus
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Check if the corpus has no chapters
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

impl CorpusLookup for CorpusStore {
    fn find_by_sign_pattern(
        &self,
        pattern: &SignPattern,
    ) -> Result<Vec<ChapterMatch>, CorpusError> {
        Ok(match_chapters(pattern, &self.chapters)
            .map(Chapter::to_match)
            .collect())
    }

    fn find_text_name(&self, text_id: &TextId) -> Result<String, CorpusError> {
        self.texts
            .get(text_id)
            .map(|text| text.name.clone())
            .ok_or_else(|| CorpusError::UnknownText(text_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GridPosition;
    use crate::parsing::signs::parse_signs;

    fn small_corpus() -> CorpusStore {
        let mut corpus = CorpusStore::new();
        corpus.add_text(TextRecord::new("t1", "Enūma eliš"));
        corpus
            .add_chapter(Chapter::new("c1", "t1", "I", "A B\nC D").with_stage("Standard Babylonian"))
            .unwrap();
        corpus
            .add_chapter(Chapter::new("c2", "t1", "II", "E F"))
            .unwrap();
        corpus
    }

    #[test]
    fn test_load_embedded_corpus() {
        let corpus = CorpusStore::load_embedded().unwrap();
        assert!(!corpus.is_empty());
        for chapter in &corpus.chapters {
            assert!(
                corpus.find_text_name(&chapter.text_id).is_ok(),
                "chapter {} has unresolvable text",
                chapter.id
            );
        }
    }

    #[test]
    fn test_get_by_id() {
        let corpus = small_corpus();
        let chapter = corpus.get(&ChapterId::new("c1")).unwrap();
        assert_eq!(chapter.name, "I");
        assert_eq!(chapter.stage, "Standard Babylonian");
        assert!(corpus.get(&ChapterId::new("missing")).is_none());
    }

    #[test]
    fn test_duplicate_chapter_rejected() {
        let mut corpus = small_corpus();
        let result = corpus.add_chapter(Chapter::new("c1", "t1", "again", "Z"));
        assert!(matches!(result, Err(CorpusError::DuplicateChapter(_))));
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn test_find_by_sign_pattern() {
        let corpus = small_corpus();
        let pattern = SignPattern::from_grid(&parse_signs("B\nC")).unwrap();
        let matches = corpus.find_by_sign_pattern(&pattern).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, ChapterId::new("c1"));
        assert_eq!(matches[0].text_id, TextId::new("t1"));
    }

    #[test]
    fn test_find_text_name_miss_is_error() {
        let corpus = small_corpus();
        assert_eq!(corpus.find_text_name(&TextId::new("t1")).unwrap(), "Enūma eliš");
        assert!(matches!(
            corpus.find_text_name(&TextId::new("nope")),
            Err(CorpusError::UnknownText(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_chapters() {
        let corpus = small_corpus();
        let json = corpus.to_json().unwrap();
        assert!(json.contains("\"version\""));

        let reloaded = CorpusStore::from_json(&json).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(&ChapterId::new("c2")).unwrap().signs, "E F");
        assert!(reloaded.text(&TextId::new("t1")).is_some());
    }

    #[test]
    fn test_from_json_duplicate_ids() {
        let json = r#"{
            "version": "1.0.0",
            "chapters": [
                {"id": "c1", "text_id": "t1", "name": "I", "signs": "A"},
                {"id": "c1", "text_id": "t1", "name": "II", "signs": "B"}
            ]
        }"#;
        assert!(matches!(
            CorpusStore::from_json(json),
            Err(CorpusError::DuplicateChapter(_))
        ));
    }

    #[test]
    fn test_crlf_chapter_matches_multi_row_pattern() {
        let mut corpus = CorpusStore::new();
        corpus.add_text(TextRecord::new("t1", "Enūma eliš"));
        corpus
            .add_chapter(Chapter::new("c1", "t1", "I", "A B\r\nC D\r\n"))
            .unwrap();
        assert_eq!(corpus.chapters[0].signs, "A B\nC D\n");

        let grid = parse_signs("A B\r\nC");
        let pattern = SignPattern::compile(&grid, GridPosition::new(1, 0)).unwrap();
        let found = corpus.find_by_sign_pattern(&pattern).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ChapterId::new("c1"));
    }

    #[test]
    fn test_from_json_normalizes_crlf() {
        let json = r#"{
            "version": "1.0.0",
            "texts": [{"id": "t1", "name": "Enūma eliš"}],
            "chapters": [{"id": "c1", "text_id": "t1", "name": "I", "signs": "A B\r\nC D"}]
        }"#;
        let corpus = CorpusStore::from_json(json).unwrap();
        assert_eq!(corpus.chapters[0].signs, "A B\nC D");
    }
}
