use std::path::Path;

use crate::core::fragment::Fragment;
use crate::corpus::source::{CorpusError, FragmentSource, Page};

/// Fragments loaded from a JSON array of `{ "id", "notes", "signs" }` records
#[derive(Debug, Default, Clone)]
pub struct FragmentStore {
    fragments: Vec<Fragment>,
}

impl FragmentStore {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Load fragments from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse fragments from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of fragment records.
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl FragmentSource for FragmentStore {
    fn fragments(&self, page: Page) -> Result<Vec<Fragment>, CorpusError> {
        let mut annotated: Vec<&Fragment> =
            self.fragments.iter().filter(|f| f.has_signs()).collect();
        annotated.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(page.apply(annotated.into_iter()).cloned().collect())
    }
}
