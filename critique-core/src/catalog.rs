//! Fixed, ordered catalog of selectable review models.

use crate::error::CatalogError;

/// One selectable review model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub id: String,
    pub provider: String,
    pub label: String,
}

impl ModelEntry {
    pub fn new(id: &str, provider: &str, label: &str) -> Self {
        Self {
            id: id.to_owned(),
            provider: provider.to_owned(),
            label: label.to_owned(),
        }
    }
}

/// Non-empty list of models with unique ids, kept in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: Vec<ModelEntry>,
}

impl ModelCatalog {
    /// Builds a catalog, rejecting empty lists and duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Empty`] or [`CatalogError::DuplicateId`].
    pub fn new(entries: Vec<ModelEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.id == entry.id) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The models offered out of the box.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                ModelEntry::new("gpt-4o", "openai", "GPT-4o"),
                ModelEntry::new("gpt-4o-mini", "openai", "GPT-4o mini"),
                ModelEntry::new("gemini-1.5-pro", "google", "Gemini 1.5 Pro"),
                ModelEntry::new("llama-3.1-70b", "meta", "Llama 3.1 70B"),
                ModelEntry::new("deepseek-coder", "deepseek", "DeepSeek Coder"),
            ],
        }
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// First entry; the catalog is never empty.
    pub fn default_entry(&self) -> &ModelEntry {
        &self.entries[0]
    }

    /// Id of the entry `step` places after `id`, wrapping in both directions.
    ///
    /// Unknown ids resolve relative to the first entry.
    pub fn cycle(&self, id: &str, step: isize) -> &ModelEntry {
        let len = self.entries.len() as isize;
        let pos = self.entries.iter().position(|e| e.id == id).unwrap_or(0) as isize;
        let next = (pos + step).rem_euclid(len) as usize;
        &self.entries[next]
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_duplicate_catalogs() {
        assert_eq!(ModelCatalog::new(Vec::new()), Err(CatalogError::Empty));
        let dup = vec![ModelEntry::new("a", "x", "A"), ModelEntry::new("a", "y", "A2")];
        assert_eq!(
            ModelCatalog::new(dup),
            Err(CatalogError::DuplicateId("a".to_owned()))
        );
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let catalog = ModelCatalog::new(vec![
            ModelEntry::new("a", "p", "A"),
            ModelEntry::new("b", "p", "B"),
            ModelEntry::new("c", "p", "C"),
        ])
        .unwrap();
        assert_eq!(catalog.cycle("c", 1).id, "a");
        assert_eq!(catalog.cycle("a", -1).id, "c");
        assert_eq!(catalog.cycle("missing", 1).id, "b");
        assert_eq!(catalog.default_entry().id, "a");
    }
}
