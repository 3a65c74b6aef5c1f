//! Identifier-keyed registries for formatters and translators.
//!
//! Registries are populated by explicit registration calls at process
//! start. Lookup failure signals a configuration error (a missing or
//! misspelled identifier) and is surfaced immediately by consumers rather
//! than deferred to the first row.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Registry lookup errors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistryError {
    /// No entry registered under the identifier
    #[error("Unknown {kind}: '{identifier}'")]
    Unknown { kind: String, identifier: String },
}

struct RegistryEntry<T> {
    identifier: String,
    label: String,
    entry: T,
}

/// Insertion-ordered mapping from a string identifier to an
/// implementation, with labeled choices for declaration validation.
pub struct Registry<T> {
    kind: &'static str,
    entries: Vec<RegistryEntry<T>>,
}

impl<T> Registry<T> {
    /// `kind` names what the registry holds ("formatter", "translator")
    /// and appears in error messages.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Registers an entry. Re-registering an identifier replaces the entry
    /// in place, keeping its original position.
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        label: impl Into<String>,
        entry: T,
    ) {
        let identifier = identifier.into();
        let label = label.into();

        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.identifier == identifier)
        {
            debug!("Replacing {} '{}'", self.kind, identifier);
            existing.label = label;
            existing.entry = entry;
            return;
        }

        debug!("Registered {} '{}'", self.kind, identifier);
        self.entries.push(RegistryEntry {
            identifier,
            label,
            entry,
        });
    }

    pub fn get(&self, identifier: &str) -> Result<&T, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.identifier == identifier)
            .map(|e| &e.entry)
            .ok_or_else(|| RegistryError::Unknown {
                kind: self.kind.to_string(),
                identifier: identifier.to_string(),
            })
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.iter().any(|e| e.identifier == identifier)
    }

    /// Ordered (identifier, label) pairs for UI choices and declaration
    /// validation.
    pub fn choices(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.identifier.clone(), e.label.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
