//! Annotation metadata attached to types, members and arguments.
//!
//! Only the storage contract lives here; deciding what an annotation means is
//! left to consumers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Annotation values keyed by annotation name, then member name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationMetadata {
    annotations: IndexMap<String, IndexMap<String, String>>,
}

impl AnnotationMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation with its member values.
    pub fn with<'a>(
        mut self,
        annotation: impl Into<String>,
        members: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let values = members
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        self.annotations.insert(annotation.into(), values);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations.contains_key(annotation)
    }

    pub fn value(&self, annotation: &str, member: &str) -> Option<&str> {
        self.annotations
            .get(annotation)
            .and_then(|members| members.get(member))
            .map(String::as_str)
    }

    pub fn annotation_names(&self) -> impl Iterator<Item = &str> {
        self.annotations.keys().map(String::as_str)
    }
}
