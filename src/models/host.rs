//! Host model.
//!
//! Hosts take meetings. Availability is implicit: every host can take one
//! meeting in each of the calendar's slots.

use serde::{Deserialize, Serialize};

/// A host that meeting requests are assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    /// Unique host identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Expertise tags the host covers.
    #[serde(default)]
    pub expertise: Vec<String>,
}

impl Host {
    /// Creates a host with no name and no expertise.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            expertise: Vec::new(),
        }
    }

    /// Sets the host name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds an expertise tag.
    pub fn with_expertise(mut self, tag: impl Into<String>) -> Self {
        self.expertise.push(tag.into());
        self
    }

    /// Whether the host covers a tag (case-insensitive).
    pub fn covers(&self, tag: &str) -> bool {
        let tag = normalize_tag(tag);
        self.expertise.iter().any(|t| normalize_tag(t) == tag)
    }

    /// Name to show in schedules; falls back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Canonical form for comparing expertise tags.
pub(crate) fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_builder() {
        let h = Host::new("h1")
            .with_name("Dr. Smith")
            .with_expertise("AI")
            .with_expertise("Machine Learning");

        assert_eq!(h.id, "h1");
        assert_eq!(h.display_name(), "Dr. Smith");
        assert!(h.covers("ai"));
        assert!(h.covers(" machine learning "));
        assert!(!h.covers("Quantum"));
    }

    #[test]
    fn test_display_name_fallback() {
        let h = Host::new("h2");
        assert_eq!(h.display_name(), "h2");
    }

    #[test]
    fn test_host_json_ignores_availability() {
        let h: Host = serde_json::from_str(
            r#"{"id":"h1","name":"Dr. Jones","expertise":["Quantum"],"availability":[{"day":"Monday"}]}"#,
        )
        .unwrap();
        assert_eq!(h.name, "Dr. Jones");
        assert_eq!(h.expertise.len(), 1);
    }
}
