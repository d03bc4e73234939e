//! Meeting request model.
//!
//! A request asks for one meeting with some host. Its importance drives
//! both the objective of the binary model and the order of the greedy
//! fallback.

use serde::{Deserialize, Serialize};

/// Importance assumed when the input omits it.
pub const DEFAULT_IMPORTANCE: f64 = 50.0;

/// A meeting request to be scheduled.
///
/// Immutable once loaded; the builder methods exist for constructing
/// requests in code and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Unique request identifier.
    pub id: String,
    /// Non-negative importance score (higher = more valuable to schedule).
    #[serde(
        rename = "importanceScore",
        alias = "importance",
        default = "default_importance"
    )]
    pub importance: f64,
    /// Preferred date tags, in input order (ISO dates or weekday names).
    #[serde(default)]
    pub preferred_dates: Vec<String>,
    /// Expertise tags the requester needs the host to cover.
    #[serde(default, alias = "requiredExpertise", alias = "topics")]
    pub expertise: Vec<String>,
    /// Name of the attendee or company making the request.
    #[serde(default, alias = "company", skip_serializing_if = "Option::is_none")]
    pub attendee_name: Option<String>,
    /// Meeting topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

fn default_importance() -> f64 {
    DEFAULT_IMPORTANCE
}

impl Request {
    /// Creates a request with default importance and no preferences.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            importance: DEFAULT_IMPORTANCE,
            preferred_dates: Vec::new(),
            expertise: Vec::new(),
            attendee_name: None,
            topic: None,
        }
    }

    /// Sets the importance score.
    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = importance;
        self
    }

    /// Adds a preferred date tag.
    pub fn with_preferred_date(mut self, date: impl Into<String>) -> Self {
        self.preferred_dates.push(date.into());
        self
    }

    /// Adds a required expertise tag.
    pub fn with_expertise(mut self, tag: impl Into<String>) -> Self {
        self.expertise.push(tag.into());
        self
    }

    /// Sets the attendee name.
    pub fn with_attendee(mut self, name: impl Into<String>) -> Self {
        self.attendee_name = Some(name.into());
        self
    }

    /// Sets the topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Whether the request names any preferred dates.
    pub fn has_preferences(&self) -> bool {
        !self.preferred_dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let r = Request::new("r1")
            .with_importance(90.0)
            .with_preferred_date("2025-11-15")
            .with_expertise("AI")
            .with_attendee("TechCorp")
            .with_topic("Roadmap");

        assert_eq!(r.id, "r1");
        assert!((r.importance - 90.0).abs() < 1e-10);
        assert_eq!(r.preferred_dates, vec!["2025-11-15".to_string()]);
        assert_eq!(r.expertise, vec!["AI".to_string()]);
        assert_eq!(r.attendee_name.as_deref(), Some("TechCorp"));
        assert_eq!(r.topic.as_deref(), Some("Roadmap"));
        assert!(r.has_preferences());
    }

    #[test]
    fn test_request_json_aliases() {
        let r: Request =
            serde_json::from_str(r#"{"id":"r1","importance":70,"topics":["ML"],"company":"Acme"}"#)
                .unwrap();
        assert!((r.importance - 70.0).abs() < 1e-10);
        assert_eq!(r.expertise, vec!["ML".to_string()]);
        assert_eq!(r.attendee_name.as_deref(), Some("Acme"));

        let r: Request = serde_json::from_str(r#"{"id":"r2","importanceScore":12.5}"#).unwrap();
        assert!((r.importance - 12.5).abs() < 1e-10);
        assert!(!r.has_preferences());
    }

    #[test]
    fn test_request_default_importance() {
        let r: Request = serde_json::from_str(r#"{"id":"r3"}"#).unwrap();
        assert!((r.importance - DEFAULT_IMPORTANCE).abs() < 1e-10);
        assert!(r.expertise.is_empty());
    }
}
