//! Object constraint list
//!
//! Holds the "must contain object X at least N times" filters. An ordered
//! map from label to minimum count is the source of truth; the removable
//! widgets shown in the filter panel are projected from it, one at a time,
//! as constraints are added and removed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::UiConfig;
use crate::error::ConstraintError;
use crate::results::escape_html;

/// A (label, minimum count) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectConstraint {
    pub label: String,
    pub min_count: u32,
}

/// Removable widget for one constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintWidget {
    pub label: String,
    pub min_count: u32,
}

impl ConstraintWidget {
    fn project(label: &str, min_count: u32) -> Self {
        Self {
            label: label.to_string(),
            min_count,
        }
    }

    pub fn text(&self) -> String {
        format!("{} (Count: >= {})", self.label, self.min_count)
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"object-item\" data-label=\"{label}\" data-count=\"{count}\">\
             <span>{text}</span>\
             <button type=\"button\" class=\"remove-obj-btn\">X</button>\
             </div>",
            label = escape_html(&self.label),
            count = self.min_count,
            text = escape_html(&self.text()),
        )
    }
}

/// Incremental update to the widget list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetChange {
    /// Append this widget at the end of the list
    Appended(ConstraintWidget),
    /// Drop the widget carrying this label
    Removed(String),
}

/// Owns the active object constraints
#[derive(Debug, Clone, Default)]
pub struct ConstraintList {
    entries: IndexMap<String, u32>,
    allowed_labels: Vec<String>,
    max_count: Option<u32>,
}

impl ConstraintList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constraint list bounded the way the object picker is
    pub fn with_bounds(ui: &UiConfig) -> Self {
        Self {
            entries: IndexMap::new(),
            allowed_labels: ui.object_labels.clone(),
            max_count: Some(ui.max_object_count),
        }
    }

    /// Add a constraint. Rejections leave the list untouched.
    pub fn add(&mut self, label: &str, min_count: u32) -> Result<WidgetChange, ConstraintError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ConstraintError::EmptyLabel);
        }
        if self.entries.contains_key(label) {
            return Err(ConstraintError::Duplicate(label.to_string()));
        }
        if !self.allowed_labels.is_empty() && !self.allowed_labels.iter().any(|l| l == label) {
            return Err(ConstraintError::UnknownLabel(label.to_string()));
        }
        if let Some(max) = self.max_count {
            if min_count > max {
                return Err(ConstraintError::CountOutOfRange {
                    count: min_count,
                    max,
                });
            }
        }

        self.entries.insert(label.to_string(), min_count);
        debug!("Added constraint {} >= {}", label, min_count);
        Ok(WidgetChange::Appended(ConstraintWidget::project(label, min_count)))
    }

    /// Remove a constraint. Returns `None` when the label is not present.
    pub fn remove(&mut self, label: &str) -> Option<WidgetChange> {
        let label = label.trim();
        // shift_remove keeps the remaining widgets in insertion order
        self.entries.shift_remove(label).map(|_| {
            debug!("Removed constraint {}", label);
            WidgetChange::Removed(label.to_string())
        })
    }

    /// Ordered (label, min count) pairs, oldest first
    pub fn snapshot(&self) -> Vec<ObjectConstraint> {
        self.entries
            .iter()
            .map(|(label, &min_count)| ObjectConstraint {
                label: label.clone(),
                min_count,
            })
            .collect()
    }

    /// Full widget list, in display order
    pub fn widgets(&self) -> Vec<ConstraintWidget> {
        self.entries
            .iter()
            .map(|(label, &count)| ConstraintWidget::project(label, count))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(list: &ConstraintList) -> Vec<String> {
        list.snapshot().into_iter().map(|c| c.label).collect()
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let mut list = ConstraintList::new();
        assert!(list.add("person", 2).is_ok());

        let err = list.add("person", 5).unwrap_err();
        assert_eq!(err, ConstraintError::Duplicate("person".to_string()));
        assert_eq!(err.to_string(), "Object already added.");

        let snapshot = list.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].min_count, 2);
    }

    #[test]
    fn test_add_then_remove_restores_previous_set() {
        let mut list = ConstraintList::new();
        list.add("car", 1).unwrap();
        list.add("dog", 0).unwrap();
        let before = list.snapshot();

        list.add("person", 3).unwrap();
        assert_eq!(
            list.remove("person"),
            Some(WidgetChange::Removed("person".to_string()))
        );
        assert_eq!(list.snapshot(), before);
    }

    #[test]
    fn test_remove_missing_label_is_noop() {
        let mut list = ConstraintList::new();
        list.add("car", 1).unwrap();
        assert_eq!(list.remove("boat"), None);
        assert_eq!(list.remove("boat"), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_duplicate_reported_before_count_bound() {
        let mut list = ConstraintList::with_bounds(&UiConfig::default());
        list.add("person", 2).unwrap();

        assert_eq!(
            list.add("person", 50),
            Err(ConstraintError::Duplicate("person".to_string()))
        );
        assert_eq!(list.snapshot()[0].min_count, 2);
    }

    #[test]
    fn test_remove_matches_trimmed_label() {
        let mut list = ConstraintList::new();
        list.add(" person", 1).unwrap();

        assert_eq!(
            list.remove(" person"),
            Some(WidgetChange::Removed("person".to_string()))
        );
        assert!(list.is_empty());
    }

    #[test]
    fn test_removal_keeps_insertion_order() {
        let mut list = ConstraintList::new();
        for label in ["a", "b", "c", "d"] {
            list.add(label, 1).unwrap();
        }
        list.remove("b");
        list.add("b", 4).unwrap();
        assert_eq!(labels(&list), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_widgets_match_snapshot() {
        let mut list = ConstraintList::new();
        list.add("person", 2).unwrap();
        list.add("bicycle", 1).unwrap();

        let widget_labels: Vec<String> = list.widgets().into_iter().map(|w| w.label).collect();
        assert_eq!(widget_labels, labels(&list));
    }

    #[test]
    fn test_widget_rendering() {
        let mut list = ConstraintList::new();
        let change = list.add("traffic light", 3).unwrap();
        let WidgetChange::Appended(widget) = change else {
            panic!("expected appended widget");
        };
        assert_eq!(widget.text(), "traffic light (Count: >= 3)");

        let html = widget.to_html();
        assert!(html.contains("data-label=\"traffic light\""));
        assert!(html.contains("data-count=\"3\""));
        assert!(html.contains("&gt;= 3"));
    }

    #[test]
    fn test_bounds_from_ui_config() {
        let ui = UiConfig {
            object_labels: vec!["person".to_string(), "car".to_string()],
            max_object_count: 10,
        };
        let mut list = ConstraintList::with_bounds(&ui);

        assert_eq!(
            list.add("giraffe", 1),
            Err(ConstraintError::UnknownLabel("giraffe".to_string()))
        );
        assert_eq!(
            list.add("car", 11),
            Err(ConstraintError::CountOutOfRange { count: 11, max: 10 })
        );
        assert_eq!(list.add("  ", 1), Err(ConstraintError::EmptyLabel));
        assert!(list.is_empty());
        assert!(list.add("car", 10).is_ok());
    }
}
