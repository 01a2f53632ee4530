//! Search query assembly

use serde::{Deserialize, Serialize};

use crate::constraints::ObjectConstraint;

/// Raw values of the search form. A field the form does not carry is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub query: Option<String>,
    pub text: Option<String>,
    pub metadata: Option<String>,
}

impl FormFields {
    /// Collect fields from name/value pairs as a form submission delivers them.
    /// Unknown names are ignored and the last value for a name wins.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut fields = Self::default();
        for (name, value) in pairs {
            match name {
                "query" => fields.query = Some(value.to_string()),
                "text" => fields.text = Some(value.to_string()),
                "metadata" => fields.metadata = Some(value.to_string()),
                _ => {}
            }
        }
        fields
    }
}

/// Body of a search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub text: String,
    pub metadata: String,
    /// `[label, min_count]` pairs, in the order the constraints were added
    pub objects: Vec<(String, u32)>,
}

/// Build the request body from the form and a constraint snapshot.
///
/// No validation happens here: an empty query is legal and left to the backend.
pub fn build(form: &FormFields, constraints: &[ObjectConstraint]) -> SearchQuery {
    SearchQuery {
        query: form.query.clone().unwrap_or_default(),
        text: form.text.clone().unwrap_or_default(),
        metadata: form.metadata.clone().unwrap_or_default(),
        objects: constraints
            .iter()
            .map(|c| (c.label.clone(), c.min_count))
            .collect(),
    }
}
