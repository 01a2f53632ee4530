//! Search service client
//!
//! [`SearchTransport`] is the seam to the backend; [`HttpSearchClient`] is the
//! reqwest implementation. [`SearchSession`] tracks the loading state and
//! drops responses that a newer submission has superseded.

pub mod client;
pub mod session;

pub use client::HttpSearchClient;
pub use session::{Completion, SearchSession, SearchStatus, Ticket};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::SearchQuery;

/// One ranked frame returned by the search service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub video_id: String,
    pub keyframe_index: u64,
    pub rrf_score: f64,
    #[serde(default)]
    pub vector_score: Option<f64>,
    #[serde(default)]
    pub content_score: Option<f64>,
    #[serde(default)]
    pub metadata_score: Option<f64>,
}

/// Error body sent with a non-2xx response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Trait for search backends
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>>;
}
