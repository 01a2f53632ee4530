use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::SearchResult;
use crate::error::Result;
use crate::query::SearchQuery;

/// Loading state of the results area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Loading { seq: u64 },
}

/// Handle for one submission
#[derive(Debug, Clone)]
pub struct Ticket {
    pub seq: u64,
    pub issued_at: DateTime<Utc>,
    pub query: SearchQuery,
}

/// What to do with a finished request
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Hand these to the results renderer
    Success(Vec<SearchResult>),
    /// Show this message in the results area
    Failed(String),
    /// A newer submission was issued; leave the results area alone
    Stale,
}

/// Sequences submissions so that only the newest response is shown
#[derive(Debug)]
pub struct SearchSession {
    next_seq: u64,
    status: SearchStatus,
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            next_seq: 1,
            status: SearchStatus::Idle,
        }
    }

    /// Enter `Loading` for a new submission
    pub fn begin(&mut self, query: SearchQuery) -> Ticket {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let SearchStatus::Loading { seq: pending } = self.status {
            info!("Search #{} supersedes pending search #{}", seq, pending);
        }
        self.status = SearchStatus::Loading { seq };

        info!(
            "🔍 Search #{} submitted (query={:?}, objects={})",
            seq,
            query.query,
            query.objects.len()
        );
        Ticket {
            seq,
            issued_at: Utc::now(),
            query,
        }
    }

    /// Settle a submission. Only the latest issued ticket can leave `Loading`.
    pub fn complete(&mut self, ticket: &Ticket, outcome: Result<Vec<SearchResult>>) -> Completion {
        let elapsed_ms = (Utc::now() - ticket.issued_at).num_milliseconds();

        if self.status != (SearchStatus::Loading { seq: ticket.seq }) {
            warn!(
                "Discarding response for search #{} after {}ms: superseded",
                ticket.seq, elapsed_ms
            );
            return Completion::Stale;
        }
        self.status = SearchStatus::Idle;

        match outcome {
            Ok(results) => {
                info!(
                    "✅ Search #{} returned {} results in {}ms",
                    ticket.seq,
                    results.len(),
                    elapsed_ms
                );
                Completion::Success(results)
            }
            Err(e) => {
                warn!("❌ Search #{} failed after {}ms: {}", ticket.seq, elapsed_ms, e);
                Completion::Failed(e.display_message())
            }
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, SearchStatus::Loading { .. })
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchUiError;
    use crate::query::{build, FormFields};

    fn result(video_id: &str) -> SearchResult {
        SearchResult {
            video_id: video_id.to_string(),
            keyframe_index: 1,
            rrf_score: 0.5,
            vector_score: None,
            content_score: None,
            metadata_score: None,
        }
    }

    #[test]
    fn test_loading_then_success() {
        let mut session = SearchSession::new();
        assert_eq!(session.status(), SearchStatus::Idle);

        let ticket = session.begin(build(&FormFields::default(), &[]));
        assert!(session.is_loading());

        let done = session.complete(&ticket, Ok(vec![result("a")]));
        assert_eq!(done, Completion::Success(vec![result("a")]));
        assert_eq!(session.status(), SearchStatus::Idle);
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let mut session = SearchSession::new();
        let ticket = session.begin(build(&FormFields::default(), &[]));

        let done = session.complete(&ticket, Err(SearchUiError::Transport("connection refused".into())));
        assert_eq!(done, Completion::Failed("Network error: connection refused".to_string()));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = SearchSession::new();
        let first = session.begin(build(&FormFields::default(), &[]));
        let second = session.begin(build(&FormFields::default(), &[]));
        assert!(second.seq > first.seq);

        // Newer response arrives first, then the older one
        assert_eq!(
            session.complete(&second, Ok(vec![result("new")])),
            Completion::Success(vec![result("new")])
        );
        assert_eq!(session.complete(&first, Ok(vec![result("old")])), Completion::Stale);
        assert_eq!(session.status(), SearchStatus::Idle);
    }

    #[test]
    fn test_older_response_while_newer_pending() {
        let mut session = SearchSession::new();
        let first = session.begin(build(&FormFields::default(), &[]));
        let second = session.begin(build(&FormFields::default(), &[]));

        assert_eq!(session.complete(&first, Ok(vec![])), Completion::Stale);
        assert_eq!(session.status(), SearchStatus::Loading { seq: second.seq });
    }
}
