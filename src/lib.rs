/// Frame Search UI
///
/// Interaction layer for a keyframe video search page: object constraints,
/// query assembly, the search request cycle, result cards and the video
/// preview modal.

pub mod app;
pub mod command;
pub mod config;
pub mod constraints;
pub mod error;
pub mod media;
pub mod modal;
pub mod query;
pub mod results;
pub mod search;

// Re-export main types for easy access
pub use crate::app::AppState;
pub use crate::config::{Config, ConfigBuilder};
pub use crate::constraints::{ConstraintList, ObjectConstraint, WidgetChange};
pub use crate::error::{ConstraintError, Result, SearchUiError};
pub use crate::modal::{ClickTarget, ModalPlaybackState, VideoModal};
pub use crate::query::{FormFields, SearchQuery};
pub use crate::results::{ResultsArea, ResultsRenderer};
pub use crate::search::{Completion, HttpSearchClient, SearchResult, SearchSession, SearchTransport};
