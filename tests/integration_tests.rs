use async_trait::async_trait;
use frame_search_ui::search::SearchTransport;
use frame_search_ui::{
    AppState, Completion, Config, ConfigBuilder, SearchQuery, SearchResult, SearchUiError,
};
use std::time::Duration;
use tempfile::TempDir;

/// Backend stand-in that answers after a delay derived from the query text
struct DelayedBackend;

#[async_trait]
impl SearchTransport for DelayedBackend {
    async fn search(&self, query: &SearchQuery) -> frame_search_ui::Result<Vec<SearchResult>> {
        let delay_ms: u64 = query.query.parse().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        if query.text == "fail" {
            return Err(SearchUiError::Http {
                status: 500,
                message: "An internal error occurred during search.".to_string(),
            });
        }
        Ok(vec![SearchResult {
            video_id: format!("answer-{}", delay_ms),
            keyframe_index: 12,
            rrf_score: 0.05,
            vector_score: None,
            content_score: None,
            metadata_score: None,
        }])
    }
}

#[test]
fn test_slow_older_search_does_not_overwrite_newer() {
    tokio_test::block_on(async {
        let mut app = AppState::new(&Config::default()).unwrap();
        let backend = DelayedBackend;

        app.form.query = Some("80".to_string());
        let slow = app.begin_search();
        app.form.query = Some("5".to_string());
        let fast = app.begin_search();

        let (slow_outcome, fast_outcome) =
            tokio::join!(backend.search(&slow.query), backend.search(&fast.query));

        // Apply in arrival order: the fast one resolves first
        assert!(matches!(
            app.finish_search(&fast, fast_outcome),
            Completion::Success(_)
        ));
        assert_eq!(app.finish_search(&slow, slow_outcome), Completion::Stale);
        assert_eq!(app.results().cards()[0].video_id, "answer-5");
    });
}

#[test]
fn test_failure_leaves_app_ready_for_retry() {
    tokio_test::block_on(async {
        let mut app = AppState::new(&Config::default()).unwrap();
        let backend = DelayedBackend;

        app.form.text = Some("fail".to_string());
        let completion = app.search(&backend).await;
        assert_eq!(
            completion,
            Completion::Failed("An internal error occurred during search.".to_string())
        );

        app.form.text = None;
        assert!(matches!(app.search(&backend).await, Completion::Success(_)));
        assert_eq!(app.results().cards().len(), 1);
    });
}

#[test]
fn test_partial_config_file_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("frame-search.toml");
    std::fs::write(
        &path,
        r#"
[backend]
base_url = "http://search.internal:8000"

[playback]
lookback_seconds = 2.0

[ui]
object_labels = ["person", "car", "bus"]
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.backend.base_url, "http://search.internal:8000");
    assert_eq!(config.backend.search_path, "/search");
    assert_eq!(config.playback.lookback_seconds, 2.0);
    assert_eq!(config.playback.frame_interval_seconds, 1.0);
    assert_eq!(config.ui.object_labels.len(), 3);
    assert_eq!(config.ui.max_object_count, 20);
    assert!(config.validate().is_ok());

    // Labels outside the configured vocabulary are rejected
    let mut app = AppState::new(&config).unwrap();
    assert!(app.add_constraint("truck", 1).is_none());
    assert_eq!(app.take_notice().as_deref(), Some("Unknown object: truck"));
}

#[test]
fn test_saved_config_is_loadable() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("saved.toml");

    let config = ConfigBuilder::new()
        .with_frame_interval(2.0)
        .with_max_object_count(5)
        .build();
    config.save(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.playback.frame_interval_seconds, 2.0);
    assert_eq!(loaded.ui.max_object_count, 5);
}

#[test]
fn test_invalid_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[playback]\nlookback_seconds = \"five\"\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse"));
}
