//! Video preview modal
//!
//! Opening a result seeks the player slightly before the matched keyframe.
//! Closing pauses the player and then clears its source so nothing keeps
//! playing behind the page. Every open goes through the close transition
//! first, so the same guarantee holds when switching between results.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PlaybackConfig;
use crate::media::MediaUrls;

/// Playback start for a keyframe: `max(0, index * interval - lookback)`
pub fn start_offset(keyframe_index: u64, frame_interval_seconds: f64, lookback_seconds: f64) -> f64 {
    (keyframe_index as f64 * frame_interval_seconds - lookback_seconds).max(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalPlaybackState {
    pub is_open: bool,
    pub media_id: Option<String>,
    pub start_offset_seconds: f64,
}

impl Default for ModalPlaybackState {
    fn default() -> Self {
        Self {
            is_open: false,
            media_id: None,
            start_offset_seconds: 0.0,
        }
    }
}

/// Side effects applied to the player surface, in order
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Paused,
    SourceCleared,
    Hidden,
    TitleSet(String),
    SourceSet(String),
    Shown,
}

/// What received a click while the modal is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed overlay itself
    Overlay,
    /// Anything inside the content box
    Content,
    CloseButton,
}

/// The `<video>` element behind the modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    src: Option<String>,
    paused: bool,
}

impl Player {
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_playing(&self) -> bool {
        self.src.is_some() && !self.paused
    }
}

#[derive(Debug, Clone)]
pub struct VideoModal {
    state: ModalPlaybackState,
    title: String,
    player: Player,
    urls: MediaUrls,
    timing: PlaybackConfig,
}

impl VideoModal {
    pub fn new(urls: MediaUrls, timing: PlaybackConfig) -> Self {
        Self {
            state: ModalPlaybackState::default(),
            title: String::new(),
            player: Player {
                src: None,
                paused: true,
            },
            urls,
            timing,
        }
    }

    /// Show the preview for a result. An already open modal is closed first.
    pub fn open(&mut self, media_id: &str, keyframe_index: u64) -> Vec<PlayerEvent> {
        let mut events = self.close();

        let offset = start_offset(
            keyframe_index,
            self.timing.frame_interval_seconds,
            self.timing.lookback_seconds,
        );
        let src = self.urls.video_url(media_id, offset);

        self.title = format!("Playing: {}", media_id);
        events.push(PlayerEvent::TitleSet(self.title.clone()));

        self.player.src = Some(src.clone());
        events.push(PlayerEvent::SourceSet(src));

        self.state = ModalPlaybackState {
            is_open: true,
            media_id: Some(media_id.to_string()),
            start_offset_seconds: offset,
        };
        // autoplay starts the player once visible
        self.player.paused = false;
        events.push(PlayerEvent::Shown);

        info!(
            "🎬 Opened preview for {} at frame {} (t={}s)",
            media_id, keyframe_index, offset
        );
        events
    }

    /// Hide the modal. Pauses before clearing the source. No-op when closed.
    pub fn close(&mut self) -> Vec<PlayerEvent> {
        if !self.state.is_open {
            return Vec::new();
        }

        self.player.paused = true;
        self.player.src = None;
        if let Some(media_id) = self.state.media_id.take() {
            debug!("Closed preview for {}", media_id);
        }
        self.state.is_open = false;
        self.state.start_offset_seconds = 0.0;

        vec![PlayerEvent::Paused, PlayerEvent::SourceCleared, PlayerEvent::Hidden]
    }

    /// Route a click inside the modal layer
    pub fn click(&mut self, target: ClickTarget) -> Vec<PlayerEvent> {
        match target {
            ClickTarget::Overlay | ClickTarget::CloseButton => self.close(),
            ClickTarget::Content => Vec::new(),
        }
    }

    pub fn state(&self) -> &ModalPlaybackState {
        &self.state
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }
}
