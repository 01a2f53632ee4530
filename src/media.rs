//! Frame image and video addresses
//!
//! Both resources live on the search backend's origin. Frames are addressed
//! by `(video_id, keyframe_index)`, videos by `video_id` with a `#t=<seconds>`
//! playback fragment for the start offset.

use url::Url;

use crate::config::BackendConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct MediaUrls {
    base: Url,
    frames_path: String,
    videos_path: String,
    placeholder: String,
}

impl MediaUrls {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base = config.base()?;
        let placeholder = base.join(&config.placeholder_path)?.to_string();
        Ok(Self {
            base,
            frames_path: config.frames_path.trim_end_matches('/').to_string(),
            videos_path: config.videos_path.trim_end_matches('/').to_string(),
            placeholder,
        })
    }

    pub fn frame_url(&self, video_id: &str, keyframe_index: u64) -> String {
        let path = format!(
            "{}/{}/{}",
            self.frames_path,
            encode_id(video_id),
            keyframe_index
        );
        self.resolve(&path)
    }

    /// Video address seeked to `start_seconds`
    pub fn video_url(&self, video_id: &str, start_seconds: f64) -> String {
        let path = format!("{}/{}", self.videos_path, encode_id(video_id));
        match self.base.join(&path) {
            Ok(mut url) => {
                url.set_fragment(Some(&format!("t={}", start_seconds)));
                url.to_string()
            }
            Err(_) => format!("{}#t={}", path, start_seconds),
        }
    }

    pub fn placeholder_url(&self) -> &str {
        &self.placeholder
    }

    fn resolve(&self, path: &str) -> String {
        self.base
            .join(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| path.to_string())
    }
}

/// Percent-encode each segment of a video id, keeping `/` separators
fn encode_id(video_id: &str) -> String {
    video_id
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
