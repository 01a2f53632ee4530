//! Result grid rendering

use std::fmt::Write as _;

use crate::media::MediaUrls;
use crate::search::SearchResult;

const SEARCHING_TEXT: &str = "Searching...";
const EMPTY_TEXT: &str = "No results found.";
const NOT_APPLICABLE: &str = "N/A";

/// Frame thumbnail with a one-shot fallback to the placeholder image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub src: String,
    placeholder: String,
    fell_back: bool,
}

impl Thumbnail {
    fn new(src: String, placeholder: &str) -> Self {
        Self {
            src,
            placeholder: placeholder.to_string(),
            fell_back: false,
        }
    }

    /// Image failed to load. Swaps in the placeholder the first time and
    /// returns whether the source changed; later failures are ignored.
    pub fn on_load_error(&mut self) -> bool {
        if self.fell_back {
            return false;
        }
        self.fell_back = true;
        self.src = self.placeholder.clone();
        true
    }

    pub fn is_placeholder(&self) -> bool {
        self.fell_back
    }
}

/// One rendered result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub video_id: String,
    pub keyframe_index: u64,
    pub thumbnail: Thumbnail,
    pub heading: String,
    pub rrf_score: String,
    pub vector_score: String,
    pub content_score: String,
    pub metadata_score: String,
}

impl ResultCard {
    pub fn to_html(&self) -> String {
        // The browser swaps in the placeholder itself, once
        let onerror = if self.thumbnail.fell_back {
            String::new()
        } else {
            format!(
                " onerror=\"this.onerror=null;this.src='{}';\"",
                escape_html(&self.thumbnail.placeholder)
            )
        };
        format!(
            "<div class=\"result-item\">\
             <img src=\"{src}\" alt=\"Frame from {id}\" class=\"result-item-image\" \
             data-video-id=\"{id}\" data-keyframe-index=\"{index}\"{onerror}>\
             <div class=\"result-info\">\
             <h3>{heading}</h3>\
             <p><strong>RRF Score: {rrf}</strong></p>\
             <div class=\"result-scores\">\
             Vector Dist: {vector}<br>\
             Content Score: {content}<br>\
             Metadata Score: {metadata}\
             </div></div></div>",
            src = escape_html(&self.thumbnail.src),
            id = escape_html(&self.video_id),
            index = self.keyframe_index,
            heading = escape_html(&self.heading),
            rrf = self.rrf_score,
            vector = self.vector_score,
            content = self.content_score,
            metadata = self.metadata_score,
        )
    }
}

/// Contents of the results area
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsArea {
    #[default]
    Blank,
    Searching,
    Empty,
    Error(String),
    Grid(Vec<ResultCard>),
}

impl ResultsArea {
    pub fn cards(&self) -> &[ResultCard] {
        match self {
            ResultsArea::Grid(cards) => cards,
            _ => &[],
        }
    }

    pub fn card_mut(&mut self, position: usize) -> Option<&mut ResultCard> {
        match self {
            ResultsArea::Grid(cards) => cards.get_mut(position),
            _ => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            ResultsArea::Blank => String::new(),
            ResultsArea::Searching => format!("<p>{}</p>", SEARCHING_TEXT),
            ResultsArea::Empty => format!("<p>{}</p>", EMPTY_TEXT),
            ResultsArea::Error(message) => format!(
                "<p class=\"error\">An error occurred: {}</p>",
                escape_html(message)
            ),
            ResultsArea::Grid(cards) => cards.iter().map(ResultCard::to_html).collect(),
        }
    }

    /// Plain-text rendering for the terminal
    pub fn to_text(&self) -> String {
        match self {
            ResultsArea::Blank => String::new(),
            ResultsArea::Searching => SEARCHING_TEXT.to_string(),
            ResultsArea::Empty => EMPTY_TEXT.to_string(),
            ResultsArea::Error(message) => format!("An error occurred: {}", message),
            ResultsArea::Grid(cards) => {
                let mut out = String::new();
                for (i, card) in cards.iter().enumerate() {
                    let _ = writeln!(out, "[{}] {}", i + 1, card.heading);
                    let _ = writeln!(out, "    RRF Score: {}", card.rrf_score);
                    let _ = writeln!(
                        out,
                        "    Vector Dist: {} | Content Score: {} | Metadata Score: {}",
                        card.vector_score, card.content_score, card.metadata_score
                    );
                    let _ = writeln!(out, "    {}", card.thumbnail.src);
                }
                out
            }
        }
    }
}

/// Builds result cards in backend order
#[derive(Debug, Clone)]
pub struct ResultsRenderer {
    urls: MediaUrls,
}

impl ResultsRenderer {
    pub fn new(urls: MediaUrls) -> Self {
        Self { urls }
    }

    pub fn render(&self, results: &[SearchResult]) -> ResultsArea {
        if results.is_empty() {
            return ResultsArea::Empty;
        }

        let placeholder = self.urls.placeholder_url();
        let cards = results
            .iter()
            .map(|r| ResultCard {
                video_id: r.video_id.clone(),
                keyframe_index: r.keyframe_index,
                thumbnail: Thumbnail::new(
                    self.urls.frame_url(&r.video_id, r.keyframe_index),
                    placeholder,
                ),
                heading: format!("{} / Frame {}", r.video_id, r.keyframe_index),
                rrf_score: format!("{:.4}", r.rrf_score),
                vector_score: format_score(r.vector_score, 4),
                content_score: format_score(r.content_score, 2),
                metadata_score: format_score(r.metadata_score, 2),
            })
            .collect();
        ResultsArea::Grid(cards)
    }
}

fn format_score(score: Option<f64>, precision: usize) -> String {
    match score {
        Some(value) => format!("{:.*}", precision, value),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn renderer() -> ResultsRenderer {
        ResultsRenderer::new(MediaUrls::new(&Config::default().backend).unwrap())
    }

    fn result(video_id: &str, keyframe_index: u64) -> SearchResult {
        SearchResult {
            video_id: video_id.to_string(),
            keyframe_index,
            rrf_score: 0.032786885,
            vector_score: Some(1.234567),
            content_score: None,
            metadata_score: Some(7.0),
        }
    }

    #[test]
    fn test_empty_results_show_notice() {
        let area = renderer().render(&[]);
        assert_eq!(area, ResultsArea::Empty);
        assert!(area.cards().is_empty());
        assert_eq!(area.to_html(), "<p>No results found.</p>");
    }

    #[test]
    fn test_scores_are_formatted() {
        let area = renderer().render(&[result("L01_V001", 20)]);
        let card = &area.cards()[0];

        assert_eq!(card.heading, "L01_V001 / Frame 20");
        assert_eq!(card.rrf_score, "0.0328");
        assert_eq!(card.vector_score, "1.2346");
        assert_eq!(card.content_score, "N/A");
        assert_eq!(card.metadata_score, "7.00");
        assert_eq!(card.thumbnail.src, "http://localhost:5000/frames/L01_V001/20");
    }

    #[test]
    fn test_zero_score_is_present() {
        let mut r = result("a", 1);
        r.content_score = Some(0.0);
        let area = renderer().render(&[r]);
        assert_eq!(area.cards()[0].content_score, "0.00");
    }

    #[test]
    fn test_order_is_preserved() {
        let results = vec![result("c", 3), result("a", 1), result("b", 2)];
        let area = renderer().render(&results);
        let ids: Vec<&str> = area.cards().iter().map(|c| c.video_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_thumbnail_falls_back_once() {
        let mut area = renderer().render(&[result("a", 1)]);
        let thumb = &mut area.card_mut(0).unwrap().thumbnail;

        assert!(thumb.on_load_error());
        assert!(thumb.is_placeholder());
        assert_eq!(thumb.src, "http://localhost:5000/static/placeholder.png");

        // Placeholder failing too must not trigger another swap
        assert!(!thumb.on_load_error());
        assert_eq!(thumb.src, "http://localhost:5000/static/placeholder.png");
    }

    #[test]
    fn test_card_html_carries_preview_data() {
        let area = renderer().render(&[result("L01_V001", 20)]);
        let html = area.to_html();
        assert!(html.contains("data-video-id=\"L01_V001\""));
        assert!(html.contains("data-keyframe-index=\"20\""));
        assert!(html.contains("RRF Score: 0.0328"));
    }

    #[test]
    fn test_card_html_falls_back_to_placeholder_once() {
        let mut area = renderer().render(&[result("a", 1)]);
        assert!(area.to_html().contains(
            "onerror=\"this.onerror=null;this.src='http://localhost:5000/static/placeholder.png';\""
        ));

        area.card_mut(0).unwrap().thumbnail.on_load_error();
        let html = area.to_html();
        assert!(html.contains("src=\"http://localhost:5000/static/placeholder.png\""));
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn test_error_html_is_escaped() {
        let area = ResultsArea::Error("<script>".to_string());
        assert_eq!(
            area.to_html(),
            "<p class=\"error\">An error occurred: &lt;script&gt;</p>"
        );
    }
}
