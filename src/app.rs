//! Application state for the search page
//!
//! One [`AppState`] is created at startup and every user event is applied to
//! it through the methods below. Components never reach each other except
//! through this struct.

use tracing::{debug, info};

use crate::config::Config;
use crate::constraints::{ConstraintList, ConstraintWidget, WidgetChange};
use crate::error::{ConstraintError, Result};
use crate::media::MediaUrls;
use crate::modal::{ClickTarget, PlayerEvent, VideoModal};
use crate::query::{self, FormFields};
use crate::results::{ResultsArea, ResultsRenderer};
use crate::search::{Completion, SearchResult, SearchSession, SearchStatus, SearchTransport, Ticket};

const SHOW_FILTERS_LABEL: &str = "▼ Advanced Filters";
const HIDE_FILTERS_LABEL: &str = "▲ Hide Filters";

pub struct AppState {
    /// Current values of the search form
    pub form: FormFields,
    constraints: ConstraintList,
    session: SearchSession,
    renderer: ResultsRenderer,
    results: ResultsArea,
    modal: VideoModal,
    filters_visible: bool,
    notice: Option<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let urls = MediaUrls::new(&config.backend)?;
        Ok(Self {
            form: FormFields::default(),
            constraints: ConstraintList::with_bounds(&config.ui),
            session: SearchSession::new(),
            renderer: ResultsRenderer::new(urls.clone()),
            results: ResultsArea::Blank,
            modal: VideoModal::new(urls, config.playback.clone()),
            filters_visible: false,
            notice: None,
        })
    }

    /// Add an object constraint. A rejected add leaves a notice for the user.
    pub fn add_constraint(&mut self, label: &str, min_count: u32) -> Option<WidgetChange> {
        match self.constraints.add(label, min_count) {
            Ok(change) => Some(change),
            Err(e) => {
                self.set_notice(&e);
                None
            }
        }
    }

    pub fn remove_constraint(&mut self, label: &str) -> Option<WidgetChange> {
        self.constraints.remove(label)
    }

    pub fn constraint_widgets(&self) -> Vec<ConstraintWidget> {
        self.constraints.widgets()
    }

    /// Show or hide the advanced filter panel. Returns the new button label.
    pub fn toggle_filters(&mut self) -> &'static str {
        self.filters_visible = !self.filters_visible;
        self.filters_button_label()
    }

    pub fn filters_visible(&self) -> bool {
        self.filters_visible
    }

    pub fn filters_button_label(&self) -> &'static str {
        if self.filters_visible {
            HIDE_FILTERS_LABEL
        } else {
            SHOW_FILTERS_LABEL
        }
    }

    /// Submit the form: build the query and enter `Loading`.
    ///
    /// Prior results are dropped immediately so nothing stale stays visible.
    pub fn begin_search(&mut self) -> Ticket {
        let query = query::build(&self.form, &self.constraints.snapshot());
        debug!("Sending to backend: {:?}", query);
        self.results = ResultsArea::Searching;
        self.session.begin(query)
    }

    /// Apply a finished request. Superseded responses change nothing.
    pub fn finish_search(&mut self, ticket: &Ticket, outcome: Result<Vec<SearchResult>>) -> Completion {
        let completion = self.session.complete(ticket, outcome);
        match &completion {
            Completion::Success(results) => self.results = self.renderer.render(results),
            Completion::Failed(message) => self.results = ResultsArea::Error(message.clone()),
            Completion::Stale => {}
        }
        completion
    }

    /// Submit and wait for the response in one step
    pub async fn search(&mut self, transport: &dyn SearchTransport) -> Completion {
        let ticket = self.begin_search();
        let outcome = transport.search(&ticket.query).await;
        self.finish_search(&ticket, outcome)
    }

    /// Open the preview for the result at `position` in the grid
    pub fn activate_thumbnail(&mut self, position: usize) -> Option<Vec<PlayerEvent>> {
        let (video_id, keyframe_index) = {
            let card = self.results.cards().get(position)?;
            (card.video_id.clone(), card.keyframe_index)
        };
        Some(self.modal.open(&video_id, keyframe_index))
    }

    /// A thumbnail image failed to load
    pub fn thumbnail_failed(&mut self, position: usize) -> bool {
        match self.results.card_mut(position) {
            Some(card) => {
                let swapped = card.thumbnail.on_load_error();
                if swapped {
                    info!("🖼️ Thumbnail for {} replaced by placeholder", card.heading);
                }
                swapped
            }
            None => false,
        }
    }

    pub fn modal_click(&mut self, target: ClickTarget) -> Vec<PlayerEvent> {
        self.modal.click(target)
    }

    pub fn results(&self) -> &ResultsArea {
        &self.results
    }

    pub fn modal(&self) -> &VideoModal {
        &self.modal
    }

    pub fn search_status(&self) -> SearchStatus {
        self.session.status()
    }

    /// Notice left by the last rejected action, if not yet shown
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn set_notice(&mut self, err: &ConstraintError) {
        debug!("Constraint rejected: {:?}", err);
        self.notice = Some(err.to_string());
    }
}
