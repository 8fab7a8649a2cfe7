use chrono::Utc;
use ratatui::style::Style;
use tui_textarea::TextArea;

use crate::characters::{STOPLIST, filter_characters};
use crate::client::StreamKind;
use crate::config::ExportConfig;
use crate::export::{ExportError, export_story};
use crate::notification::NotificationState;
use crate::story::{self, StoryStats};
use crate::stream::{COMPLETION_SLOTS, SUGGESTION_SLOTS, SlotBoard};
use crate::worker::{WorkerHandle, WorkerRequest, WorkerResponse};

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Suggestions,
    Completion,
}

impl Focus {
    /// Tab order: editor, suggestions, completion
    pub fn next(self) -> Self {
        match self {
            Focus::Editor => Focus::Suggestions,
            Focus::Suggestions => Focus::Completion,
            Focus::Completion => Focus::Editor,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Editor => Focus::Completion,
            Focus::Suggestions => Focus::Editor,
            Focus::Completion => Focus::Suggestions,
        }
    }
}

/// Application state
pub struct App {
    pub editor: TextArea<'static>,
    pub suggestions: SlotBoard,
    pub completion: SlotBoard,
    /// Suggestion slot the cursor is on
    pub selected_suggestion: usize,
    pub characters: Vec<String>,
    pub focus: Focus,
    /// Last user-facing failure, cleared when a new request starts
    pub error: Option<String>,
    pub notification: NotificationState,
    pub export: ExportConfig,
    pub should_quit: bool,
    worker: Option<WorkerHandle>,
    pending_suggestions: Option<u64>,
    pending_completion: Option<u64>,
    pending_extract: Option<u64>,
    next_request_id: u64,
}

impl App {
    /// Create the app with an initial story and an optional worker
    ///
    /// Without a worker every service request reports an error instead.
    pub fn new(story: &str, export: ExportConfig, worker: Option<WorkerHandle>) -> Self {
        let mut app = Self {
            editor: TextArea::default(),
            suggestions: SlotBoard::new(SUGGESTION_SLOTS),
            completion: SlotBoard::new(COMPLETION_SLOTS),
            selected_suggestion: 0,
            characters: Vec::new(),
            focus: Focus::default(),
            error: None,
            notification: NotificationState::new(),
            export,
            should_quit: false,
            worker,
            pending_suggestions: None,
            pending_completion: None,
            pending_extract: None,
            next_request_id: 0,
        };
        app.set_story_text(story);
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Full story text as edited
    pub fn story_text(&self) -> String {
        self.editor.lines().join("\n")
    }

    /// Replace the story, keeping the cursor at the end
    pub fn set_story_text(&mut self, text: &str) {
        let mut editor = TextArea::new(text.split('\n').map(str::to_string).collect());
        editor.set_cursor_line_style(Style::default());
        editor.move_cursor(tui_textarea::CursorMove::Bottom);
        editor.move_cursor(tui_textarea::CursorMove::End);
        self.editor = editor;
    }

    pub fn stats(&self) -> StoryStats {
        StoryStats::of(&self.story_text())
    }

    /// A stream of this kind is outstanding
    pub fn is_streaming(&self, kind: StreamKind) -> bool {
        match kind {
            StreamKind::Suggestions => self.pending_suggestions.is_some(),
            StreamKind::Completion => self.pending_completion.is_some(),
        }
    }

    pub fn is_extracting(&self) -> bool {
        self.pending_extract.is_some()
    }

    pub fn request_suggestions(&mut self) -> bool {
        self.request_stream(StreamKind::Suggestions)
    }

    pub fn request_completion(&mut self) -> bool {
        self.request_stream(StreamKind::Completion)
    }

    /// Start a stream of `kind` over the current story
    ///
    /// No-op while one of the same kind is outstanding or the story is blank.
    fn request_stream(&mut self, kind: StreamKind) -> bool {
        let context = self.story_text();
        if story::is_blank(&context) || self.is_streaming(kind) {
            return false;
        }

        let request_id = self.next_id();
        let request = WorkerRequest::Stream {
            kind,
            context,
            request_id,
        };
        if !self.send(request) {
            return false;
        }

        self.error = None;
        self.board_mut(kind).start();
        if kind == StreamKind::Suggestions {
            self.selected_suggestion = 0;
        }
        *self.pending_mut(kind) = Some(request_id);
        log::debug!("Requested {} (request {})", kind.label(), request_id);
        true
    }

    /// Ask the service for the character names in the story
    pub fn detect_characters(&mut self) -> bool {
        let context = self.story_text();
        if story::is_blank(&context) || self.is_extracting() {
            return false;
        }

        let request_id = self.next_id();
        if !self.send(WorkerRequest::Extract {
            context,
            request_id,
        }) {
            return false;
        }
        self.error = None;
        self.pending_extract = Some(request_id);
        true
    }

    /// Abort every outstanding stream
    pub fn cancel_streams(&mut self) -> bool {
        let mut cancelled = false;
        for kind in [StreamKind::Suggestions, StreamKind::Completion] {
            if self.pending_mut(kind).take().is_some() {
                self.send(WorkerRequest::Cancel { kind });
                cancelled = true;
            }
        }
        if cancelled {
            self.notification.show("Cancelled");
        }
        cancelled
    }

    /// Append the selected suggestion to the story and clear its slot
    pub fn accept_suggestion(&mut self) -> bool {
        let idx = self.selected_suggestion;
        if !self.suggestions.get(idx).is_some_and(|s| s.is_acceptable()) {
            return false;
        }
        if let Some(slot) = self.suggestions.take(idx) {
            self.append_to_story(&slot.text);
        }
        self.select_after_removal(idx);
        true
    }

    pub fn discard_suggestion(&mut self) -> bool {
        let idx = self.selected_suggestion;
        let removed = self.suggestions.take(idx).is_some();
        if removed {
            self.select_after_removal(idx);
        }
        removed
    }

    pub fn accept_completion(&mut self) -> bool {
        if !self.completion.get(0).is_some_and(|s| s.is_acceptable()) {
            return false;
        }
        if let Some(slot) = self.completion.take(0) {
            self.append_to_story(&slot.text);
        }
        true
    }

    pub fn discard_completion(&mut self) -> bool {
        self.completion.take(0).is_some()
    }

    /// Move the suggestion cursor to the next open slot
    pub fn select_next_suggestion(&mut self) {
        if let Some(idx) = self.suggestions.next_active(self.selected_suggestion) {
            self.selected_suggestion = idx;
        }
    }

    pub fn select_prev_suggestion(&mut self) {
        if let Some(idx) = self.suggestions.prev_active(self.selected_suggestion) {
            self.selected_suggestion = idx;
        }
    }

    /// Empty the suggestion and completion panels
    pub fn clear_panels(&mut self) {
        self.suggestions.clear();
        self.completion.clear();
        self.selected_suggestion = 0;
    }

    pub fn clear_story(&mut self) {
        self.set_story_text("");
    }

    /// Write the story to a PDF in the configured directory
    pub fn export_pdf(&mut self) {
        match export_story(&self.story_text(), &self.export, Utc::now()) {
            Ok(path) => self
                .notification
                .show(&format!("Saved {}", path.display())),
            Err(ExportError::EmptyStory) => self.notification.show("Nothing to export"),
            Err(e) => {
                log::warn!("Export failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Drain every response the worker has ready
    pub fn poll_worker(&mut self) {
        while let Some(response) = self.worker.as_ref().and_then(WorkerHandle::try_recv) {
            self.handle_worker_response(response);
        }
    }

    /// Apply one worker response, ignoring stale request ids
    pub fn handle_worker_response(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::Event {
                kind,
                request_id,
                event,
            } => {
                if self.is_current(kind, request_id) {
                    self.board_mut(kind).apply(&event);
                }
            }
            WorkerResponse::Finished { kind, request_id }
            | WorkerResponse::Cancelled { kind, request_id } => {
                if self.is_current(kind, request_id) {
                    *self.pending_mut(kind) = None;
                }
            }
            WorkerResponse::Failed {
                kind,
                request_id,
                message,
            } => {
                if self.is_current(kind, request_id) {
                    *self.pending_mut(kind) = None;
                    self.error = Some(message);
                }
            }
            WorkerResponse::Characters { request_id, names } => {
                if self.pending_extract == Some(request_id) {
                    self.pending_extract = None;
                    self.characters = filter_characters(&names, STOPLIST);
                }
            }
            WorkerResponse::ExtractFailed {
                request_id,
                message,
            } => {
                if self.pending_extract == Some(request_id) {
                    self.pending_extract = None;
                    self.error = Some(message);
                }
            }
        }
    }

    fn is_current(&self, kind: StreamKind, request_id: u64) -> bool {
        let pending = match kind {
            StreamKind::Suggestions => self.pending_suggestions,
            StreamKind::Completion => self.pending_completion,
        };
        pending == Some(request_id)
    }

    fn pending_mut(&mut self, kind: StreamKind) -> &mut Option<u64> {
        match kind {
            StreamKind::Suggestions => &mut self.pending_suggestions,
            StreamKind::Completion => &mut self.pending_completion,
        }
    }

    pub fn board(&self, kind: StreamKind) -> &SlotBoard {
        match kind {
            StreamKind::Suggestions => &self.suggestions,
            StreamKind::Completion => &self.completion,
        }
    }

    fn board_mut(&mut self, kind: StreamKind) -> &mut SlotBoard {
        match kind {
            StreamKind::Suggestions => &mut self.suggestions,
            StreamKind::Completion => &mut self.completion,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn send(&mut self, request: WorkerRequest) -> bool {
        let sent = self
            .worker
            .as_ref()
            .is_some_and(|worker| worker.send(request));
        if !sent {
            self.error = Some("Story service worker is not running".to_string());
        }
        sent
    }

    fn append_to_story(&mut self, passage: &str) {
        let story = story::append_passage(&self.story_text(), passage);
        self.set_story_text(&story);
    }

    fn select_after_removal(&mut self, removed: usize) {
        self.selected_suggestion = self.suggestions.next_active(removed).unwrap_or(0);
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod app_state_tests;
