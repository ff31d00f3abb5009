use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crossterm::event::{Event, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use tagpick_app::filter::NO_MATCH_PLACEHOLDER;
use tagpick_app::{App, OutputSink, SaveOutcome, TagController};
use tagpick_core::config::{TagAppearance, TagStyle};
use tagpick_core::store::{FileTagStore, fallback_vocabulary};
use tracing::warn;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::keymap;
use crate::{WidgetExit, WidgetOptions};
use crate::theme::{self, Palette, ThemeName};
use crate::ui::loading::{LoadingState, render_loading_modal};
use crate::ui::modal::render_notice_modal;
use crate::ui::text::{accent_line, compact_hint, key_hint_height, key_hint_paragraph, wrapped_paragraph};

#[derive(Debug)]
pub(crate) enum VocabLoadEvent {
    Fetching,
    Done { token: u64, vocabulary: Vec<String> },
}

#[derive(Debug)]
pub(crate) enum SaveEvent {
    Saving { count: usize },
    Done { token: u64, outcome: SaveOutcome },
}

/// Background boundary for the two store round trips. Both run off the
/// event loop thread; completion events carry the token of the request
/// that spawned them so stale completions can be dropped.
pub(crate) trait TagLoader: Send + Sync {
    fn spawn_fetch(&self, source: Option<String>, token: u64) -> Receiver<VocabLoadEvent>;

    fn spawn_save(&self, source: String, tags: Vec<String>, token: u64) -> Receiver<SaveEvent>;
}

#[derive(Debug)]
pub(crate) struct SystemTagLoader {
    store_dir: PathBuf,
}

impl SystemTagLoader {
    pub(crate) fn new(store_dir: PathBuf) -> Self {
        Self { store_dir }
    }
}

impl TagLoader for SystemTagLoader {
    fn spawn_fetch(&self, source: Option<String>, token: u64) -> Receiver<VocabLoadEvent> {
        let (sender, receiver) = mpsc::channel();
        let store_dir = self.store_dir.clone();
        std::thread::spawn(move || {
            let _ = sender.send(VocabLoadEvent::Fetching);

            let store = FileTagStore::new(store_dir);
            let app = App::new(&store);
            let vocabulary = app.load_vocabulary(source.as_deref());

            let _ = sender.send(VocabLoadEvent::Done { token, vocabulary });
        });
        receiver
    }

    fn spawn_save(&self, source: String, tags: Vec<String>, token: u64) -> Receiver<SaveEvent> {
        let (sender, receiver) = mpsc::channel();
        let store_dir = self.store_dir.clone();
        std::thread::spawn(move || {
            let _ = sender.send(SaveEvent::Saving { count: tags.len() });

            let store = FileTagStore::new(store_dir);
            let app = App::new(&store);
            let outcome = app.persist_tags(&source, tags);

            let _ = sender.send(SaveEvent::Done { token, outcome });
        });
        receiver
    }
}

#[derive(Debug)]
enum Mode {
    Loading(LoadingState),
    Ready,
    Saving(LoadingState),
    Notice {
        title: String,
        message: String,
        error: bool,
    },
}

pub(crate) struct PickerScreen {
    controller: TagController,
    loader: Box<dyn TagLoader>,
    sink: Box<dyn OutputSink>,
    source: Option<String>,
    tag_style: TagStyle,
    tag_appearance: TagAppearance,
    multi_select: bool,
    palette: Palette,
    mode: Mode,
    filter_input: Input,
    filter_focused: bool,
    cursor: usize,
    vocab_rx: Option<Receiver<VocabLoadEvent>>,
    save_rx: Option<Receiver<SaveEvent>>,
    token: u64,
}

impl PickerScreen {
    pub(crate) fn new(
        loader: Box<dyn TagLoader>,
        sink: Box<dyn OutputSink>,
        options: &WidgetOptions,
    ) -> Self {
        let mut controller = TagController::new();
        controller.begin_loading();
        controller.seed_initial(&options.seed);

        let token = 1;
        let vocab_rx = Some(loader.spawn_fetch(options.source.clone(), token));

        Self {
            controller,
            loader,
            sink,
            source: options.source.clone(),
            tag_style: options.tag_style,
            tag_appearance: options.tag_appearance,
            multi_select: options.multi_select,
            palette: ThemeName::parse(&options.theme).palette(),
            mode: Mode::Loading(LoadingState::default()),
            filter_input: Input::default(),
            filter_focused: false,
            cursor: 0,
            vocab_rx,
            save_rx: None,
            token,
        }
    }

    pub(crate) fn should_drain_loader_after_input(&self) -> bool {
        matches!(self.mode, Mode::Loading(_) | Mode::Saving(_))
    }

    pub(crate) fn on_tick(&mut self) {
        match &mut self.mode {
            Mode::Loading(loading) | Mode::Saving(loading) => loading.next_frame(),
            _ => {}
        }

        self.drain_vocab_events();
        self.drain_save_events();
    }

    fn drain_vocab_events(&mut self) {
        let Some(receiver) = self.vocab_rx.take() else {
            return;
        };

        loop {
            match receiver.try_recv() {
                Ok(VocabLoadEvent::Fetching) => {}
                Ok(VocabLoadEvent::Done { token, vocabulary }) => {
                    if token != self.token {
                        continue;
                    }
                    self.finish_fetch(vocabulary);
                    return;
                }
                Err(TryRecvError::Empty) => {
                    self.vocab_rx = Some(receiver);
                    return;
                }
                Err(TryRecvError::Disconnected) => {
                    // The worker died without a completion event. The
                    // widget must not stay stuck on the loading screen.
                    warn!("vocabulary loader disconnected before completion, using fallback");
                    self.finish_fetch(fallback_vocabulary());
                    return;
                }
            }
        }
    }

    fn finish_fetch(&mut self, vocabulary: Vec<String>) {
        self.controller.finish_loading(vocabulary);
        self.mode = Mode::Ready;
        self.controller.sync_output(self.sink.as_ref());
    }

    fn drain_save_events(&mut self) {
        let Some(receiver) = self.save_rx.take() else {
            return;
        };

        loop {
            match receiver.try_recv() {
                Ok(SaveEvent::Saving { .. }) => {}
                Ok(SaveEvent::Done { token, outcome }) => {
                    if token != self.token {
                        continue;
                    }
                    self.mode = notice_for_outcome(&outcome);
                    return;
                }
                Err(TryRecvError::Empty) => {
                    self.save_rx = Some(receiver);
                    return;
                }
                Err(TryRecvError::Disconnected) => {
                    warn!("save worker disconnected before completion");
                    self.mode = Mode::Notice {
                        title: "Save failed".to_string(),
                        message: "The save did not complete. Check the log for details."
                            .to_string(),
                        error: true,
                    };
                    return;
                }
            }
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Option<WidgetExit> {
        match &self.mode {
            Mode::Notice { .. } => {
                if keymap::is_confirm(key) || keymap::is_back(key) {
                    self.mode = Mode::Ready;
                }
                return None;
            }
            Mode::Loading(_) | Mode::Saving(_) => {
                if keymap::is_back(key) {
                    return Some(WidgetExit::Canceled);
                }
                return None;
            }
            Mode::Ready => {}
        }

        if keymap::is_focus_switch(key) {
            self.filter_focused = !self.filter_focused;
            if !self.filter_focused {
                self.blur_filter();
            }
            return None;
        }

        if self.filter_focused {
            self.on_filter_key(key);
            return None;
        }

        if keymap::is_back(key) || keymap::is_quit(key) {
            return Some(WidgetExit::Completed);
        }

        if keymap::is_up(key) {
            self.cursor = self.cursor.saturating_sub(1);
            return None;
        }

        if keymap::is_down(key) {
            if self.cursor + 1 < self.controller.visible_options().len() {
                self.cursor += 1;
            }
            return None;
        }

        if keymap::is_toggle(key) {
            self.toggle_under_cursor();
            return None;
        }

        if keymap::is_confirm(key) {
            // Enter commits typed text as a new tag; with nothing typed it
            // acts on the highlighted option instead.
            if self.filter_input.value().trim().is_empty() {
                self.toggle_under_cursor();
            } else {
                self.add_typed_tag();
            }
            return None;
        }

        if keymap::is_save(key) {
            self.request_save();
        }

        None
    }

    fn on_filter_key(&mut self, key: KeyEvent) {
        if keymap::is_back(key) {
            self.filter_focused = false;
            self.blur_filter();
            return;
        }

        if keymap::is_confirm(key) {
            self.add_typed_tag();
            return;
        }

        if self.filter_input.handle_event(&Event::Key(key)).is_some() {
            self.controller
                .set_filter(self.filter_input.value());
            self.clamp_cursor();
        }
    }

    fn blur_filter(&mut self) {
        self.filter_input.reset();
        self.controller.on_blur();
        self.clamp_cursor();
    }

    fn toggle_under_cursor(&mut self) {
        let Some(option) = self.controller.visible_options().into_iter().nth(self.cursor) else {
            return;
        };

        if !self.multi_select && !self.controller.is_selected(&option.text) {
            self.controller.select(vec![option.text]);
        } else {
            self.controller.toggle(&option.text);
        }
        self.controller.sync_output(self.sink.as_ref());
    }

    fn add_typed_tag(&mut self) {
        let typed = self.filter_input.value().trim().to_string();
        if typed.is_empty() || self.controller.is_selected(&typed) {
            return;
        }

        if self.multi_select {
            self.controller.add_new(&typed);
        } else {
            self.controller.add_new(&typed);
            self.controller.select(vec![typed]);
        }
        self.filter_input.reset();
        self.clamp_cursor();
        self.controller.sync_output(self.sink.as_ref());
    }

    fn request_save(&mut self) {
        if self.controller.pending().is_empty() {
            self.mode = Mode::Notice {
                title: "Nothing to save".to_string(),
                message: "No new tags to save.".to_string(),
                error: false,
            };
            return;
        }

        let Some(source) = self.source.clone() else {
            self.mode = Mode::Notice {
                title: "Cannot save".to_string(),
                message: "No vocabulary source is configured; new tags stay local.".to_string(),
                error: false,
            };
            return;
        };

        let tags = self.controller.consume_pending();
        self.token += 1;
        self.save_rx = Some(self.loader.spawn_save(source, tags, self.token));
        self.mode = Mode::Saving(LoadingState::default());
    }

    fn clamp_cursor(&mut self) {
        let len = self.controller.visible_options().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    fn chip(&self, tag: &str) -> String {
        match self.tag_style {
            TagStyle::Rounded => format!("({tag})"),
            TagStyle::Square => format!("[{tag}]"),
        }
    }

    pub(crate) fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let key_text = compact_hint(
            area.width,
            "Space: toggle    Enter: add typed tag    Tab: filter    s: save new    Esc/q: done",
            "Space: toggle    Enter: add    Tab: filter    s: save    Esc/q: done",
            "Space toggle | Enter add | Tab filter | s save | Esc done",
        );
        let footer_height = key_hint_height(area.width, key_text);
        let [header, selected_area, filter_area, options_area, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let source_label = match &self.source {
            Some(source) => format!("source: {source}"),
            None => "source: none (fallback vocabulary)".to_string(),
        };
        let header_text = Text::from(vec![
            Line::from("tagpick"),
            Line::from(Span::styled(source_label, theme::secondary_text())),
            accent_line("Pick tags for this record", self.palette.accent),
        ]);
        frame.render_widget(
            wrapped_paragraph(header_text).block(theme::chrome("Tags")),
            header,
        );

        self.render_selected(frame, selected_area);
        self.render_filter(frame, filter_area);
        self.render_options(frame, options_area);

        frame.render_widget(
            key_hint_paragraph(key_text).block(theme::key_block()),
            footer,
        );

        match &self.mode {
            Mode::Loading(loading) => render_loading_modal(
                frame,
                "Loading",
                "Fetching tag vocabulary",
                "Esc: cancel",
                self.palette.accent,
                loading,
            ),
            Mode::Saving(loading) => render_loading_modal(
                frame,
                "Saving",
                "Writing new tags",
                "Esc: cancel",
                self.palette.accent,
                loading,
            ),
            Mode::Notice {
                title,
                message,
                error,
            } => render_notice_modal(
                frame,
                title,
                if *error {
                    theme::error_prompt()
                } else {
                    theme::accent_prompt(self.palette.accent)
                },
                message,
                "Enter/Esc: continue",
            ),
            Mode::Ready => {}
        }
    }

    fn render_selected(&self, frame: &mut Frame<'_>, area: ratatui::layout::Rect) {
        let mut spans = Vec::<Span<'_>>::new();
        for tag in self.controller.selected() {
            if !spans.is_empty() {
                spans.push(Span::raw(" "));
            }
            let chip = self.chip(tag);
            if self.controller.pending().contains(tag) {
                spans.push(Span::styled(chip, theme::pending_marker(self.palette.pending)));
            } else {
                spans.push(Span::styled(
                    chip,
                    theme::chip_fill(self.tag_appearance, self.palette.accent),
                ));
            }
        }
        if spans.is_empty() {
            spans.push(Span::styled("none", theme::secondary_text()));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(theme::chrome("Selected")),
            area,
        );
    }

    fn render_filter(&self, frame: &mut Frame<'_>, area: ratatui::layout::Rect) {
        let title = if self.filter_focused {
            accent_line("Filter (typing)", self.palette.accent)
        } else {
            Line::from("Filter")
        };

        let width = area.width.saturating_sub(2) as usize;
        let scroll = self.filter_input.visual_scroll(width);
        let paragraph = Paragraph::new(self.filter_input.value())
            .scroll((0, scroll as u16))
            .block(theme::chrome(title));
        frame.render_widget(paragraph, area);

        if !self.filter_focused || width == 0 {
            return;
        }

        let visual = self.filter_input.visual_cursor();
        let relative = visual.saturating_sub(scroll).min(width.saturating_sub(1));
        frame.set_cursor_position((area.x + 1 + relative as u16, area.y + 1));
    }

    fn render_options(&self, frame: &mut Frame<'_>, area: ratatui::layout::Rect) {
        let options = self.controller.visible_options();
        if options.is_empty() {
            frame.render_widget(
                wrapped_paragraph(NO_MATCH_PLACEHOLDER).block(theme::chrome("Options")),
                area,
            );
            return;
        }

        let items: Vec<ListItem<'_>> = options
            .iter()
            .map(|option| {
                let marker = if self.controller.is_selected(&option.text) {
                    "[x] "
                } else {
                    "[ ] "
                };
                let mut spans = vec![Span::raw(marker), Span::raw(option.text.clone())];
                if option.pending {
                    spans.push(Span::styled(
                        " (new)",
                        theme::pending_marker(self.palette.pending),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(theme::chrome("Options"))
            .highlight_style(theme::list_highlight(self.palette.highlight));

        let mut state = ListState::default();
        state.select(Some(self.cursor.min(options.len() - 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }

    #[cfg(test)]
    fn selected(&self) -> &[String] {
        self.controller.selected()
    }

    #[cfg(test)]
    fn vocabulary(&self) -> &[String] {
        self.controller.vocabulary()
    }

    #[cfg(test)]
    fn is_ready(&self) -> bool {
        matches!(self.mode, Mode::Ready)
    }
}

fn notice_for_outcome(outcome: &SaveOutcome) -> Mode {
    match outcome {
        SaveOutcome::NothingPending => Mode::Notice {
            title: "Nothing to save".to_string(),
            message: "No new tags to save.".to_string(),
            error: false,
        },
        SaveOutcome::NoSource => Mode::Notice {
            title: "Cannot save".to_string(),
            message: "No vocabulary source is configured; new tags stay local.".to_string(),
            error: false,
        },
        SaveOutcome::Saved { created, failed } if failed.is_empty() => Mode::Notice {
            title: "Saved".to_string(),
            message: format!("Saved {} new tag(s).", created.len()),
            error: false,
        },
        SaveOutcome::Saved { created, failed } => Mode::Notice {
            title: "Save finished with errors".to_string(),
            message: format!(
                "Saved {} tag(s), {} failed: {}",
                created.len(),
                failed.len(),
                failed.join(", ")
            ),
            error: true,
        },
    }
}
