use ratatui::Frame;
use ratatui::text::{Line, Text};

use crate::theme;
use crate::ui::modal::{ModalSpec, render_modal};

const FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

#[derive(Debug, Clone, Default)]
pub(crate) struct LoadingState {
    frame_index: usize,
}

impl LoadingState {
    pub(crate) fn next_frame(&mut self) {
        self.frame_index = (self.frame_index + 1) % FRAMES.len();
    }

    fn current_frame(&self) -> &'static str {
        FRAMES[self.frame_index]
    }
}

pub(crate) fn render_loading_modal(
    frame: &mut Frame<'_>,
    title: &str,
    message: &str,
    key_hint: &str,
    accent: ratatui::style::Color,
    loading: &LoadingState,
) {
    let body = Text::from(vec![
        Line::from(""),
        Line::from(format!("{} {}", loading.current_frame(), message)),
    ]);
    render_modal(
        frame,
        ModalSpec {
            title,
            title_style: Some(theme::accent_prompt(accent)),
            body,
            key_hint: Some(key_hint),
            width_pct: 72,
            height_pct: 42,
        },
    );
}
