use std::collections::VecDeque;
use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::apps::Notification;
use crate::constants::{NOTIFICATION_TTL, NOTIFICATION_WIDTH};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

#[derive(Debug)]
struct Toast {
    notification: Notification,
    shown_at: Instant,
}

/// Toast queue rendered in the top-right corner of the desktop. Entries
/// expire after a fixed TTL; `prune` runs on the idle tick.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    toasts: VecDeque<Toast>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
        }
    }

    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(title = %notification.title, "notification");
        self.toasts.push_back(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }

    pub fn prune(&mut self) {
        let now = Instant::now();
        self.toasts
            .retain(|toast| now.duration_since(toast.shown_at) < NOTIFICATION_TTL);
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn render(&self, frame: &mut UiFrame<'_>, bounds: Rect) {
        if self.toasts.is_empty() || bounds.width == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let clip = bounds.intersection(buffer.area);
        if clip.width == 0 || clip.height == 0 {
            return;
        }
        let width = NOTIFICATION_WIDTH.min(clip.width);
        let x = clip.x + clip.width - width;
        let mut y = clip.y;
        for toast in &self.toasts {
            if y.saturating_add(2) > clip.y + clip.height {
                break;
            }
            for row in 0..2u16 {
                for col in 0..width {
                    if let Some(cell) = buffer.cell_mut((x + col, y + row)) {
                        cell.set_symbol(" ");
                        cell.set_style(
                            Style::default().bg(theme::toast_bg()).fg(theme::toast_fg()),
                        );
                    }
                }
            }
            safe_set_string(
                buffer,
                clip,
                x + 1,
                y,
                &truncate_to_width(&toast.notification.title, width.saturating_sub(2) as usize),
                Style::default()
                    .bg(theme::toast_bg())
                    .fg(theme::toast_fg())
                    .add_modifier(Modifier::BOLD),
            );
            safe_set_string(
                buffer,
                clip,
                x + 1,
                y + 1,
                &truncate_to_width(&toast.notification.body, width.saturating_sub(2) as usize),
                Style::default().bg(theme::toast_bg()).fg(theme::toast_fg()),
            );
            y = y.saturating_add(3);
        }
    }
}
