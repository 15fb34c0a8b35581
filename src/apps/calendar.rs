use chrono::{Datelike, Duration, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

use super::{Applet, AppletContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: u64,
    pub title: String,
    pub date: NaiveDate,
    pub holiday: bool,
}

fn holiday(id: u64, title: &str, month: u32, day: u32) -> CalendarEvent {
    CalendarEvent {
        id,
        title: title.to_string(),
        // the fixed holiday list is well-formed by construction
        date: NaiveDate::from_ymd_opt(2024, month, day).unwrap_or_default(),
        holiday: true,
    }
}

fn holidays_2024() -> Vec<CalendarEvent> {
    vec![
        holiday(1, "New Year's Day", 1, 1),
        holiday(2, "Martin Luther King Jr. Day", 1, 15),
        holiday(3, "Presidents' Day", 2, 19),
        holiday(4, "Memorial Day", 5, 27),
        holiday(5, "Independence Day", 7, 4),
        holiday(6, "Labor Day", 9, 2),
        holiday(7, "Thanksgiving Day", 11, 28),
        holiday(8, "Christmas Day", 12, 25),
    ]
}

/// Calendar applet: month grid plus a per-day event list. Holidays are
/// seeded and cannot be deleted; user events can be added and removed.
pub struct CalendarApplet {
    selected: NaiveDate,
    events: Vec<CalendarEvent>,
    next_id: u64,
    adding: Option<String>,
}

impl CalendarApplet {
    pub fn new() -> Self {
        Self::with_today(Local::now().date_naive())
    }

    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            selected: today,
            events: holidays_2024(),
            next_id: 100,
            adding: None,
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|event| event.date == date)
            .collect()
    }

    pub fn add_event(&mut self, title: &str, date: NaiveDate) -> bool {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.events.push(CalendarEvent {
            id: self.next_id,
            title: trimmed.to_string(),
            date,
            holiday: false,
        });
        self.next_id += 1;
        true
    }

    /// Remove the first user event on the selected day; holidays stay.
    pub fn delete_first_user_event(&mut self) -> bool {
        let selected = self.selected;
        if let Some(idx) = self
            .events
            .iter()
            .position(|event| event.date == selected && !event.holiday)
        {
            self.events.remove(idx);
            true
        } else {
            false
        }
    }

    fn shift_selected(&mut self, days: i64) {
        self.selected = self.selected + Duration::days(days);
    }

    fn shift_month(&mut self, forward: bool) {
        let (year, month) = (self.selected.year(), self.selected.month());
        let (year, month) = if forward {
            if month == 12 { (year + 1, 1) } else { (year, month + 1) }
        } else if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };
        let day = self.selected.day().min(days_in_month(year, month));
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            self.selected = date;
        }
    }
}

impl Default for CalendarApplet {
    fn default() -> Self {
        Self::new()
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (next, NaiveDate::from_ymd_opt(year, month, 1)) {
        (Some(next), Some(first)) => (next - first).num_days() as u32,
        _ => 30,
    }
}

impl Applet for CalendarApplet {
    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut AppletContext<'_>) -> bool {
        if key.kind != KeyEventKind::Press
            || key
                .modifiers
                .contains(crossterm::event::KeyModifiers::CONTROL)
        {
            return false;
        }
        // Event-title entry mode.
        if self.adding.is_some() {
            match key.code {
                KeyCode::Enter => {
                    if let Some(title) = self.adding.take() {
                        if self.add_event(&title, self.selected) {
                            ctx.queue.notify(
                                "Event Added",
                                format!("\"{}\" on {}", title.trim(), self.selected),
                            );
                        } else {
                            ctx.queue.notify("Error", "Please enter an event title");
                        }
                    }
                }
                KeyCode::Esc => self.adding = None,
                KeyCode::Backspace => {
                    if let Some(title) = self.adding.as_mut() {
                        title.pop();
                    }
                }
                KeyCode::Char(ch) => {
                    if let Some(title) = self.adding.as_mut() {
                        title.push(ch);
                    }
                }
                _ => {}
            }
            return true;
        }
        match key.code {
            KeyCode::Left => {
                self.shift_selected(-1);
                true
            }
            KeyCode::Right => {
                self.shift_selected(1);
                true
            }
            KeyCode::Up => {
                self.shift_selected(-7);
                true
            }
            KeyCode::Down => {
                self.shift_selected(7);
                true
            }
            KeyCode::PageUp => {
                self.shift_month(false);
                true
            }
            KeyCode::PageDown => {
                self.shift_month(true);
                true
            }
            KeyCode::Char('a') => {
                self.adding = Some(String::new());
                true
            }
            KeyCode::Char('d') => {
                if self.delete_first_user_event() {
                    ctx.queue.notify("Event Removed", self.selected.to_string());
                }
                true
            }
            _ => false,
        }
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &AppletContext<'_>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }

        let grid_width: u16 = 7 * 3 + 1;
        let month_title = self.selected.format("%B %Y").to_string();
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y,
            &month_title,
            Style::default().add_modifier(Modifier::BOLD),
        );
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y + 1,
            "Mo Tu We Th Fr Sa Su",
            Style::default().fg(theme::icon_label_fg()),
        );

        let year = self.selected.year();
        let month = self.selected.month();
        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(self.selected);
        let lead = first.weekday().num_days_from_monday() as u16;
        let total = days_in_month(year, month);
        for day in 1..=total {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            let slot = lead + day as u16 - 1;
            let x = area.x + (slot % 7) * 3;
            let y = area.y + 2 + slot / 7;
            let mut style = Style::default();
            if !self.events_on(date).is_empty() {
                style = style
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::UNDERLINED);
            }
            if date == self.selected {
                style = style
                    .bg(theme::dock_focused_bg())
                    .fg(theme::dock_focused_fg());
            }
            safe_set_string(buffer, bounds, x, y, &format!("{day:2}"), style);
        }

        // Event list to the right of the grid.
        let list_x = area.x + grid_width + 1;
        if list_x < area.x + area.width {
            safe_set_string(
                buffer,
                bounds,
                list_x,
                area.y,
                &format!("Events for {}", self.selected),
                Style::default().add_modifier(Modifier::BOLD),
            );
            let width = (area.x + area.width).saturating_sub(list_x) as usize;
            for (idx, event) in self.events_on(self.selected).iter().enumerate() {
                let tag = if event.holiday { " (holiday)" } else { "" };
                let line = format!("• {}{tag}", event.title);
                safe_set_string(
                    buffer,
                    bounds,
                    list_x,
                    area.y + 1 + idx as u16,
                    &truncate_to_width(&line, width),
                    Style::default(),
                );
            }
        }

        let footer_y = area.y + area.height.saturating_sub(1);
        let footer = if let Some(title) = &self.adding {
            format!("new event: {title}_")
        } else {
            "arrows move  PgUp/PgDn month  a add  d delete".to_string()
        };
        safe_set_string(
            buffer,
            bounds,
            area.x,
            footer_y,
            &truncate_to_width(&footer, area.width as usize),
            Style::default().fg(theme::icon_label_fg()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::CommandQueue;
    use super::super::test_support::ctx;
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, crossterm::event::KeyModifiers::NONE)
    }

    #[test]
    fn seeded_holidays_show_on_their_day() {
        let cal = CalendarApplet::with_today(date(2024, 7, 4));
        let events = cal.events_on(date(2024, 7, 4));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Independence Day");
        assert!(events[0].holiday);
    }

    #[test]
    fn add_and_delete_user_event() {
        let mut cal = CalendarApplet::with_today(date(2024, 3, 10));
        assert!(cal.add_event("Dentist", date(2024, 3, 10)));
        assert_eq!(cal.events_on(date(2024, 3, 10)).len(), 1);
        assert!(cal.delete_first_user_event());
        assert!(cal.events_on(date(2024, 3, 10)).is_empty());
    }

    #[test]
    fn blank_titles_are_rejected() {
        let mut cal = CalendarApplet::with_today(date(2024, 3, 10));
        assert!(!cal.add_event("   ", date(2024, 3, 10)));
    }

    #[test]
    fn holidays_cannot_be_deleted() {
        let mut cal = CalendarApplet::with_today(date(2024, 12, 25));
        assert!(!cal.delete_first_user_event());
        assert_eq!(cal.events_on(date(2024, 12, 25)).len(), 1);
    }

    #[test]
    fn arrow_keys_move_the_selection() {
        let mut cal = CalendarApplet::with_today(date(2024, 6, 15));
        let mut queue = CommandQueue::default();
        cal.handle_key(&press(KeyCode::Right), &mut ctx(&mut queue));
        assert_eq!(cal.selected_date(), date(2024, 6, 16));
        cal.handle_key(&press(KeyCode::Down), &mut ctx(&mut queue));
        assert_eq!(cal.selected_date(), date(2024, 6, 23));
        cal.handle_key(&press(KeyCode::PageDown), &mut ctx(&mut queue));
        assert_eq!(cal.selected_date(), date(2024, 7, 23));
    }

    #[test]
    fn month_shift_clamps_the_day() {
        let mut cal = CalendarApplet::with_today(date(2024, 1, 31));
        cal.shift_month(true);
        assert_eq!(cal.selected_date(), date(2024, 2, 29));
    }

    #[test]
    fn typed_event_lands_on_the_selected_day() {
        let mut cal = CalendarApplet::with_today(date(2024, 5, 2));
        let mut queue = CommandQueue::default();
        cal.handle_key(&press(KeyCode::Char('a')), &mut ctx(&mut queue));
        for ch in "Standup".chars() {
            cal.handle_key(&press(KeyCode::Char(ch)), &mut ctx(&mut queue));
        }
        cal.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        let events = cal.events_on(date(2024, 5, 2));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Standup");
        assert_eq!(queue.take_notifications().len(), 1);
    }

    #[test]
    fn weekday_math_checks_out() {
        assert_eq!(date(2024, 1, 1).weekday(), chrono::Weekday::Mon);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
    }
}
