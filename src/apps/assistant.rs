use std::sync::mpsc::{self, Receiver};
use std::thread;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::error::ShellError;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};
use crate::window::AppId;

use super::{Applet, AppletContext, ShellCommand};

const COMPLETION_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";
const FAILURE_REPLY: &str = "Something went wrong. Try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Chat assistant applet.
///
/// The one network call in this program: a single POST of the freeform
/// prompt, run on a worker thread so the event loop never blocks. There is
/// no retry, no abort path and no timeout; if the window is closed while a
/// request is in flight the reply still lands in the transcript on the next
/// drain, which is harmless.
pub struct AssistantApplet {
    messages: Vec<ChatMessage>,
    input: String,
    busy: bool,
    pending: Option<Receiver<Result<String, ShellError>>>,
}

impl AssistantApplet {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            busy: false,
            pending: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn send(&mut self, ctx: &mut AppletContext<'_>) {
        let prompt = self.input.trim().to_string();
        if prompt.is_empty() || self.busy {
            return;
        }
        if ctx.api_key.is_empty() {
            ctx.queue.notify(
                "Assistant",
                "Set your API key in Settings before chatting",
            );
            ctx.queue.push(ShellCommand::OpenWindow(AppId::Settings));
            return;
        }
        self.messages.push(ChatMessage {
            role: Role::User,
            content: prompt.clone(),
        });
        self.input.clear();
        self.busy = true;

        let api_key = ctx.api_key.to_string();
        let (tx, rx) = mpsc::channel();
        self.pending = Some(rx);
        thread::spawn(move || {
            let outcome = request_completion(&api_key, &prompt);
            // receiver may be gone if the shell exited; nothing to do then
            let _ = tx.send(outcome);
        });
    }

    /// Inject a finished exchange without the network round trip.
    #[cfg(test)]
    pub(crate) fn push_reply(&mut self, content: &str) {
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: content.to_string(),
        });
    }
}

impl Default for AssistantApplet {
    fn default() -> Self {
        Self::new()
    }
}

fn request_completion(api_key: &str, prompt: &str) -> Result<String, ShellError> {
    // no timeout: a stalled request just never resolves, matching the
    // fire-and-forget contract of this call
    let client = reqwest::blocking::Client::builder()
        .timeout(None)
        .build()?;
    let body = serde_json::json!({
        "contents": [{
            "parts": [{ "text": prompt }]
        }]
    });
    let response = client
        .post(format!("{COMPLETION_ENDPOINT}?key={api_key}"))
        .json(&body)
        .send()?;
    let payload: serde_json::Value = response.json()?;
    extract_completion_text(&payload)
}

/// Pull `candidates[0].content.parts[0].text` out of a completion response.
fn extract_completion_text(payload: &serde_json::Value) -> Result<String, ShellError> {
    payload
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.get(0))
        .and_then(|part| part.get("text"))
        .and_then(|text| text.as_str())
        .map(str::to_string)
        .ok_or(ShellError::EmptyCompletion)
}

impl Applet for AssistantApplet {
    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut AppletContext<'_>) -> bool {
        if key.kind != KeyEventKind::Press || key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Enter => {
                self.send(ctx);
                true
            }
            KeyCode::Backspace => {
                self.input.pop();
                true
            }
            KeyCode::Char(ch) => {
                self.input.push(ch);
                true
            }
            _ => false,
        }
    }

    fn tick(&mut self, _ctx: &mut AppletContext<'_>) {
        let Some(rx) = self.pending.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                let content = match outcome {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::warn!(%err, "assistant request failed");
                        FAILURE_REPLY.to_string()
                    }
                };
                self.messages.push(ChatMessage {
                    role: Role::Assistant,
                    content,
                });
                self.busy = false;
                self.pending = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                // worker died without sending; surface the generic failure
                self.messages.push(ChatMessage {
                    role: Role::Assistant,
                    content: FAILURE_REPLY.to_string(),
                });
                self.busy = false;
                self.pending = None;
            }
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
        let transcript_height = area.height.saturating_sub(2) as usize;
        let width = area.width as usize;

        // Wrap transcript lines, newest pinned to the bottom.
        let mut lines: Vec<(Role, String)> = Vec::new();
        for message in &self.messages {
            let prefix = match message.role {
                Role::User => "you: ",
                Role::Assistant => "asst: ",
            };
            let mut remaining = format!("{prefix}{}", message.content);
            while !remaining.is_empty() {
                let take: String = remaining.chars().take(width.max(1)).collect();
                remaining = remaining.chars().skip(take.chars().count()).collect();
                lines.push((message.role, take));
            }
        }
        let skip = lines.len().saturating_sub(transcript_height);
        for (offset, (role, line)) in lines.into_iter().skip(skip).enumerate() {
            let style = match role {
                Role::User => Style::default(),
                Role::Assistant => Style::default().fg(theme::accent()),
            };
            safe_set_string(buffer, bounds, area.x, area.y + offset as u16, &line, style);
        }

        let status_y = area.y + area.height.saturating_sub(2);
        if self.busy {
            safe_set_string(
                buffer,
                bounds,
                area.x,
                status_y,
                "thinking…",
                Style::default()
                    .fg(theme::icon_label_fg())
                    .add_modifier(Modifier::ITALIC),
            );
        }
        let input_y = area.y + area.height.saturating_sub(1);
        let prompt = format!("> {}_", self.input);
        safe_set_string(
            buffer,
            bounds,
            area.x,
            input_y,
            &truncate_to_width(&prompt, width),
            Style::default().add_modifier(Modifier::BOLD),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::CommandQueue;
    use super::super::test_support::{ctx, ctx_with_key};
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, crossterm::event::KeyModifiers::NONE)
    }

    #[test]
    fn missing_api_key_aborts_before_any_network_call() {
        let mut assistant = AssistantApplet::new();
        let mut queue = CommandQueue::default();
        for ch in "hello".chars() {
            assistant.handle_key(&press(KeyCode::Char(ch)), &mut ctx(&mut queue));
        }
        assistant.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        assert!(assistant.messages().is_empty());
        assert!(!assistant.is_busy());
        let toasts = queue.take_notifications();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Assistant");
        // the settings window is summoned so the user can fix it
        assert_eq!(
            queue.take_commands(),
            vec![ShellCommand::OpenWindow(AppId::Settings)]
        );
    }

    #[test]
    fn empty_input_is_not_sent() {
        let mut assistant = AssistantApplet::new();
        let mut queue = CommandQueue::default();
        assistant.handle_key(&press(KeyCode::Enter), &mut ctx_with_key(&mut queue, "key"));
        assert!(assistant.messages().is_empty());
        assert!(queue.take_notifications().is_empty());
    }

    #[test]
    fn completion_text_extraction() {
        let payload = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "hi there" }] }
            }]
        });
        assert_eq!(extract_completion_text(&payload).unwrap(), "hi there");

        let malformed = serde_json::json!({ "candidates": [] });
        assert!(matches!(
            extract_completion_text(&malformed),
            Err(ShellError::EmptyCompletion)
        ));
    }

    #[test]
    fn worker_reply_is_drained_on_tick() {
        let mut assistant = AssistantApplet::new();
        let mut queue = CommandQueue::default();
        let (tx, rx) = mpsc::channel();
        assistant.pending = Some(rx);
        assistant.busy = true;
        tx.send(Ok("certainly".to_string())).unwrap();
        assistant.tick(&mut ctx(&mut queue));
        assert!(!assistant.is_busy());
        let last = assistant.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "certainly");
    }

    #[test]
    fn worker_error_surfaces_the_generic_failure_message() {
        let mut assistant = AssistantApplet::new();
        let mut queue = CommandQueue::default();
        let (tx, rx) = mpsc::channel();
        assistant.pending = Some(rx);
        assistant.busy = true;
        tx.send(Err(ShellError::EmptyCompletion)).unwrap();
        assistant.tick(&mut ctx(&mut queue));
        let last = assistant.messages().last().unwrap();
        assert_eq!(last.content, FAILURE_REPLY);
        assert!(!assistant.is_busy());
    }

    #[test]
    fn transcript_keeps_both_roles() {
        let mut assistant = AssistantApplet::new();
        let mut queue = CommandQueue::default();
        for ch in "hi".chars() {
            assistant.handle_key(&press(KeyCode::Char(ch)), &mut ctx_with_key(&mut queue, "k"));
        }
        // bypass the real network path
        assistant.messages.push(ChatMessage {
            role: Role::User,
            content: assistant.input.clone(),
        });
        assistant.input.clear();
        assistant.push_reply("hello!");
        assert_eq!(assistant.messages().len(), 2);
        assert_eq!(assistant.messages()[0].role, Role::User);
        assert_eq!(assistant.messages()[1].role, Role::Assistant);
    }
}
