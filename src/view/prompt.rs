//! The prompt console: a draft line and an append-only exchange history.

use tracing::warn;

use crate::api::{ClientError, PromptReply};
use crate::task::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You:",
            Role::Agent => "Agent:",
        }
    }
}

/// One entry of the exchange history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PromptConsole {
    /// Completed exchanges, oldest first. Only ever appended to.
    pub history: Vec<Turn>,
    pub draft: String,
    /// Conversation id from the most recent reply that carried one.
    pub conversation_id: Option<i64>,
    /// Lines scrolled back from the bottom of the history.
    pub scroll_back: u16,
    in_flight: usize,
}

impl PromptConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn backspace(&mut self) {
        self.draft.pop();
    }

    pub fn waiting(&self) -> bool {
        self.in_flight > 0
    }

    /// Send the current draft. The draft stays in place until the reply
    /// arrives so a failed send can be retried.
    pub fn submit(&mut self) -> Request {
        self.in_flight += 1;
        Request::SendPrompt(self.draft.clone())
    }

    /// Fold the answer to `prompt` into the history; returns a status line.
    pub fn apply_reply(&mut self, prompt: String, result: Result<PromptReply, ClientError>) -> String {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(reply) => {
                self.history.push(Turn::new(Role::User, prompt));
                self.history.push(Turn::new(Role::Agent, reply.reply));
                self.draft.clear();
                self.scroll_back = 0;
                if reply.conversation_id.is_some() {
                    self.conversation_id = reply.conversation_id;
                }
                "Reply received".into()
            }
            Err(e) => {
                warn!(error = %e, "prompt failed");
                format!("Prompt failed: {}", e.summary())
            }
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_back = self.scroll_back.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str) -> PromptReply {
        PromptReply {
            reply: text.to_string(),
            conversation_id: Some(42),
        }
    }

    fn typed(text: &str) -> PromptConsole {
        let mut console = PromptConsole::new();
        text.chars().for_each(|c| console.push_char(c));
        console
    }

    #[test]
    fn submit_sends_draft_and_marks_waiting() {
        let mut console = typed("hello");
        assert_eq!(console.submit(), Request::SendPrompt("hello".into()));
        assert!(console.waiting());
        assert_eq!(console.draft, "hello", "draft kept until reply");
    }

    #[test]
    fn successful_reply_appends_user_then_agent_and_clears_draft() {
        let mut console = typed("hello");
        let Request::SendPrompt(sent) = console.submit() else {
            panic!("expected a prompt request");
        };

        console.apply_reply(sent, Ok(reply("hi")));

        assert_eq!(
            console.history,
            vec![Turn::new(Role::User, "hello"), Turn::new(Role::Agent, "hi")]
        );
        assert_eq!(console.draft, "");
        assert_eq!(console.conversation_id, Some(42));
        assert!(!console.waiting());
    }

    #[test]
    fn failed_reply_keeps_draft_and_history() {
        let mut console = typed("hello");
        console.submit();

        let status = console.apply_reply("hello".into(), Err(ClientError::Status(500)));

        assert!(console.history.is_empty());
        assert_eq!(console.draft, "hello");
        assert!(status.starts_with("Prompt failed"));
        assert!(!console.waiting());
    }

    #[test]
    fn empty_draft_is_sent_as_is() {
        let mut console = PromptConsole::new();
        assert_eq!(console.submit(), Request::SendPrompt(String::new()));
    }

    #[test]
    fn history_is_append_only_across_exchanges() {
        let mut console = PromptConsole::new();
        console.apply_reply("one".into(), Ok(reply("1")));
        console.apply_reply("two".into(), Ok(reply("2")));

        let texts: Vec<_> = console.history.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["one", "1", "two", "2"]);
    }

    #[test]
    fn backspace_and_scroll_saturate() {
        let mut console = typed("ab");
        console.backspace();
        console.backspace();
        console.backspace();
        assert_eq!(console.draft, "");

        console.scroll_down();
        assert_eq!(console.scroll_back, 0);
        console.scroll_up();
        assert_eq!(console.scroll_back, 1);
    }
}
