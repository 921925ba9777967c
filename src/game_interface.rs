//! Traits the game core uses to talk to the outside world.
//!
//! The core never performs network or file I/O itself: completions come from a
//! [`CompletionProvider`] and finished traces go to a [`TraceSink`].

use std::path::Path;

use crate::trace::SessionTrace;

/// The answer of a single completion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Main message text. May be empty.
    pub content: String,
    /// Reasoning trace some models return next to (or instead of) the content.
    pub reasoning_content: Option<String>,
}

impl Completion {
    /// A completion with only a main message.
    pub fn text(content: impl Into<String>) -> Completion {
        Completion {
            content: content.into(),
            reasoning_content: None,
        }
    }

    /// The text an agent answered with: the trimmed content, or the trimmed
    /// reasoning trace when the content is empty.
    pub fn answer_text(&self) -> &str {
        let content = self.content.trim();
        if !content.is_empty() {
            return content;
        }
        self.reasoning_content.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Something able to answer a system + user prompt pair with a given model.
pub trait CompletionProvider {
    /// Performs one request.
    ///
    /// # Error
    /// Transport, authentication or provider-side failures. They are not retried by
    /// the caller.
    fn complete(&self, model: &str, system: &str, user: &str) -> anyhow::Result<Completion>;
}

/// Where finished (or aborted) sessions are written.
pub trait TraceSink {
    /// Writes the whole trace to `destination`. Called once per session.
    fn flush(&self, trace: &SessionTrace, destination: &Path) -> anyhow::Result<()>;
}

#[cfg(test)]
mod interface_tests {
    use super::*;

    struct EchoProvider;

    impl CompletionProvider for EchoProvider {
        fn complete(&self, model: &str, _system: &str, user: &str) -> anyhow::Result<Completion> {
            Ok(Completion::text(format!("{model}: {user}")))
        }
    }

    fn ask<P: CompletionProvider + ?Sized>(provider: &P) -> anyhow::Result<Completion> {
        provider.complete("m", "sys", "hello")
    }

    #[test]
    fn test_dyn_provider() {
        let provider: Box<dyn CompletionProvider> = Box::new(EchoProvider);
        assert_eq!(ask(provider.as_ref()).unwrap().content, "m: hello");
    }

    #[test]
    fn answer_prefers_content() {
        let completion = Completion {
            content: "  Choice: Red ".to_owned(),
            reasoning_content: Some("thinking".to_owned()),
        };
        assert_eq!(completion.answer_text(), "Choice: Red");
    }

    #[test]
    fn answer_falls_back_to_reasoning() {
        let completion = Completion {
            content: " \n".to_owned(),
            reasoning_content: Some(" Choice: Blue ".to_owned()),
        };
        assert_eq!(completion.answer_text(), "Choice: Blue");
    }

    #[test]
    fn answer_can_be_empty() {
        assert_eq!(Completion::default().answer_text(), "");
    }
}
