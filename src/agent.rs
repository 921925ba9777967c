//! Seats, provider kinds and the players sitting in them.

use std::{fmt, sync::Arc};

use crate::game_interface::CompletionProvider;

/// One of the two fixed positions of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn number(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }

    pub fn opponent(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Family of models behind a seat. Only used for naming and trace tags, never shown
/// to the agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    ChatGpt,
    DeepSeek,
}

impl ProviderKind {
    /// Tag written in session traces.
    pub fn tag(self) -> &'static str {
        match self {
            ProviderKind::ChatGpt => "chatgpt",
            ProviderKind::DeepSeek => "deepseek",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::ChatGpt => "ChatGPT-5.1",
            ProviderKind::DeepSeek => "DeepSeek-V3",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::ChatGpt => "gpt-5.1",
            ProviderKind::DeepSeek => "deepseek-chat",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::ChatGpt => "https://api.openai.com/v1",
            ProviderKind::DeepSeek => "https://api.deepseek.com/v1",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An agent: a model reachable through a provider.
///
/// Holds no game state, so the same player can sit in many sessions.
#[derive(Clone)]
pub struct Player {
    pub kind: ProviderKind,
    pub name: String,
    pub model: String,
    pub provider: Arc<dyn CompletionProvider + Send + Sync>,
}

impl Player {
    /// A player using the kind's display name and default model.
    pub fn new(kind: ProviderKind, provider: Arc<dyn CompletionProvider + Send + Sync>) -> Player {
        Player {
            kind,
            name: kind.display_name().to_owned(),
            model: kind.default_model().to_owned(),
            provider,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Player {
        self.model = model.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Player {
        self.name = name.into();
        self
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
