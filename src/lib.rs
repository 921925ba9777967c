//! # Coordination Game
//!
//! Runs a repeated two-player coordination game between language-model agents.
//!
//! Every round both agents pick `Red` or `Blue`. A hidden rule awards a point when their
//! joint choices follow a two-round cycle; the agents never see the rule, only the
//! history of past rounds with the feedback of each round, and must infer it by playing.
//!
//! It provides:
//! - Parsing of `Choice:` / `Reasoning:` answers
//! - The query protocol with bounded retries on malformed answers ([`QueryError`])
//! - The scoring rule and round history
//! - Sessions of N rounds with a persisted trace ([`session`], [`trace`])
//! - Batches of sessions, optionally on several threads ([`batch`])
//!
//! # Documentation Overview
//!
//! - For how agents are reached, see the [`CompletionProvider`](crate::game_interface::CompletionProvider)
//! trait and the OpenAI compatible implementation in [`provider`].
//! - For where traces go, see [`TraceSink`](crate::game_interface::TraceSink) and
//! [`JsonFileSink`](crate::trace::JsonFileSink).
//! - For batch size, pairing and output naming, see [`Configuration`](crate::configuration::Configuration).
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use coordination_game::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::new()
//!         .with_mode(PairingMode::Mixed)
//!         .with_rounds(30)
//!         .with_sessions(10);
//!
//!     // Reads OPENAI_API_KEY / DEEPSEEK_API_KEY
//!     let (player_1, player_2) = players_from_env(config.mode())?;
//!
//!     let runner = BatchRunner::new(player_1, player_2, config, Arc::new(JsonFileSink));
//!     let report = runner.run()?;
//!     for (index, outcome) in &report.outcomes {
//!         println!("session {index}: {} points", outcome.score);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Answer Format
//!
//! Agents are asked to answer with
//!
//! ```text
//! Choice: Red or Blue
//! Reasoning: a short explanation
//! ```
//!
//! Text around the two markers is ignored. An answer without both markers, or whose
//! choice is neither `Red` nor `Blue`, is asked again, [`MAX_ATTEMPTS`] requests at most.

pub use anyhow;
pub mod agent;
mod agent_query;
pub mod batch;
pub mod configuration;
mod decision;
pub mod game_interface;
mod logger;
pub mod provider;
mod response_parser;
mod scoring;
pub mod session;
pub mod trace;

pub use agent_query::{QueryError, MAX_ATTEMPTS};
pub use logger::{init_logger, init_warning_logger};

/// Commonly used types and traits for quick access.
///
/// ```rust
/// use coordination_game::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::{Player, ProviderKind, Seat};
    pub use crate::batch::{BatchReport, BatchRunner};
    pub use crate::configuration::{Configuration, FailurePolicy, PairingMode};
    pub use crate::decision::{Decision, Signal};
    pub use crate::game_interface::{Completion, CompletionProvider, TraceSink};
    pub use crate::provider::{players_from_env, OpenAiCompatibleProvider, ProviderSettings};
    pub use crate::session::{Session, SessionOutcome};
    pub use crate::trace::{JsonFileSink, SessionTrace};
}
