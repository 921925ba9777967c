//! Asking one agent for its decision of the round.
//!
//! The agent gets the rules and output format as the system prompt and the history
//! of the game, seen from its own seat, as the user prompt. Answers that cannot be
//! parsed are asked again, up to [`MAX_ATTEMPTS`] requests in total.

use thiserror::Error;
use tracing::{instrument, trace, warn};

use crate::{
    agent::Seat,
    decision::{Decision, Signal},
    game_interface::CompletionProvider,
    response_parser::parse_response,
    scoring::RoundRecord,
};

/// Requests sent to a provider for one decision before giving up.
pub const MAX_ATTEMPTS: usize = 3;

const SYSTEM_PROMPT: &str = "You are in a coordination game with another player.
The goal is to discover the secret pattern and align your choices.
Note: the pattern is cyclic with exactly two rounds and based on controlled repetitions, and only scores when both follow it correctly.
Observe the feedback when you score to decipher it.

Rules:
1. Choose ONLY Red or Blue.
2. Your response must be strictly formatted as follows:
Choice: Red or Blue
Reasoning: Explain in 15 words or less why you chose that color based on the pattern";

#[derive(Debug, Error)]
pub enum QueryError {
    /// The provider call itself failed. Never retried.
    #[error("completion provider failed")]
    Provider(#[source] anyhow::Error),
    /// Every attempt produced an answer without a usable decision.
    #[error("invalid response after {attempts} attempts. Last response:\n{last_response}")]
    InvalidFormat {
        attempts: usize,
        last_response: String,
    },
}

/// The system prompt shared by every agent.
fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// The user prompt for `seat`: the history where the seat's own choices are "You",
/// followed by the current score.
pub fn user_prompt(history: &[RoundRecord], score: u32, seat: Seat) -> String {
    format!(
        "Complete history:\n{}\n\nCurrent score: {score}\nYour choice and reasoning:",
        format_history(history, seat)
    )
}

fn format_history(history: &[RoundRecord], seat: Seat) -> String {
    if history.is_empty() {
        return "No previous rounds".to_owned();
    }
    history
        .iter()
        .map(|record| {
            let (own, opponent) = match seat {
                Seat::One => (&record.seat_1, &record.seat_2),
                Seat::Two => (&record.seat_2, &record.seat_1),
            };
            format!(
                "Round {}: You ({seat}) chose: {} | Opponent ({}) chose: {} | Feedback: {}",
                record.round,
                own.label,
                seat.opponent(),
                opponent.label,
                record.feedback
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turns an answer into a decision, if it has both markers and a known signal.
fn read_decision(text: &str) -> Option<Decision> {
    let parsed = parse_response(text)?;
    let label = parsed.choice.parse::<Signal>().ok()?;
    Some(Decision::new(label, parsed.reasoning))
}

/// Asks the agent behind `provider` for its decision.
///
/// # Error
/// - [`QueryError::Provider`] as soon as a request fails.
/// - [`QueryError::InvalidFormat`] once [`MAX_ATTEMPTS`] answers were unusable.
#[instrument(skip(provider, history), fields(round = history.len() + 1))]
pub fn query_decision<P: CompletionProvider + ?Sized>(
    provider: &P,
    model: &str,
    history: &[RoundRecord],
    score: u32,
    seat: Seat,
) -> Result<Decision, QueryError> {
    let user = user_prompt(history, score, seat);

    let mut last_response = String::new();
    for attempt in 1..=MAX_ATTEMPTS {
        let completion = provider
            .complete(model, system_prompt(), &user)
            .map_err(QueryError::Provider)?;

        let text = completion.answer_text();
        if let Some(decision) = read_decision(text) {
            trace!(attempt, label = %decision.label, "decision received");
            return Ok(decision);
        }

        warn!(attempt, response = text, "unusable answer");
        last_response = text.to_owned();
    }

    Err(QueryError::InvalidFormat {
        attempts: MAX_ATTEMPTS,
        last_response,
    })
}
