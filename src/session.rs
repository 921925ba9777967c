//! One game between two players.
//!
//! A [`Session`] plays its rounds strictly in order: seat 1 is asked first (retries
//! included), then seat 2, then the round is judged and recorded. The trace is handed
//! to the [`TraceSink`] exactly once when the session ends, whether it finished or
//! was aborted by an error.

use std::path::Path;

use anyhow::Context;
use tracing::{error, info, instrument};

use crate::{
    agent::{Player, Seat},
    agent_query::query_decision,
    decision::Decision,
    game_interface::TraceSink,
    scoring::{RoundRecord, Scoreboard},
    trace::SessionTrace,
};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[39m";

/// What a finished session returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub rounds: usize,
    pub score: u32,
}

pub struct Session {
    player_1: Player,
    player_2: Player,
    rounds: usize,
    verbose: bool,
}

impl Session {
    pub fn new(player_1: Player, player_2: Player, rounds: usize) -> Session {
        Session {
            player_1,
            player_2,
            rounds,
            verbose: false,
        }
    }

    /// Print rounds to stdout.
    pub fn with_verbose(mut self, verbose: bool) -> Session {
        self.verbose = verbose;
        self
    }

    /// Plays every round, then writes the trace to `destination`.
    ///
    /// # Errors
    /// The first error of a round stops the session. The rounds played so far are still
    /// written before the error is returned. A failing flush after a complete game is
    /// returned as well.
    #[instrument(skip(self, sink), fields(player_1 = %self.player_1.name, player_2 = %self.player_2.name))]
    pub fn run(&self, sink: &dyn TraceSink, destination: &Path) -> anyhow::Result<SessionOutcome> {
        if self.verbose {
            println!(
                "\n{RED}Synchronization Game{RESET} {} vs {} ({} rounds)\n",
                self.player_1.name, self.player_2.name, self.rounds
            );
        }

        let mut board = Scoreboard::new();
        let mut trace = SessionTrace::new();
        let played = self.play_rounds(&mut board, &mut trace);

        if let Err(e) = &played {
            error!("session aborted: {e:#}");
            if self.verbose {
                println!("\n{RED}SERIOUS ERROR: {e:#}{RESET}");
            }
        }

        let flushed = sink
            .flush(&trace, destination)
            .with_context(|| format!("could not save trace to {}", destination.display()));
        match &flushed {
            Ok(()) if self.verbose => println!("\nGame data saved to: {}", destination.display()),
            Ok(()) => {}
            Err(e) => error!("{e:#}"),
        }

        // a round error wins over a flush error
        played?;
        flushed?;

        info!(score = board.score(), "session finished");
        if self.verbose {
            println!("\nFinal Score: {} points!", board.score());
        }
        Ok(SessionOutcome {
            rounds: board.history().len(),
            score: board.score(),
        })
    }

    fn play_rounds(&self, board: &mut Scoreboard, trace: &mut SessionTrace) -> anyhow::Result<()> {
        let seats = (self.player_1.kind, self.player_2.kind);

        for round in 1..=self.rounds {
            let seat_1 = self
                .ask(&self.player_1, board, Seat::One)
                .with_context(|| format!("round {round}: {} failed to answer", Seat::One))?;
            let seat_2 = self
                .ask(&self.player_2, board, Seat::Two)
                .with_context(|| format!("round {round}: {} failed to answer", Seat::Two))?;

            let record = board.record(seat_1, seat_2);
            let score = board.score();
            trace.push(&record, seats, score);

            info!(
                round,
                seat_1 = %record.seat_1.label,
                seat_2 = %record.seat_2.label,
                feedback = %record.feedback,
                score,
                "round played"
            );
            if self.verbose {
                self.print_round(&record, score);
            }
        }
        Ok(())
    }

    fn ask(&self, player: &Player, board: &Scoreboard, seat: Seat) -> anyhow::Result<Decision> {
        Ok(query_decision(
            player.provider.as_ref(),
            &player.model,
            board.history(),
            board.score(),
            seat,
        )?)
    }

    fn print_round(&self, record: &RoundRecord, score: u32) {
        println!("Round {}:", record.round);
        println!("{BLUE}{}{RESET}: {}", self.player_1.name, record.seat_1.label);
        println!("Reasoning: {}", record.seat_1.justification);
        println!("\n{BLUE}{}{RESET}: {}", self.player_2.name, record.seat_2.label);
        println!("Reasoning: {}", record.seat_2.justification);
        if record.round > 1 {
            println!("\n{GREEN}Feedback:{RESET} {} | Points: {score}", record.feedback);
        } else {
            println!("\n{GREEN}Feedback:{RESET} {}", record.feedback);
        }
        println!("{}\n", "─".repeat(70));
    }
}
