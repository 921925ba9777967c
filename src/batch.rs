//! Running many independent sessions with the same pairing.
//!
//! Every session gets its own history, score and trace, and writes to the file named by
//! [`Configuration::output_path`] for its index. Sessions are played on worker threads,
//! at most `workers` at a time; with a single worker they run one after the other and
//! print their rounds.
//!
//! Failed sessions are never retried here. Whether a failure stops the batch is decided
//! by the [`FailurePolicy`] of the configuration.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{mpsc, Arc},
};

use anyhow::{anyhow, bail, Context};
use tracing::{info, instrument, warn};

use crate::{
    agent::Player,
    configuration::{Configuration, FailurePolicy},
    game_interface::TraceSink,
    session::{Session, SessionOutcome},
};

type SessionResult = (usize, anyhow::Result<SessionOutcome>);

/// Results of a batch, ordered by session index.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(usize, SessionOutcome)>,
    /// Sessions that failed under [`FailurePolicy::Skip`], with their error.
    pub failures: Vec<(usize, String)>,
}

impl BatchReport {
    pub fn total_score(&self) -> u32 {
        self.outcomes.iter().map(|(_, outcome)| outcome.score).sum()
    }
}

pub struct BatchRunner {
    player_1: Player,
    player_2: Player,
    config: Configuration,
    sink: Arc<dyn TraceSink + Send + Sync>,
}

impl BatchRunner {
    pub fn new(
        player_1: Player,
        player_2: Player,
        config: Configuration,
        sink: Arc<dyn TraceSink + Send + Sync>,
    ) -> BatchRunner {
        BatchRunner {
            player_1,
            player_2,
            config,
            sink,
        }
    }

    /// Plays `sessions` sessions.
    ///
    /// # Errors
    /// - Before any session starts, when the output pattern would give several sessions
    ///   the same file or the players do not sit as the pairing mode says.
    /// - Under [`FailurePolicy::Abort`], the error of the first failed session. Sessions
    ///   already running are awaited, no new one is started.
    #[instrument(skip(self), fields(mode = %self.config.mode, sessions = self.config.sessions))]
    pub fn run(&self) -> anyhow::Result<BatchReport> {
        self.check_setup()?;

        let workers = self.config.effective_workers().max(1);
        let (tx_result, rx_result) = mpsc::channel::<SessionResult>();

        let mut report = BatchReport::default();
        let mut aborted: Option<anyhow::Error> = None;
        let mut next = 0;
        let mut running = 0;

        while next < self.config.sessions && running < workers {
            self.launch_session(next, workers, tx_result.clone());
            next += 1;
            running += 1;
        }

        while running > 0 {
            let (index, result) = rx_result
                .recv()
                .context("session worker stopped without reporting")?;
            running -= 1;

            match result {
                Ok(outcome) => {
                    info!(index, score = outcome.score, "session done");
                    if workers > 1 && self.config.verbose {
                        println!("\x1b[32msession {index}:\x1b[39m {} points", outcome.score);
                    }
                    report.outcomes.push((index, outcome));
                }
                Err(e) => {
                    warn!(index, "session failed: {e:#}");
                    if workers > 1 && self.config.verbose {
                        println!("\x1b[31msession {index}: {e:#}\x1b[39m");
                    }
                    match self.config.failure_policy {
                        FailurePolicy::Skip => report.failures.push((index, format!("{e:#}"))),
                        FailurePolicy::Abort => {
                            if aborted.is_none() {
                                aborted = Some(e.context(format!("session {index} failed")));
                            }
                        }
                    }
                }
            }

            if aborted.is_none() && next < self.config.sessions {
                self.launch_session(next, workers, tx_result.clone());
                next += 1;
                running += 1;
            }
        }

        if let Some(e) = aborted {
            return Err(e);
        }

        report.outcomes.sort_by_key(|(index, _)| *index);
        report.failures.sort_by_key(|(index, _)| *index);
        Ok(report)
    }

    fn check_setup(&self) -> anyhow::Result<()> {
        if self.config.sessions > 1 && !self.config.output_pattern.contains("{index}") {
            bail!(
                "output pattern '{}' has no {{index}}: all {} sessions would write the same file",
                self.config.output_pattern,
                self.config.sessions
            );
        }

        let seats = (self.player_1.kind, self.player_2.kind);
        if seats != self.config.mode.seats() {
            bail!(
                "players ({}, {}) do not match pairing mode '{}'",
                seats.0,
                seats.1,
                self.config.mode
            );
        }
        Ok(())
    }

    fn launch_session(&self, index: usize, workers: usize, tx_result: mpsc::Sender<SessionResult>) {
        let session = Session::new(
            self.player_1.clone(),
            self.player_2.clone(),
            self.config.rounds,
        )
        .with_verbose(self.config.verbose && workers == 1);
        let destination = self.config.output_path(index);
        let sink = self.sink.clone();

        std::thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                session.run(sink.as_ref(), &destination)
            }))
            .unwrap_or_else(|_| Err(anyhow!("session panicked")));

            // the receiver only goes away once every result was collected
            let _ = tx_result.send((index, result));
        });
    }
}
