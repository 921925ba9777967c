use std::sync::Arc;

use anyhow::{self, Context};
use coordination_game::{init_logger, init_warning_logger, prelude::*};

/// Plays the batch described by the `GAME_*` environment variables.
fn main() -> anyhow::Result<()> {
    if Configuration::log_from_env() {
        init_logger()?;
    } else {
        init_warning_logger()?;
    }
    let config = Configuration::from_env();

    let (player_1, player_2) =
        players_from_env(config.mode()).context("could not create players")?;

    let runner = BatchRunner::new(player_1, player_2, config, Arc::new(JsonFileSink));
    let report = runner.run()?;

    println!(
        "{} sessions played, {} points in total",
        report.outcomes.len(),
        report.total_score()
    );
    for (index, error) in &report.failures {
        println!("session {index} failed: {error}");
    }
    Ok(())
}
