//! Persisted record of a session and the JSON file sink writing it.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{agent::ProviderKind, game_interface::TraceSink, scoring::RoundRecord};

/// One round as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub round: usize,
    pub player_1: String,
    pub color_player_1: String,
    pub reasoning_player_1: String,
    pub player_2: String,
    pub color_player_2: String,
    pub reasoning_player_2: String,
    /// Cumulative score after this round.
    pub score: u32,
}

/// Every round of a session, in order. Serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionTrace {
    entries: Vec<TraceEntry>,
}

impl SessionTrace {
    pub fn new() -> SessionTrace {
        SessionTrace::default()
    }

    pub(crate) fn push(
        &mut self,
        record: &RoundRecord,
        seats: (ProviderKind, ProviderKind),
        score: u32,
    ) {
        self.entries.push(TraceEntry {
            round: record.round,
            player_1: seats.0.tag().to_owned(),
            color_player_1: record.seat_1.label.to_string(),
            reasoning_player_1: record.seat_1.justification.clone(),
            player_2: seats.1.tag().to_owned(),
            color_player_2: record.seat_2.label.to_string(),
            reasoning_player_2: record.seat_2.justification.clone(),
            score,
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Writes traces as pretty-printed JSON files.
///
/// Missing parent directories are created. The document is first written next to
/// the destination and then renamed over it, so readers never see half a file.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileSink;

impl TraceSink for JsonFileSink {
    #[instrument(skip(self, trace), fields(rounds = trace.len()))]
    fn flush(&self, trace: &SessionTrace, destination: &Path) -> anyhow::Result<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("could not create directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(trace).context("could not serialize trace")?;
        let tmp = temporary_path(destination);
        let mut file = fs::File::create(&tmp)
            .with_context(|| format!("could not create {}", tmp.display()))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .with_context(|| format!("could not write {}", tmp.display()))?;
        drop(file);

        fs::rename(&tmp, destination)
            .with_context(|| format!("could not move trace to {}", destination.display()))?;
        info!("trace written");
        Ok(())
    }
}

fn temporary_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "trace".into());
    name.push(".tmp");
    destination.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        decision::{Decision, Signal},
        scoring::Feedback,
    };

    fn sample_trace() -> SessionTrace {
        let mut trace = SessionTrace::new();
        let record = RoundRecord {
            round: 1,
            seat_1: Decision::new(Signal::Red, "start red"),
            seat_2: Decision::new(Signal::Blue, "start blue"),
            feedback: Feedback::AwaitingNextRound,
        };
        trace.push(&record, (ProviderKind::ChatGpt, ProviderKind::DeepSeek), 0);
        trace
    }

    #[test]
    fn serializes_as_array_of_rounds() {
        let value = serde_json::to_value(sample_trace()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "round": 1,
                "player_1": "chatgpt",
                "color_player_1": "Red",
                "reasoning_player_1": "start red",
                "player_2": "deepseek",
                "color_player_2": "Blue",
                "reasoning_player_2": "start blue",
                "score": 0
            }])
        );
    }

    #[test]
    fn sink_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/nested/run_0.json");

        JsonFileSink.flush(&sample_trace(), &path).unwrap();

        let written: SessionTrace =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, sample_trace());
        assert!(!path.with_file_name("run_0.json.tmp").exists());
    }

    #[test]
    fn empty_trace_is_an_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");

        JsonFileSink.flush(&SessionTrace::new(), &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }
}
