//! Config for the game runner behaviors
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional and case-insensitive. A value that does not parse is logged as a
//! warning and the default is used instead.
//!
//! - `GAME_VERBOSE` — Print rounds to stdout (default: `true`)
//! - `GAME_LOG` — Enable logging to a file (default: `false`)
//! - `GAME_MODE` — `chatgpt`, `deepseek` or `mixed` (default: `mixed`)
//! - `GAME_ROUNDS` — Rounds per session (default: `30`)
//! - `GAME_SESSIONS` — Sessions in the batch (default: `100`)
//! - `GAME_OUTPUT` — Output file pattern (default: `data/{mode}_flag_game_{index}.json`)
//! - `GAME_WORKERS` — Sessions played at the same time, `0` for one per CPU (default: `1`)
//! - `GAME_FAILURE_POLICY` — `abort` or `skip` (default: `abort`)

use std::{fmt, path::PathBuf, str::FromStr};

use tracing::warn;

use crate::agent::ProviderKind;

/// Which kinds of agents face each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingMode {
    /// Two ChatGPT agents.
    ChatGpt,
    /// Two DeepSeek agents.
    DeepSeek,
    /// ChatGPT in seat 1, DeepSeek in seat 2.
    Mixed,
}

impl PairingMode {
    /// Provider kind of seat 1 and seat 2.
    pub fn seats(self) -> (ProviderKind, ProviderKind) {
        match self {
            PairingMode::ChatGpt => (ProviderKind::ChatGpt, ProviderKind::ChatGpt),
            PairingMode::DeepSeek => (ProviderKind::DeepSeek, ProviderKind::DeepSeek),
            PairingMode::Mixed => (ProviderKind::ChatGpt, ProviderKind::DeepSeek),
        }
    }
}

impl fmt::Display for PairingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingMode::ChatGpt => write!(f, "chatgpt"),
            PairingMode::DeepSeek => write!(f, "deepseek"),
            PairingMode::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for PairingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chatgpt" => Ok(PairingMode::ChatGpt),
            "deepseek" => Ok(PairingMode::DeepSeek),
            "mixed" => Ok(PairingMode::Mixed),
            other => Err(format!("unknown pairing mode '{other}'")),
        }
    }
}

/// What the batch does when a session fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop launching sessions and return the error.
    Abort,
    /// Record the failure and keep going.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(format!("unknown failure policy '{other}'")),
        }
    }
}

/// Configuration for the game runner.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) mode: PairingMode,
    pub(crate) rounds: usize,
    pub(crate) sessions: usize,
    pub(crate) output_pattern: String,
    pub(crate) workers: usize,
    pub(crate) failure_policy: FailurePolicy,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Rounds are printed to stdout.
    /// - Logging to file is disabled.
    /// - ChatGPT plays against DeepSeek.
    /// - 100 sessions of 30 rounds are played, one at a time.
    /// - Traces go to `data/{mode}_flag_game_{index}.json`.
    /// - The first failed session stops the batch.
    pub fn new() -> Self {
        Self {
            verbose: true,
            log: false,
            mode: PairingMode::Mixed,
            rounds: 30,
            sessions: 100,
            output_pattern: "data/{mode}_flag_game_{index}.json".to_owned(),
            workers: 1,
            failure_policy: FailurePolicy::Abort,
        }
    }

    /// Create configuration from environment variables (see module documentation).
    pub fn from_env() -> Self {
        let default = Self::new();
        Self {
            verbose: get_env_flag("GAME_VERBOSE", default.verbose),
            log: Self::log_from_env(),
            mode: get_env_parsed("GAME_MODE", default.mode),
            rounds: get_env_parsed("GAME_ROUNDS", default.rounds),
            sessions: get_env_parsed("GAME_SESSIONS", default.sessions),
            output_pattern: std::env::var("GAME_OUTPUT").unwrap_or(default.output_pattern),
            workers: get_env_parsed("GAME_WORKERS", default.workers),
            failure_policy: get_env_parsed("GAME_FAILURE_POLICY", default.failure_policy),
        }
    }

    /// Whether `GAME_LOG` asks for a log file. Readable before any logger is set up, so
    /// that the warnings of [`Configuration::from_env()`] reach the chosen output.
    pub fn log_from_env() -> bool {
        get_env_flag("GAME_LOG", Self::new().log)
    }

    /// Enable or disable printing rounds to stdout.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    pub fn with_mode(mut self, mode: PairingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Number of rounds in every session.
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Number of sessions in the batch.
    pub fn with_sessions(mut self, sessions: usize) -> Self {
        self.sessions = sessions;
        self
    }

    /// Output file pattern. `{mode}` and `{index}` are substituted.
    pub fn with_output_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.output_pattern = pattern.into();
        self
    }

    /// Number of sessions played at the same time. `0` uses one per logical CPU.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn mode(&self) -> PairingMode {
        self.mode
    }

    pub fn log(&self) -> bool {
        self.log
    }

    /// Where the trace of session `index` is written.
    pub fn output_path(&self, index: usize) -> PathBuf {
        PathBuf::from(
            self.output_pattern
                .replace("{mode}", &self.mode.to_string())
                .replace("{index}", &index.to_string()),
        )
    }

    /// Worker count with `0` resolved to the number of CPUs.
    pub(crate) fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

fn get_env_flag(var: &str, default: bool) -> bool {
    parse_env_value(var, std::env::var(var).ok(), default, |val| {
        match val.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    })
}

fn get_env_parsed<T: FromStr>(var: &str, default: T) -> T {
    parse_env_value(var, std::env::var(var).ok(), default, |val| val.parse().ok())
}

/// Value of `var` when `raw` is set and `parse` accepts it, `default` otherwise.
fn parse_env_value<T>(
    var: &str,
    raw: Option<String>,
    default: T,
    parse: impl FnOnce(&str) -> Option<T>,
) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match parse(raw.trim()) {
        Some(value) => value,
        None => {
            warn!(var, value = %raw, "invalid value, using the default");
            default
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path() {
        let config = Configuration::new();
        assert_eq!(
            config.output_path(7),
            PathBuf::from("data/mixed_flag_game_7.json")
        );
    }

    #[test]
    fn custom_output_path() {
        let config = Configuration::new()
            .with_mode(PairingMode::DeepSeek)
            .with_output_pattern("out/{index}-{mode}.json");
        assert_eq!(config.output_path(0), PathBuf::from("out/0-deepseek.json"));
    }

    #[test]
    fn pairing_seats() {
        assert_eq!(
            PairingMode::Mixed.seats(),
            (ProviderKind::ChatGpt, ProviderKind::DeepSeek)
        );
        assert_eq!(
            PairingMode::DeepSeek.seats(),
            (ProviderKind::DeepSeek, ProviderKind::DeepSeek)
        );
    }

    #[test]
    fn parse_modes_and_policies() {
        assert_eq!("ChatGPT".parse(), Ok(PairingMode::ChatGpt));
        assert_eq!(" mixed ".parse(), Ok(PairingMode::Mixed));
        assert!("both".parse::<PairingMode>().is_err());
        assert_eq!("SKIP".parse(), Ok(FailurePolicy::Skip));
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn zero_workers_means_all_cpus() {
        assert_eq!(Configuration::new().with_workers(0).effective_workers(), num_cpus::get());
        assert_eq!(Configuration::new().with_workers(3).effective_workers(), 3);
    }

    #[test]
    fn env_values_fall_back_on_typos() {
        let parse_usize = |val: &str| val.parse::<usize>().ok();
        assert_eq!(parse_env_value("GAME_ROUNDS", Some("12".into()), 30, parse_usize), 12);
        assert_eq!(parse_env_value("GAME_ROUNDS", Some(" 12 ".into()), 30, parse_usize), 12);
        assert_eq!(parse_env_value("GAME_ROUNDS", Some("1O".into()), 30, parse_usize), 30);
        assert_eq!(parse_env_value("GAME_ROUNDS", None, 30, parse_usize), 30);

        let parse_mode = |val: &str| val.parse::<PairingMode>().ok();
        assert_eq!(
            parse_env_value("GAME_MODE", Some("deepseak".into()), PairingMode::Mixed, parse_mode),
            PairingMode::Mixed
        );
        assert_eq!(
            parse_env_value("GAME_MODE", Some("DeepSeek".into()), PairingMode::Mixed, parse_mode),
            PairingMode::DeepSeek
        );
    }
}
