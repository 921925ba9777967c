//! Signals and the decisions agents make with them.

use std::{fmt, str::FromStr};

/// One of the two signals an agent can send each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The red flag.
    Red,
    /// The blue flag.
    Blue,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Red => write!(f, "Red"),
            Signal::Blue => write!(f, "Blue"),
        }
    }
}

impl FromStr for Signal {
    type Err = String;

    /// Case-insensitive. Markdown emphasis and trailing punctuation around the
    /// word are ignored (`**Blue**`, `red.`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.trim_matches(|c: char| !c.is_alphanumeric());
        if word.eq_ignore_ascii_case("red") {
            Ok(Signal::Red)
        } else if word.eq_ignore_ascii_case("blue") {
            Ok(Signal::Blue)
        } else {
            Err(format!("'{s}' is neither Red nor Blue"))
        }
    }
}

/// What one agent answered for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// The chosen signal.
    pub label: Signal,
    /// The agent's short explanation.
    pub justification: String,
}

impl Decision {
    pub fn new(label: Signal, justification: impl Into<String>) -> Decision {
        Decision {
            label,
            justification: justification.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signal_loosely() {
        assert_eq!("Red".parse::<Signal>(), Ok(Signal::Red));
        assert_eq!("  BLUE ".parse::<Signal>(), Ok(Signal::Blue));
        assert_eq!("**blue**".parse::<Signal>(), Ok(Signal::Blue));
        assert_eq!("Red.".parse::<Signal>(), Ok(Signal::Red));
    }

    #[test]
    fn rejects_unknown_signal() {
        assert!("Green".parse::<Signal>().is_err());
        assert!("Red or Blue".parse::<Signal>().is_err());
        assert!("".parse::<Signal>().is_err());
    }
}
