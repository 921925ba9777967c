//! The hidden pattern and the score it produces.
//!
//! A point is scored on a round where both seats agree, both seats also agreed on the
//! previous round, and the agreed signal changed between the two rounds. Under a
//! strict lockstep alternation every round after the first scores.

use std::fmt;

use tracing::debug;

use crate::decision::{Decision, Signal};

/// What the agents are told after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// First round: nothing to compare with yet.
    AwaitingNextRound,
    /// The round completed the pattern.
    PointAwarded,
    WrongPattern,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::AwaitingNextRound => write!(f, "Awaiting next round to verify pattern"),
            Feedback::PointAwarded => write!(f, "Correct! +1 point awarded"),
            Feedback::WrongPattern => write!(f, "Wrong pattern"),
        }
    }
}

/// Evaluates one round against the previous one.
pub fn judge(previous: Option<(Signal, Signal)>, current: (Signal, Signal)) -> Feedback {
    let Some((p1, p2)) = previous else {
        return Feedback::AwaitingNextRound;
    };
    let (c1, c2) = current;
    if p1 == p2 && c1 == c2 && p1 != c1 {
        Feedback::PointAwarded
    } else {
        Feedback::WrongPattern
    }
}

/// One finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    /// 1-based.
    pub round: usize,
    pub seat_1: Decision,
    pub seat_2: Decision,
    pub feedback: Feedback,
}

/// History and score of a running session.
#[derive(Debug, Default)]
pub struct Scoreboard {
    history: Vec<RoundRecord>,
    score: u32,
}

impl Scoreboard {
    pub fn new() -> Scoreboard {
        Scoreboard::default()
    }

    /// Judges the two decisions against the last recorded round, updates the score
    /// and appends the round to the history.
    pub fn record(&mut self, seat_1: Decision, seat_2: Decision) -> RoundRecord {
        let previous = self
            .history
            .last()
            .map(|last| (last.seat_1.label, last.seat_2.label));
        let feedback = judge(previous, (seat_1.label, seat_2.label));
        if feedback == Feedback::PointAwarded {
            self.score += 1;
        }

        let round = self.history.len() + 1;
        debug!(round, %feedback, score = self.score, "round judged");
        let record = RoundRecord {
            round,
            seat_1,
            seat_2,
            feedback,
        };
        self.history.push(record.clone());
        record
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Signal::{Blue, Red};

    fn play(board: &mut Scoreboard, a: Signal, b: Signal) -> Feedback {
        board
            .record(Decision::new(a, "a"), Decision::new(b, "b"))
            .feedback
    }

    #[test]
    fn first_round_never_scores() {
        for (a, b) in [(Red, Red), (Red, Blue), (Blue, Red), (Blue, Blue)] {
            let mut board = Scoreboard::new();
            assert_eq!(play(&mut board, a, b), Feedback::AwaitingNextRound);
            assert_eq!(board.score(), 0);
        }
    }

    #[test]
    fn matched_switch_scores() {
        assert_eq!(judge(Some((Blue, Blue)), (Red, Red)), Feedback::PointAwarded);
        assert_eq!(judge(Some((Red, Red)), (Blue, Blue)), Feedback::PointAwarded);
    }

    #[test]
    fn matched_repeat_does_not_score() {
        assert_eq!(judge(Some((Red, Red)), (Red, Red)), Feedback::WrongPattern);
    }

    #[test]
    fn previous_mismatch_never_scores() {
        for current in [(Red, Red), (Red, Blue), (Blue, Red), (Blue, Blue)] {
            assert_eq!(judge(Some((Red, Blue)), current), Feedback::WrongPattern);
        }
    }

    #[test]
    fn current_mismatch_does_not_score() {
        assert_eq!(judge(Some((Red, Red)), (Blue, Red)), Feedback::WrongPattern);
    }

    #[test]
    fn history_and_score_accumulate() {
        let mut board = Scoreboard::new();
        play(&mut board, Red, Red);
        play(&mut board, Blue, Blue);
        play(&mut board, Blue, Blue);
        play(&mut board, Red, Red);
        play(&mut board, Red, Blue);

        assert_eq!(board.score(), 2);
        let rounds: Vec<_> = board.history().iter().map(|r| r.round).collect();
        assert_eq!(rounds, [1, 2, 3, 4, 5]);
        let feedback: Vec<_> = board.history().iter().map(|r| r.feedback).collect();
        assert_eq!(
            feedback,
            [
                Feedback::AwaitingNextRound,
                Feedback::PointAwarded,
                Feedback::WrongPattern,
                Feedback::PointAwarded,
                Feedback::WrongPattern,
            ]
        );
    }

    #[test]
    fn lockstep_alternation_scores_every_round_after_the_first() {
        let mut board = Scoreboard::new();
        for signal in [Red, Blue, Red, Blue] {
            play(&mut board, signal, signal);
        }
        assert_eq!(board.score(), 3);
    }
}
