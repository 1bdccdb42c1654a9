use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of the acting seat's turn.
/// A turn is one draw, any number of melds or additions, then one discard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum TurnState {
    /// Turn start: the seat must draw from the deck or the discard pile
    AwaitingDraw,
    /// After the draw: the seat may meld, add to the bank, or discard
    AwaitingDiscardOrMeld,
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::AwaitingDraw => f.write_str("waiting for a draw"),
            TurnState::AwaitingDiscardOrMeld => f.write_str("waiting for a meld or discard"),
        }
    }
}

/// The contract of a Carioca round: how many trios and runs it asks for.
/// A match plays the ten rounds in declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RoundType {
    TwoTrios = 1,
    TrioAndRun = 2,
    TwoRuns = 3,
    ThreeTrios = 4,
    TwoTriosAndRun = 5,
    TrioAndTwoRuns = 6,
    ThreeRuns = 7,
    FourTrios = 8,
    TwoTriosAndTwoRuns = 9,
    FourRuns = 10,
}

impl RoundType {
    pub const ALL: [RoundType; 10] = [
        RoundType::TwoTrios,
        RoundType::TrioAndRun,
        RoundType::TwoRuns,
        RoundType::ThreeTrios,
        RoundType::TwoTriosAndRun,
        RoundType::TrioAndTwoRuns,
        RoundType::ThreeRuns,
        RoundType::FourTrios,
        RoundType::TwoTriosAndTwoRuns,
        RoundType::FourRuns,
    ];

    /// 1-based round number.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// `(trios, runs)` the contract asks for.
    pub fn requirement(self) -> (usize, usize) {
        match self {
            RoundType::TwoTrios => (2, 0),
            RoundType::TrioAndRun => (1, 1),
            RoundType::TwoRuns => (0, 2),
            RoundType::ThreeTrios => (3, 0),
            RoundType::TwoTriosAndRun => (2, 1),
            RoundType::TrioAndTwoRuns => (1, 2),
            RoundType::ThreeRuns => (0, 3),
            RoundType::FourTrios => (4, 0),
            RoundType::TwoTriosAndTwoRuns => (2, 2),
            RoundType::FourRuns => (0, 4),
        }
    }

    /// The round after this one; `None` after the last.
    pub fn next(self) -> Option<RoundType> {
        RoundType::ALL.get(usize::from(self.number())).copied()
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Round {}", self.number())
    }
}
