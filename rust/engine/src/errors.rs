use thiserror::Error;

use crate::game::TurnState;

/// Why a set of cards is not a legal meld or extension.
///
/// The `Display` text is the reason shown to the player.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("A trio is exactly 3 cards (got {0})")]
    TrioSize(usize),
    #[error("A run needs at least 4 cards (got {0})")]
    RunTooShort(usize),
    #[error("At most 1 joker per group")]
    TooManyJokers,
    #[error("A group cannot be made only of jokers")]
    OnlyJokers,
    #[error("Every card in a trio must share the same rank")]
    MixedRanks,
    #[error("A trio cannot repeat a suit")]
    RepeatedSuit,
    #[error("Every card in a run must share the same suit")]
    MixedSuits,
    #[error("A run cannot repeat a rank")]
    RepeatedRank,
    #[error("The run is not consecutive")]
    NotConsecutive,
    #[error("The run is not consecutive, even with 1 joker filling a single gap")]
    NotConsecutiveWithJoker,
    #[error("That group already has a joker")]
    GroupHasJoker,
    #[error("That trio is of a different rank")]
    WrongRank,
    #[error("That suit is already in the trio")]
    SuitAlreadyInTrio,
    #[error("The card is not of the run's suit")]
    WrongSuit,
    #[error("Cards can only be added at either end of the run")]
    NotAtRunEnd,
    #[error("No room left to extend the run with a joker")]
    RunFull,
    #[error("The group on the table is not valid: {0}")]
    InvalidGroup(Box<RuleViolation>),
    #[error("There are no groups on the table yet")]
    EmptyBank,
    #[error("No group on the table accepts that card")]
    NoGroupAccepts,
}

/// Broad class of a [`GameError`], used by callers to decide how loudly to
/// report it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Programmer or host error: bad indices, impossible draws, bad config.
    Structural,
    /// The move breaks a game rule; the player can try something else.
    Rule,
    /// The move is not allowed in the current turn phase.
    Sequencing,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("The deck is empty")]
    EmptyDeck,
    #[error("Neither the deck nor the discard pile has cards to draw")]
    DeckExhausted,
    #[error("The discard pile is empty")]
    EmptyDiscard,
    #[error("Card index {index} is outside the hand (size {len})")]
    SelectionOutOfRange { index: usize, len: usize },
    #[error("Card index {index} was selected twice")]
    DuplicateSelection { index: usize },
    #[error("No cards selected")]
    EmptySelection,
    #[error("Card {0} is not in the hand")]
    CardNotInHand(String),
    #[error("Bank group {index} does not exist (bank size {len})")]
    GroupOutOfRange { index: usize, len: usize },
    #[error("Seat {seat} does not exist (seats {seats})")]
    SeatOutOfRange { seat: usize, seats: usize },
    #[error("Invalid card: {0}")]
    InvalidCard(String),
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
    #[error("Cannot {action} while {state}")]
    OutOfTurn {
        action: &'static str,
        state: TurnState,
    },
    #[error(transparent)]
    Rule(#[from] RuleViolation),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::Rule(_) | GameError::EmptyDiscard => ErrorKind::Rule,
            GameError::OutOfTurn { .. } => ErrorKind::Sequencing,
            _ => ErrorKind::Structural,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

impl From<GameError> for ConfigError {
    fn from(e: GameError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}
