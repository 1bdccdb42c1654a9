use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Represents one of the four suits of a French deck.
/// Jokers carry no suit, see [`Card::suit`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

/// Represents the rank of a card. `Joker` is the wildcard; the others run
/// from Ace (1) to King (13), Ace counting low by default.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Wildcard (0)
    Joker = 0,
    /// Ace (1, or 14 at the top of a run)
    Ace = 1,
    /// Rank 2
    Two,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
}

impl Rank {
    pub fn from_u8(v: u8) -> Option<Rank> {
        match v {
            0 => Some(Rank::Joker),
            1 => Some(Rank::Ace),
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Rank::Joker => "JOKER",
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// A single playing card.
///
/// The suit is absent exactly when the rank is [`Rank::Joker`]; every
/// constructor upholds this, so a `Card` in hand is always well formed.
///
/// ```
/// use carioca_engine::cards::{Card, Rank, Suit};
///
/// let ace = Card::new(Suit::Spades, Rank::Ace);
/// assert_eq!(ace.to_string(), "A♠");
/// assert_eq!("AS".parse::<Card>().unwrap(), ace);
///
/// // A joker never keeps a suit
/// assert_eq!(Card::new(Suit::Hearts, Rank::Joker), Card::joker());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    suit: Option<Suit>,
    rank: Rank,
}

impl Card {
    /// Builds a suited card; `Rank::Joker` yields the suit-less joker.
    pub const fn new(suit: Suit, rank: Rank) -> Card {
        match rank {
            Rank::Joker => Card::joker(),
            _ => Card {
                suit: Some(suit),
                rank,
            },
        }
    }

    pub const fn joker() -> Card {
        Card {
            suit: None,
            rank: Rank::Joker,
        }
    }

    /// Builds a card from raw parts, rejecting a suited joker or a suit-less
    /// standard card.
    pub fn from_parts(suit: Option<Suit>, rank: Rank) -> Result<Card, GameError> {
        match (suit, rank) {
            (None, Rank::Joker) => Ok(Card::joker()),
            (Some(s), r) if r != Rank::Joker => Ok(Card::new(s, r)),
            _ => Err(GameError::InvalidCard(format!("{:?} {:?}", suit, rank))),
        }
    }

    pub fn suit(&self) -> Option<Suit> {
        self.suit
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn is_joker(&self) -> bool {
        self.rank == Rank::Joker
    }
}

#[derive(Deserialize)]
struct RawCard {
    suit: Option<Suit>,
    rank: Rank,
}

impl TryFrom<RawCard> for Card {
    type Error = GameError;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        Card::from_parts(raw.suit, raw.rank)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            None => f.write_str(Rank::Joker.label()),
            Some(s) => write!(f, "{}{}", self.rank.label(), s.symbol()),
        }
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let upper = t.to_ascii_uppercase();
        if upper == "JOKER" || upper == "JK" {
            return Ok(Card::joker());
        }
        let bad = || GameError::InvalidCard(s.to_string());

        let suit_char = upper.chars().last().ok_or_else(bad)?;
        let suit = match suit_char {
            'C' | '♣' => Suit::Clubs,
            'D' | '♦' => Suit::Diamonds,
            'H' | '♥' => Suit::Hearts,
            'S' | '♠' => Suit::Spades,
            _ => return Err(bad()),
        };
        let rank_part = &upper[..upper.len() - suit_char.len_utf8()];
        let rank = match rank_part {
            "A" => Rank::Ace,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "T" => Rank::Ten,
            n => n
                .parse::<u8>()
                .ok()
                .filter(|v| (2..=10).contains(v))
                .and_then(Rank::from_u8)
                .ok_or_else(bad)?,
        };
        Ok(Card::new(suit, rank))
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

/// Ace through King; the joker is not a deck rank.
pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ]
}

/// Unshuffled contents of `copies` French decks plus `jokers` jokers.
pub fn standard_cards(jokers: usize, copies: usize) -> Vec<Card> {
    let mut v = Vec::new();
    for _ in 0..copies {
        for &s in &all_suits() {
            for &r in &all_ranks() {
                v.push(Card::new(s, r));
            }
        }
    }
    v.extend((0..jokers).map(|_| Card::joker()));
    v
}
