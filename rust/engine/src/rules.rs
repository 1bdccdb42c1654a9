use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::RuleViolation;

/// Highest value a run may reach: an Ace played above the King.
pub const ACE_HIGH: u8 = 14;

/// Lowest value a run may start at: an Ace played below the Two.
pub const ACE_LOW: u8 = 1;

/// Kind of a meld on the table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    /// Same rank, distinct suits
    Trio,
    /// Same suit, consecutive ranks
    Run,
}

/// The interval a run occupies once its joker and Ace are placed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RunResolution {
    /// First value of the interval (1..=14)
    pub start: u8,
    /// Last value of the interval (1..=14)
    pub end: u8,
    /// Whether Aces were counted as 14
    pub ace_high: bool,
}

impl RunResolution {
    /// Every value of the interval, low to high.
    pub fn ranks(&self) -> Vec<u8> {
        (self.start..=self.end).collect()
    }
}

fn split_jokers(cards: &[Card]) -> (usize, Vec<Card>) {
    let (jokers, naturals): (Vec<Card>, Vec<Card>) = cards.iter().copied().partition(|c| c.is_joker());
    (jokers.len(), naturals)
}

/// Checks that `cards` form a trio: exactly three cards, at most one joker,
/// one rank, no repeated suit.
///
/// # Examples
///
/// ```
/// use carioca_engine::cards::Card;
/// use carioca_engine::errors::RuleViolation;
/// use carioca_engine::rules::classify_trio;
///
/// let cards = |s: &[&str]| s.iter().map(|c| c.parse::<Card>().unwrap()).collect::<Vec<_>>();
///
/// assert!(classify_trio(&cards(&["AS", "AH", "AD"])).is_ok());
/// assert!(classify_trio(&cards(&["AS", "AH", "JOKER"])).is_ok());
/// assert_eq!(
///     classify_trio(&cards(&["AS", "AH", "AS"])),
///     Err(RuleViolation::RepeatedSuit)
/// );
/// ```
pub fn classify_trio(cards: &[Card]) -> Result<(), RuleViolation> {
    if cards.len() != 3 {
        return Err(RuleViolation::TrioSize(cards.len()));
    }
    check_trio_cards(cards)
}

fn check_trio_cards(cards: &[Card]) -> Result<(), RuleViolation> {
    let (jokers, naturals) = split_jokers(cards);
    if jokers > 1 {
        return Err(RuleViolation::TooManyJokers);
    }
    let first = naturals.first().ok_or(RuleViolation::OnlyJokers)?;
    if naturals.iter().any(|c| c.rank() != first.rank()) {
        return Err(RuleViolation::MixedRanks);
    }
    let mut suits = HashSet::new();
    if !naturals.iter().all(|c| suits.insert(c.suit())) {
        return Err(RuleViolation::RepeatedSuit);
    }
    Ok(())
}

/// Checks that `cards` form a run and resolves the interval it covers.
///
/// A run is four or more cards of one suit with consecutive ranks. At most
/// one joker may stand in for a missing rank. The Ace is tried low (1) first
/// and then high (14); played high it must close the run, so `Q-K-A-2` never
/// wraps. When several intervals fit, the lowest start wins.
///
/// # Errors
///
/// Returns the first [`RuleViolation`] found: size, jokers, suit, repeated
/// rank, then consecutiveness.
///
/// # Examples
///
/// ```
/// use carioca_engine::cards::Card;
/// use carioca_engine::rules::classify_run;
///
/// let cards = |s: &[&str]| s.iter().map(|c| c.parse::<Card>().unwrap()).collect::<Vec<_>>();
///
/// let low = classify_run(&cards(&["AS", "2S", "3S", "JOKER"])).unwrap();
/// assert_eq!(low.ranks(), vec![1, 2, 3, 4]);
///
/// let high = classify_run(&cards(&["JS", "QS", "KS", "AS"])).unwrap();
/// assert!(high.ace_high);
/// assert_eq!(high.ranks(), vec![11, 12, 13, 14]);
///
/// assert!(classify_run(&cards(&["2S", "3S", "5S", "6S"])).is_err());
/// ```
pub fn classify_run(cards: &[Card]) -> Result<RunResolution, RuleViolation> {
    if cards.len() < 4 {
        return Err(RuleViolation::RunTooShort(cards.len()));
    }
    let (jokers, naturals) = split_jokers(cards);
    if jokers > 1 {
        return Err(RuleViolation::TooManyJokers);
    }
    let first = naturals.first().ok_or(RuleViolation::OnlyJokers)?;
    if naturals.iter().any(|c| c.suit() != first.suit()) {
        return Err(RuleViolation::MixedSuits);
    }
    let ranks: Vec<u8> = naturals.iter().map(|c| c.rank().value()).collect();
    let mut seen = HashSet::new();
    if !ranks.iter().all(|r| seen.insert(*r)) {
        return Err(RuleViolation::RepeatedRank);
    }

    [false, true]
        .into_iter()
        .find_map(|ace_high| resolve_sequence(&ranks, cards.len(), jokers, ace_high))
        .ok_or(if jokers == 1 {
            RuleViolation::NotConsecutiveWithJoker
        } else {
            RuleViolation::NotConsecutive
        })
}

fn resolve_sequence(
    ranks: &[u8],
    len: usize,
    jokers: usize,
    ace_high: bool,
) -> Option<RunResolution> {
    let mut mapped: Vec<i32> = ranks
        .iter()
        .map(|&v| {
            if ace_high && v == ACE_LOW {
                i32::from(ACE_HIGH)
            } else {
                i32::from(v)
            }
        })
        .collect();
    mapped.sort_unstable();
    let (min, max) = (*mapped.first()?, *mapped.last()?);
    let len = i32::try_from(len).ok()?;

    for start in (max - (len - 1))..=min {
        let end = start + len - 1;
        if start < i32::from(ACE_LOW) || end > i32::from(ACE_HIGH) {
            continue;
        }
        let missing = (start..=end)
            .filter(|v| mapped.binary_search(v).is_err())
            .count();
        if missing != jokers {
            continue;
        }
        if ace_high && (start..=end).contains(&i32::from(ACE_HIGH)) && end != i32::from(ACE_HIGH) {
            continue;
        }
        return Some(RunResolution {
            start: u8::try_from(start).ok()?,
            end: u8::try_from(end).ok()?,
            ace_high,
        });
    }
    None
}

/// Classifies a selection as a trio or, failing that, a run.
///
/// When both fail, selections shorter than four cards report why they are
/// not a trio and longer ones report why they are not a run.
pub fn classify(cards: &[Card]) -> Result<MeldKind, RuleViolation> {
    match classify_trio(cards) {
        Ok(()) => Ok(MeldKind::Trio),
        Err(trio) => match classify_run(cards) {
            Ok(_) => Ok(MeldKind::Run),
            Err(run) => Err(if cards.len() < 4 { trio } else { run }),
        },
    }
}

/// Whether `card` can join the trio `group`: a joker only if the group has
/// none, any other card only with the group's rank and an unused suit.
pub fn can_extend_trio(group: &[Card], card: Card) -> Result<(), RuleViolation> {
    let (jokers, naturals) = split_jokers(group);
    if card.is_joker() && jokers >= 1 {
        return Err(RuleViolation::GroupHasJoker);
    }
    let first = naturals
        .first()
        .ok_or_else(|| RuleViolation::InvalidGroup(Box::new(RuleViolation::OnlyJokers)))?;
    if card.is_joker() {
        return Ok(());
    }
    if card.rank() != first.rank() {
        return Err(RuleViolation::WrongRank);
    }
    if naturals.iter().any(|c| c.suit() == card.suit()) {
        return Err(RuleViolation::SuitAlreadyInTrio);
    }
    Ok(())
}

/// Whether `card` can join the run `group` at either end.
///
/// The group's interval is resolved with [`classify_run`]; a natural card
/// must land on `start - 1` or `end + 1` (an Ace counts as 14 after a
/// King), and a joker needs room on either side within `1..=14`.
///
/// ```
/// use carioca_engine::cards::Card;
/// use carioca_engine::rules::can_extend_run;
///
/// let run: Vec<Card> = ["5H", "6H", "7H", "8H"].iter().map(|c| c.parse().unwrap()).collect();
/// assert!(can_extend_run(&run, "4H".parse().unwrap()).is_ok());
/// assert!(can_extend_run(&run, "9H".parse().unwrap()).is_ok());
/// assert!(can_extend_run(&run, "10H".parse().unwrap()).is_err());
/// ```
pub fn can_extend_run(group: &[Card], card: Card) -> Result<(), RuleViolation> {
    let (jokers, naturals) = split_jokers(group);
    if card.is_joker() && jokers >= 1 {
        return Err(RuleViolation::GroupHasJoker);
    }
    let first = naturals
        .first()
        .ok_or_else(|| RuleViolation::InvalidGroup(Box::new(RuleViolation::OnlyJokers)))?;
    if !card.is_joker() && card.suit() != first.suit() {
        return Err(RuleViolation::WrongSuit);
    }
    let run = classify_run(group).map_err(|e| RuleViolation::InvalidGroup(Box::new(e)))?;

    if card.is_joker() {
        if run.start <= ACE_LOW && run.end >= ACE_HIGH {
            return Err(RuleViolation::RunFull);
        }
    } else {
        let mut v = card.rank().value();
        if v == ACE_LOW && run.end == 13 {
            v = ACE_HIGH;
        }
        if v + 1 != run.start && v != run.end + 1 {
            return Err(RuleViolation::NotAtRunEnd);
        }
    }

    let mut extended = group.to_vec();
    extended.push(card);
    classify_run(&extended).map(|_| ())
}

/// Checks a group already on the table. Trios may hold more than three cards
/// here, since extension grows them.
pub fn validate_group(kind: MeldKind, cards: &[Card]) -> Result<(), RuleViolation> {
    match kind {
        MeldKind::Trio => {
            if cards.len() < 3 {
                return Err(RuleViolation::TrioSize(cards.len()));
            }
            check_trio_cards(cards)
        }
        MeldKind::Run => classify_run(cards).map(|_| ()),
    }
}
