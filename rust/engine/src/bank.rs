use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::{GameError, RuleViolation};
use crate::rules::{can_extend_run, can_extend_trio, MeldKind};

/// A meld lying on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankGroup {
    /// Trio or run
    kind: MeldKind,
    /// Cards in the order they were laid down or added
    cards: Vec<Card>,
}

impl BankGroup {
    pub fn new(kind: MeldKind, cards: Vec<Card>) -> Self {
        Self { kind, cards }
    }

    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn joker_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_joker()).count()
    }

    /// Whether `card` may join this group, by the rule of its kind.
    pub fn accepts(&self, card: Card) -> Result<(), RuleViolation> {
        match self.kind {
            MeldKind::Trio => can_extend_trio(&self.cards, card),
            MeldKind::Run => can_extend_run(&self.cards, card),
        }
    }
}

/// Groups melded during the round, in the order they were laid down.
///
/// The bank does not validate new groups; the table does that before
/// calling [`Bank::add_group`]. Groups are never removed mid-round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    groups: Vec<BankGroup>,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an already validated group and returns its index.
    pub fn add_group(&mut self, kind: MeldKind, cards: Vec<Card>) -> usize {
        self.groups.push(BankGroup::new(kind, cards));
        self.groups.len() - 1
    }

    /// Appends `card` to group `index` if its rule allows it.
    pub fn extend_group(&mut self, index: usize, card: Card) -> Result<(), GameError> {
        let len = self.groups.len();
        let group = self
            .groups
            .get_mut(index)
            .ok_or(GameError::GroupOutOfRange { index, len })?;
        group.accepts(card)?;
        group.cards.push(card);
        Ok(())
    }

    /// Index of the first group, in stored order, that accepts `card`.
    /// This is first-fit: a later group that would also accept it is never
    /// preferred.
    pub fn first_fit(&self, card: Card) -> Result<usize, RuleViolation> {
        if self.groups.is_empty() {
            return Err(RuleViolation::EmptyBank);
        }
        self.groups
            .iter()
            .position(|g| g.accepts(card).is_ok())
            .ok_or(RuleViolation::NoGroupAccepts)
    }

    pub fn groups(&self) -> &[BankGroup] {
        &self.groups
    }

    pub fn get(&self, index: usize) -> Option<&BankGroup> {
        self.groups.get(index)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups of each kind, `(trios, runs)`.
    pub fn counts(&self) -> (usize, usize) {
        let trios = self
            .groups
            .iter()
            .filter(|g| g.kind == MeldKind::Trio)
            .count();
        (trios, self.groups.len() - trios)
    }

    pub fn card_count(&self) -> usize {
        self.groups.iter().map(|g| g.cards.len()).sum()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &[&str]) -> Vec<Card> {
        s.iter().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn extend_appends_on_success() {
        let mut bank = Bank::new();
        let i = bank.add_group(MeldKind::Run, cards(&["5H", "6H", "7H", "8H"]));
        bank.extend_group(i, "9H".parse().unwrap()).unwrap();
        assert_eq!(bank.get(i).unwrap().cards().len(), 5);
        assert_eq!(bank.card_count(), 5);
    }

    #[test]
    fn extend_failure_returns_rule_reason_unchanged() {
        let mut bank = Bank::new();
        let i = bank.add_group(MeldKind::Trio, cards(&["QS", "QH", "QD"]));
        assert_eq!(
            bank.extend_group(i, "QS".parse().unwrap()),
            Err(GameError::Rule(RuleViolation::SuitAlreadyInTrio))
        );
        assert_eq!(bank.get(i).unwrap().cards().len(), 3);
    }

    #[test]
    fn extend_unknown_group_is_structural() {
        let mut bank = Bank::new();
        assert_eq!(
            bank.extend_group(2, Card::joker()),
            Err(GameError::GroupOutOfRange { index: 2, len: 0 })
        );
    }

    #[test]
    fn first_fit_takes_earliest_group() {
        let mut bank = Bank::new();
        bank.add_group(MeldKind::Trio, cards(&["QS", "QH", "QD"]));
        bank.add_group(MeldKind::Trio, cards(&["4S", "4H", "4D"]));
        bank.add_group(MeldKind::Run, cards(&["5H", "6H", "7H", "8H"]));
        assert_eq!(bank.first_fit(Card::joker()), Ok(0));
        assert_eq!(bank.first_fit("4C".parse().unwrap()), Ok(1));
        assert_eq!(bank.first_fit("9H".parse().unwrap()), Ok(2));
        assert_eq!(
            bank.first_fit("2C".parse().unwrap()),
            Err(RuleViolation::NoGroupAccepts)
        );
        assert_eq!(bank.counts(), (2, 1));
    }

    #[test]
    fn first_fit_on_empty_bank() {
        assert_eq!(Bank::new().first_fit(Card::joker()), Err(RuleViolation::EmptyBank));
    }
}
