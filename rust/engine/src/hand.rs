use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;

/// How [`Hand::sort`] orders the natural cards. Jokers always go last.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Group equal ranks together, handy for trios
    #[default]
    RankThenSuit,
    /// Group suits together, handy for runs
    SuitThenRank,
}

/// Compares two cards for display: jokers last, Ace low.
pub fn compare_cards(a: &Card, b: &Card, order: SortOrder) -> Ordering {
    match (a.suit(), b.suit()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(sa), Some(sb)) => match order {
            SortOrder::RankThenSuit => a.rank().cmp(&b.rank()).then(sa.cmp(&sb)),
            SortOrder::SuitThenRank => sa.cmp(&sb).then(a.rank().cmp(&b.rank())),
        },
    }
}

/// The cards one seat holds. Order only matters for display and for
/// index-based selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Checks that `selection` is non-empty, in bounds and free of repeats.
    pub fn check_selection(&self, selection: &[usize]) -> Result<(), GameError> {
        if selection.is_empty() {
            return Err(GameError::EmptySelection);
        }
        let mut seen = HashSet::with_capacity(selection.len());
        for &index in selection {
            if index >= self.cards.len() {
                return Err(GameError::SelectionOutOfRange {
                    index,
                    len: self.cards.len(),
                });
            }
            if !seen.insert(index) {
                return Err(GameError::DuplicateSelection { index });
            }
        }
        Ok(())
    }

    /// Cards at `selection`, in selection order.
    pub fn selected(&self, selection: &[usize]) -> Result<Vec<Card>, GameError> {
        self.check_selection(selection)?;
        Ok(selection.iter().map(|&i| self.cards[i]).collect())
    }

    /// Removes the cards at `selection` and returns them in selection order.
    /// Nothing is removed if the selection is invalid.
    pub fn take(&mut self, selection: &[usize]) -> Result<Vec<Card>, GameError> {
        let taken = self.selected(selection)?;
        let mut indices = selection.to_vec();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        for i in indices {
            self.cards.remove(i);
        }
        Ok(taken)
    }

    /// Resolves cards to distinct hand indices, taking the first unused
    /// copy of each. Useful with multi-deck tables where copies repeat.
    ///
    /// ```
    /// use carioca_engine::cards::Card;
    /// use carioca_engine::hand::Hand;
    ///
    /// let mut hand = Hand::new();
    /// for c in ["7S", "7S", "JOKER"] {
    ///     hand.push(c.parse().unwrap());
    /// }
    /// let seven: Card = "7S".parse().unwrap();
    /// assert_eq!(hand.select(&[seven, seven]).unwrap(), vec![0, 1]);
    /// assert!(hand.select(&[seven, seven, seven]).is_err());
    /// ```
    pub fn select(&self, cards: &[Card]) -> Result<Vec<usize>, GameError> {
        let mut used = vec![false; self.cards.len()];
        cards
            .iter()
            .map(|wanted| {
                let index = self
                    .cards
                    .iter()
                    .enumerate()
                    .position(|(i, c)| !used[i] && c == wanted)
                    .ok_or_else(|| GameError::CardNotInHand(wanted.to_string()))?;
                used[index] = true;
                Ok(index)
            })
            .collect()
    }

    pub fn sort(&mut self, order: SortOrder) {
        self.cards.sort_by(|a, b| compare_cards(a, b, order));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(s: &[&str]) -> Hand {
        let mut h = Hand::new();
        for c in s {
            h.push(c.parse().unwrap());
        }
        h
    }

    fn labels(h: &Hand) -> Vec<String> {
        h.cards().iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn rank_then_suit_puts_jokers_last() {
        let mut h = hand(&["JOKER", "KS", "2H", "2C", "AD"]);
        h.sort(SortOrder::RankThenSuit);
        assert_eq!(labels(&h), vec!["A♦", "2♣", "2♥", "K♠", "JOKER"]);
    }

    #[test]
    fn suit_then_rank_groups_suits() {
        let mut h = hand(&["KS", "JOKER", "2H", "AS", "3C"]);
        h.sort(SortOrder::SuitThenRank);
        assert_eq!(labels(&h), vec!["3♣", "2♥", "A♠", "K♠", "JOKER"]);
    }

    #[test]
    fn take_removes_exactly_the_selection() {
        let mut h = hand(&["2S", "3S", "4S", "5S", "9D"]);
        let taken = h.take(&[3, 0]).unwrap();
        assert_eq!(taken, vec!["5S".parse().unwrap(), "2S".parse().unwrap()]);
        assert_eq!(labels(&h), vec!["3♠", "4♠", "9♦"]);
    }

    #[test]
    fn invalid_selection_leaves_hand_alone() {
        let mut h = hand(&["2S", "3S"]);
        assert_eq!(
            h.take(&[0, 5]),
            Err(GameError::SelectionOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(h.take(&[1, 1]), Err(GameError::DuplicateSelection { index: 1 }));
        assert_eq!(h.take(&[]), Err(GameError::EmptySelection));
        assert_eq!(h.len(), 2);
    }
}
