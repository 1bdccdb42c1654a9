use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{standard_cards, Card};
use crate::errors::GameError;

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 0xCA10_CA00;

/// Draw pile used as a stack: the top card is the last element.
/// Owns its own seeded RNG so that a given seed always yields the same order.
///
/// # Examples
///
/// ```
/// use carioca_engine::deck::Deck;
///
/// // One French deck plus two jokers
/// let mut deck = Deck::standard(42, 2, 1);
/// assert_eq!(deck.len(), 54);
///
/// let top = deck.draw().expect("fresh deck has cards");
/// assert_eq!(deck.len(), 53);
///
/// // Same seed, same order
/// let mut again = Deck::standard(42, 2, 1);
/// assert_eq!(again.draw().unwrap(), top);
/// ```
#[derive(Debug)]
pub struct Deck {
    /// Cards in the pile, top at the end
    cards: Vec<Card>,
    /// Shuffle source
    rng: ChaCha20Rng,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Empty deck seeded with [`DEFAULT_SEED`].
    pub fn new() -> Self {
        Self::new_with_seed(DEFAULT_SEED)
    }

    /// Empty deck with a caller-supplied seed. Call [`Deck::build_standard`]
    /// to fill it.
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            cards: Vec::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Built and shuffled deck in one step.
    pub fn standard(seed: u64, jokers: usize, copies: usize) -> Self {
        let mut deck = Self::new_with_seed(seed);
        deck.build_standard(jokers, copies);
        deck.shuffle();
        deck
    }

    /// Replaces the contents with `copies` full French decks plus `jokers`
    /// jokers, in suit/rank order.
    pub fn build_standard(&mut self, jokers: usize, copies: usize) {
        self.cards = standard_cards(jokers, copies);
    }

    /// Fisher-Yates over the whole pile.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    pub fn add_range<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    /// Moves every discard except its top card back into the deck and
    /// reshuffles. Returns how many cards were recycled; a discard pile of
    /// zero or one card is left alone.
    pub fn replenish_from(&mut self, discard: &mut Vec<Card>) -> usize {
        if discard.len() <= 1 {
            return 0;
        }
        let keep_from = discard.len() - 1;
        let recycled: Vec<Card> = discard.drain(..keep_from).collect();
        let n = recycled.len();
        self.add_range(recycled);
        self.shuffle();
        n
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Read-only view, top card last.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn replenish_keeps_discard_top() {
        let mut deck = Deck::new_with_seed(3);
        let top = Card::new(Suit::Hearts, Rank::Nine);
        let mut discard = vec![
            Card::new(Suit::Clubs, Rank::Two),
            Card::new(Suit::Clubs, Rank::Three),
            top,
        ];
        assert_eq!(deck.replenish_from(&mut discard), 2);
        assert_eq!(discard, vec![top]);
        assert_eq!(deck.len(), 2);
        assert!(!deck.cards().contains(&top));
    }

    #[test]
    fn replenish_ignores_single_card_discard() {
        let mut deck = Deck::new_with_seed(3);
        let mut discard = vec![Card::joker()];
        assert_eq!(deck.replenish_from(&mut discard), 0);
        assert!(deck.is_empty());
        assert_eq!(discard.len(), 1);
    }

    #[test]
    fn draw_from_empty_is_an_error() {
        let mut deck = Deck::new();
        assert_eq!(deck.draw(), Err(GameError::EmptyDeck));
    }

    #[test]
    fn build_clears_previous_contents() {
        let mut deck = Deck::new();
        deck.add_range([Card::joker(); 5]);
        deck.build_standard(2, 1);
        assert_eq!(deck.len(), 54);
    }
}
