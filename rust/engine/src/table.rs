use tracing::{debug, error, info, warn};

use crate::bank::Bank;
use crate::cards::Card;
use crate::config::TableConfig;
use crate::deck::{Deck, DEFAULT_SEED};
use crate::errors::{ErrorKind, GameError};
use crate::game::{RoundType, TurnState};
use crate::hand::{Hand, SortOrder};
use crate::logger::{format_round_id, today, ActionRecord, RoundRecord, TableAction};
use crate::player::Player;
use crate::rules::{self, MeldKind};

/// Turn and round state machine for one Carioca table.
///
/// Owns the deck, the seats' hands, the discard pile and the bank. Every
/// action either applies completely or returns a [`GameError`] and leaves
/// all of them untouched.
///
/// # Examples
///
/// ```
/// use carioca_engine::config::TableConfig;
/// use carioca_engine::game::TurnState;
/// use carioca_engine::table::Table;
///
/// let mut table = Table::new(TableConfig { seed: Some(7), ..TableConfig::default() })?;
/// assert_eq!(table.hand().len(), 12);
/// assert!(!table.discard_top().unwrap().is_joker());
///
/// // Discarding before drawing is out of turn
/// assert!(table.discard(0).is_err());
///
/// table.draw_from_deck()?;
/// assert_eq!(table.turn_state(), TurnState::AwaitingDiscardOrMeld);
/// table.discard(0)?;
/// assert_eq!(table.turn_state(), TurnState::AwaitingDraw);
/// # Ok::<(), carioca_engine::errors::GameError>(())
/// ```
#[derive(Debug)]
pub struct Table {
    /// Setup the table was created with
    config: TableConfig,
    /// Base seed; each round derives its own from it
    seed: u64,
    /// Draw pile
    deck: Deck,
    /// Seats in turn order
    players: Vec<Player>,
    /// Seat whose turn it is
    current: usize,
    /// Discard pile, top card last
    discard: Vec<Card>,
    /// Melded groups
    bank: Bank,
    /// Phase of the current turn
    state: TurnState,
    /// Contract of the current round
    round_type: RoundType,
    /// Rounds started so far
    round_seq: u32,
    /// History of the current round
    record: RoundRecord,
}

impl Table {
    /// Validates `config` and deals the first round.
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        config
            .validate()
            .map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        let round_type = config.round_type;
        let players = (0..config.seats).map(Player::new).collect();
        let mut table = Self {
            config,
            seed,
            deck: Deck::new_with_seed(seed),
            players,
            current: 0,
            discard: Vec::new(),
            bank: Bank::new(),
            state: TurnState::AwaitingDraw,
            round_type,
            round_seq: 0,
            record: RoundRecord::new(String::new(), round_type, seed),
        };
        table.new_round()?;
        Ok(table)
    }

    /// Rebuilds and shuffles the deck, clears hands, discard and bank, deals
    /// every seat and turns a non-joker card onto the discard pile.
    ///
    /// Jokers turned up while looking for the starting discard are set
    /// aside, then returned to the deck, which is reshuffled.
    pub fn new_round(&mut self) -> Result<(), GameError> {
        let round_seq = self.round_seq + 1;
        let seed = self.seed.wrapping_add(u64::from(round_seq - 1));
        let mut deck = Deck::standard(seed, self.config.jokers, self.config.deck_copies);

        let mut hands = vec![Hand::new(); self.players.len()];
        for _ in 0..self.config.hand_size {
            for hand in hands.iter_mut() {
                hand.push(deck.draw()?);
            }
        }

        let mut set_aside = Vec::new();
        let first = loop {
            let c = deck.draw()?;
            if !c.is_joker() {
                break c;
            }
            set_aside.push(c);
        };
        if !set_aside.is_empty() {
            debug!(jokers = set_aside.len(), "jokers returned to the deck");
            deck.add_range(set_aside);
            deck.shuffle();
        }

        for (player, hand) in self.players.iter_mut().zip(hands) {
            *player.hand_mut() = hand;
        }
        self.deck = deck;
        self.discard = vec![first];
        self.bank.clear();
        self.current = 0;
        self.state = TurnState::AwaitingDraw;
        self.round_seq = round_seq;
        self.record = RoundRecord::new(format_round_id(&today(), round_seq), self.round_type, seed);
        self.record.starting_discard = Some(first);

        info!(
            round = %self.round_type,
            round_id = %self.record.round_id,
            seed,
            seats = self.players.len(),
            discard = %first,
            "new round dealt"
        );
        Ok(())
    }

    /// Moves to the next contract and deals it. Returns `None`, changing
    /// nothing, once the last contract has been played.
    pub fn advance_round(&mut self) -> Result<Option<RoundType>, GameError> {
        let Some(next) = self.round_type.next() else {
            info!(round = %self.round_type, "no rounds left");
            return Ok(None);
        };
        let previous = self.round_type;
        self.round_type = next;
        if let Err(e) = self.new_round() {
            self.round_type = previous;
            return Err(self.reject(e));
        }
        Ok(Some(next))
    }

    /// Takes the top card of the deck, first recycling the discard pile
    /// (all but its top) when the deck is empty.
    pub fn draw_from_deck(&mut self) -> Result<Card, GameError> {
        self.expect_state(TurnState::AwaitingDraw, "draw from the deck")?;
        if self.deck.is_empty() {
            let recycled = self.deck.replenish_from(&mut self.discard);
            if recycled > 0 {
                debug!(recycled, "deck replenished from the discard pile");
            }
        }
        let card = match self.deck.draw() {
            Ok(card) => card,
            Err(_) => return Err(self.reject(GameError::DeckExhausted)),
        };
        self.finish_draw(card, TableAction::DrawDeck(card), "drew from the deck");
        Ok(card)
    }

    /// Takes the top card of the discard pile.
    pub fn draw_from_discard(&mut self) -> Result<Card, GameError> {
        self.expect_state(TurnState::AwaitingDraw, "draw from the discard pile")?;
        let Some(card) = self.discard.pop() else {
            return Err(self.reject(GameError::EmptyDiscard));
        };
        self.finish_draw(card, TableAction::DrawDiscard(card), "drew from the discard pile");
        Ok(card)
    }

    fn finish_draw(&mut self, card: Card, action: TableAction, message: &'static str) {
        self.players[self.current].hand_mut().push(card);
        self.state = TurnState::AwaitingDiscardOrMeld;
        debug!(seat = self.current, card = %card, "{}", message);
        self.push_record(action);
    }

    /// What [`Table::meld`] would lay down for `selection`, without laying
    /// it down or logging anything. Lets a host enable its meld control.
    pub fn preview_meld(&self, selection: &[usize]) -> Result<MeldKind, GameError> {
        if self.state != TurnState::AwaitingDiscardOrMeld {
            return Err(GameError::OutOfTurn {
                action: "meld",
                state: self.state,
            });
        }
        let cards = self.hand().selected(selection)?;
        Ok(rules::classify(&cards)?)
    }

    /// Lays the selected hand cards down as a new trio or run.
    pub fn meld(&mut self, selection: &[usize]) -> Result<MeldKind, GameError> {
        let kind = match self.preview_meld(selection) {
            Ok(kind) => kind,
            Err(e) => return Err(self.reject(e)),
        };
        let cards = self.players[self.current].hand_mut().take(selection)?;
        let group = self.bank.add_group(kind, cards.clone());
        info!(seat = self.current, ?kind, group, cards = cards.len(), "melded");
        self.push_record(TableAction::Meld { kind, cards });
        Ok(kind)
    }

    /// Adds the hand card at `index` to the first bank group that accepts
    /// it, in the order groups were laid down. Returns that group's index.
    pub fn add_to_bank(&mut self, index: usize) -> Result<usize, GameError> {
        self.expect_state(TurnState::AwaitingDiscardOrMeld, "add to the bank")?;
        let card = self.card_at(index)?;
        let group = match self.bank.first_fit(card) {
            Ok(group) => group,
            Err(e) => return Err(self.reject(e.into())),
        };
        self.commit_extension(index, group, card)?;
        Ok(group)
    }

    /// Adds the hand card at `index` to bank group `group`.
    pub fn add_to_group(&mut self, index: usize, group: usize) -> Result<(), GameError> {
        self.expect_state(TurnState::AwaitingDiscardOrMeld, "add to the bank")?;
        let card = self.card_at(index)?;
        let checked = match self.bank.get(group) {
            Some(g) => g.accepts(card).map_err(GameError::from),
            None => Err(GameError::GroupOutOfRange {
                index: group,
                len: self.bank.len(),
            }),
        };
        if let Err(e) = checked {
            return Err(self.reject(e));
        }
        self.commit_extension(index, group, card)
    }

    fn commit_extension(&mut self, index: usize, group: usize, card: Card) -> Result<(), GameError> {
        self.bank.extend_group(group, card)?;
        self.players[self.current].hand_mut().take(&[index])?;
        info!(seat = self.current, group, card = %card, "added to the bank");
        self.push_record(TableAction::AddToBank { group, card });
        Ok(())
    }

    /// Puts the hand card at `index` on the discard pile and passes the turn
    /// to the next seat.
    pub fn discard(&mut self, index: usize) -> Result<Card, GameError> {
        self.expect_state(TurnState::AwaitingDiscardOrMeld, "discard")?;
        let card = match self.players[self.current].hand_mut().take(&[index]) {
            Ok(mut taken) => taken.remove(0),
            Err(e) => return Err(self.reject(e)),
        };
        self.discard.push(card);
        self.state = TurnState::AwaitingDraw;
        debug!(seat = self.current, card = %card, "discarded");
        self.push_record(TableAction::Discard(card));
        self.current = (self.current + 1) % self.players.len();
        Ok(card)
    }

    /// Sorts the acting seat's hand for trios: rank, then suit, jokers last.
    pub fn smart_sort(&mut self) {
        self.sort_hand(SortOrder::RankThenSuit);
    }

    pub fn sort_hand(&mut self, order: SortOrder) {
        self.players[self.current].hand_mut().sort(order);
    }

    fn card_at(&self, index: usize) -> Result<Card, GameError> {
        let hand = self.hand();
        hand.get(index).ok_or_else(|| {
            self.reject(GameError::SelectionOutOfRange {
                index,
                len: hand.len(),
            })
        })
    }

    fn expect_state(&self, expected: TurnState, action: &'static str) -> Result<(), GameError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.reject(GameError::OutOfTurn {
                action,
                state: self.state,
            }))
        }
    }

    /// Logs a refused action at a level matching its kind.
    fn reject(&self, err: GameError) -> GameError {
        match err.kind() {
            ErrorKind::Structural => error!(seat = self.current, error = %err, "action refused"),
            ErrorKind::Rule | ErrorKind::Sequencing => {
                warn!(seat = self.current, error = %err, "action refused")
            }
        }
        err
    }

    fn push_record(&mut self, action: TableAction) {
        self.record.actions.push(ActionRecord::now(self.current, action));
    }

    /// Hand of the acting seat.
    pub fn hand(&self) -> &Hand {
        self.players[self.current].hand()
    }

    pub fn seat_hand(&self, seat: usize) -> Result<&Hand, GameError> {
        self.players
            .get(seat)
            .map(Player::hand)
            .ok_or(GameError::SeatOutOfRange {
                seat,
                seats: self.players.len(),
            })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_seat(&self) -> usize {
        self.current
    }

    pub fn discard_top(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Whole discard pile, top card last.
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn turn_state(&self) -> TurnState {
        self.state
    }

    pub fn can_draw(&self) -> bool {
        self.state == TurnState::AwaitingDraw
    }

    pub fn can_discard(&self) -> bool {
        self.state == TurnState::AwaitingDiscardOrMeld && !self.hand().is_empty()
    }

    pub fn can_meld(&self) -> bool {
        self.state == TurnState::AwaitingDiscardOrMeld
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn round_type(&self) -> RoundType {
        self.round_type
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// History of the current round.
    pub fn history(&self) -> &RoundRecord {
        &self.record
    }

    /// Whether the bank holds at least the trios and runs the current
    /// contract asks for. Informational only; nothing is scored.
    pub fn contract_met(&self) -> bool {
        let (trios, runs) = self.bank.counts();
        let (need_trios, need_runs) = self.round_type.requirement();
        trios >= need_trios && runs >= need_runs
    }

    /// True once some seat has no cards left. The host decides when to
    /// start the next round.
    pub fn round_over(&self) -> bool {
        self.players.iter().any(Player::is_out)
    }

    #[cfg(test)]
    pub(crate) fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    #[cfg(test)]
    pub(crate) fn discard_mut(&mut self) -> &mut Vec<Card> {
        &mut self.discard
    }

    #[cfg(test)]
    pub(crate) fn hand_mut(&mut self) -> &mut Hand {
        self.players[self.current].hand_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RuleViolation;

    fn table() -> Table {
        Table::new(TableConfig {
            seed: Some(11),
            ..TableConfig::default()
        })
        .unwrap()
    }

    fn set_hand(t: &mut Table, cards: &[&str]) {
        let hand = t.hand_mut();
        hand.clear();
        for c in cards {
            hand.push(c.parse().unwrap());
        }
    }

    #[test]
    fn empty_deck_and_single_discard_is_exhausted() {
        let mut t = table();
        while t.deck_mut().draw().is_ok() {}
        t.discard_mut().truncate(1);
        let hand_before = t.hand().clone();
        assert_eq!(t.draw_from_deck(), Err(GameError::DeckExhausted));
        assert_eq!(t.hand(), &hand_before);
        assert_eq!(t.turn_state(), TurnState::AwaitingDraw);
        assert_eq!(t.discard_len(), 1);
    }

    #[test]
    fn joker_streaks_at_setup_go_back_into_the_deck() {
        let cfg = TableConfig {
            jokers: 60,
            ..TableConfig::default()
        };
        let mut longest_streak = 0;
        for seed in 0..50 {
            // replay the setup draws to see how many jokers were set aside
            let mut replay = Deck::standard(seed, cfg.jokers, cfg.deck_copies);
            for _ in 0..cfg.hand_size {
                replay.draw().unwrap();
            }
            let mut streak = 0;
            while replay.draw().unwrap().is_joker() {
                streak += 1;
            }
            longest_streak = longest_streak.max(streak);

            let t = Table::new(TableConfig {
                seed: Some(seed),
                ..cfg.clone()
            })
            .unwrap();
            assert!(!t.discard_top().unwrap().is_joker(), "seed {}", seed);
            assert_eq!(t.discard_len(), 1);

            let jokers_in_hand = t.hand().cards().iter().filter(|c| c.is_joker()).count();
            let jokers_in_deck = t.deck.cards().iter().filter(|c| c.is_joker()).count();
            assert_eq!(jokers_in_hand + jokers_in_deck, cfg.jokers, "seed {}", seed);
            assert_eq!(
                t.deck_remaining() + t.hand().len() + t.discard_len(),
                cfg.deck_size()
            );
        }
        assert!(longest_streak >= 3, "no seed exercised a joker streak");
    }

    #[test]
    fn failed_meld_changes_nothing() {
        let mut t = table();
        t.draw_from_deck().unwrap();
        set_hand(&mut t, &["2S", "3S", "5S", "6S", "9D"]);
        let before = t.hand().clone();
        assert_eq!(
            t.meld(&[0, 1, 2, 3]),
            Err(GameError::Rule(RuleViolation::NotConsecutive))
        );
        assert_eq!(t.hand(), &before);
        assert!(t.bank().is_empty());
        assert_eq!(t.history().actions.len(), 1);
    }

    #[test]
    fn add_to_group_targets_the_named_group() {
        let mut t = table();
        t.draw_from_deck().unwrap();
        set_hand(&mut t, &["7S", "7H", "7D", "7C", "3C", "4C", "5C", "6C", "KD"]);
        t.meld(&[0, 1, 2]).unwrap();
        t.meld(&[1, 2, 3, 4]).unwrap();
        // hand is now 7C, KD
        assert_eq!(
            t.add_to_group(1, 1),
            Err(GameError::Rule(RuleViolation::WrongSuit))
        );
        t.add_to_group(0, 0).unwrap();
        assert_eq!(t.bank().groups()[0].cards().len(), 4);
        assert_eq!(t.hand().len(), 1);
        assert_eq!(
            t.add_to_group(0, 5),
            Err(GameError::GroupOutOfRange { index: 5, len: 2 })
        );
    }
}
