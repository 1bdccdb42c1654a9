use crate::hand::Hand;

/// Default number of cards dealt to each seat at round start.
pub const STARTING_HAND_SIZE: usize = 12;

/// A seat at the table and the hand it holds.
#[derive(Debug, Clone)]
pub struct Player {
    /// Seat index, 0-based in turn order
    id: usize,
    /// Cards currently held
    hand: Hand,
}

impl Player {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            hand: Hand::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    /// True once the seat has played every card.
    pub fn is_out(&self) -> bool {
        self.hand.is_empty()
    }
}
