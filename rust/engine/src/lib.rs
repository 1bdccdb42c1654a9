//! # carioca-engine: Carioca Rules Engine Core
//!
//! A headless, deterministic engine for Carioca, a rummy variant played with
//! one or two French decks plus jokers. Provides the card model, a seeded
//! deck, the meld validator (trios and runs) and the turn/round state
//! machine that a presentation layer drives.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck contents
//! - [`deck`] - Seeded draw pile with Fisher-Yates shuffling and recycling
//! - [`rules`] - Meld validation: trios, runs, extensions
//! - [`bank`] - Groups melded on the table
//! - [`hand`] - A seat's cards, selections and sorting
//! - [`player`] - Seats
//! - [`game`] - Turn phases and round contracts
//! - [`table`] - Turn/round state machine
//! - [`logger`] - Round history records
//! - [`config`] - Table configuration (defaults, TOML, environment)
//! - [`logging`] - Tracing setup and log capture
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use carioca_engine::cards::Card;
//! use carioca_engine::rules::{classify, MeldKind};
//!
//! let cards: Vec<Card> = ["QS", "QH", "JOKER"].iter().map(|c| c.parse().unwrap()).collect();
//! assert_eq!(classify(&cards), Ok(MeldKind::Trio));
//! ```
//!
//! ## Playing a Turn
//!
//! ```rust
//! use carioca_engine::config::TableConfig;
//! use carioca_engine::table::Table;
//!
//! let mut table = Table::new(TableConfig::default()).unwrap();
//! table.draw_from_deck().unwrap();
//! table.smart_sort();
//!
//! // Rule failures carry the reason to show the player
//! if let Err(e) = table.meld(&[0, 1, 2]) {
//!     println!("Cannot meld: {}", e);
//! }
//! table.discard(0).unwrap();
//! ```

pub mod bank;
pub mod cards;
pub mod config;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod logging;
pub mod player;
pub mod rules;
pub mod table;
