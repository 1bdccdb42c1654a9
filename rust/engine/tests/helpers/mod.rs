//! Shared helpers for table integration tests.
//!
//! Hands come from a seeded deck, so tests look for melds instead of
//! assuming particular cards.
#![allow(dead_code)]

use carioca_engine::config::TableConfig;
use carioca_engine::rules::validate_group;
use carioca_engine::table::Table;

pub fn seeded(seed: u64) -> Table {
    Table::new(TableConfig {
        seed: Some(seed),
        ..TableConfig::default()
    })
    .expect("default config is valid")
}

/// First selection of 3 or 4 hand indices the table would accept as a meld.
pub fn find_meld(table: &Table) -> Option<Vec<usize>> {
    let n = table.hand().len();
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                if table.preview_meld(&[a, b, c]).is_ok() {
                    return Some(vec![a, b, c]);
                }
                for d in c + 1..n {
                    if table.preview_meld(&[a, b, c, d]).is_ok() {
                        return Some(vec![a, b, c, d]);
                    }
                }
            }
        }
    }
    None
}

/// Draws from the deck and returns a table whose acting hand holds a meld,
/// trying seeds from `start` on.
pub fn table_with_meld(start: u64) -> (Table, Vec<usize>) {
    for seed in start..start + 500 {
        let mut t = seeded(seed);
        t.draw_from_deck().expect("fresh table can draw");
        if let Some(sel) = find_meld(&t) {
            return (t, sel);
        }
    }
    panic!("no seed produced a meldable hand");
}

/// Every card the table can see: deck, hands, discard pile and bank.
pub fn card_total(table: &Table) -> usize {
    table.deck_remaining()
        + table.players().iter().map(|p| p.hand().len()).sum::<usize>()
        + table.discard_len()
        + table.bank().card_count()
}

pub fn assert_bank_valid(table: &Table) {
    for g in table.bank().groups() {
        assert!(
            validate_group(g.kind(), g.cards()).is_ok(),
            "invalid group on the table: {:?}",
            g
        );
    }
}
