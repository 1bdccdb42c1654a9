use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::RoundType;
use crate::rules::MeldKind;

/// A successful table action, as recorded in the round history.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum TableAction {
    /// Took the top card of the deck
    DrawDeck(Card),
    /// Took the top card of the discard pile
    DrawDiscard(Card),
    /// Laid a new group down
    Meld { kind: MeldKind, cards: Vec<Card> },
    /// Added one card to an existing group
    AddToBank { group: usize, card: Card },
    /// Ended the turn
    Discard(Card),
}

/// Records a single action with the seat that made it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Seat index
    pub seat: usize,
    /// What happened
    pub action: TableAction,
    /// RFC3339 timestamp, injected when the record is made
    #[serde(default)]
    pub ts: Option<String>,
}

impl ActionRecord {
    pub fn now(seat: usize, action: TableAction) -> Self {
        Self {
            seat,
            action,
            ts: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// History of one round: its setup and every action taken, in order.
/// The engine keeps it in memory; the host decides whether to store it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Identifier (format: YYYYMMDD-NNNNNN)
    pub round_id: String,
    /// Contract played
    pub round_type: RoundType,
    /// Deck seed (enables deterministic replay)
    pub seed: u64,
    /// First card turned onto the discard pile
    pub starting_discard: Option<Card>,
    /// Chronological list of actions
    pub actions: Vec<ActionRecord>,
}

impl RoundRecord {
    pub fn new(round_id: String, round_type: RoundType, seed: u64) -> Self {
        Self {
            round_id,
            round_type,
            seed,
            starting_discard: None,
            actions: Vec::new(),
        }
    }

    /// One JSON object on a single LF-terminated line.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

pub fn format_round_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Today's date as used in round ids.
pub fn today() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_zero_padded() {
        assert_eq!(format_round_id("20251231", 42), "20251231-000042");
    }

    #[test]
    fn record_line_is_lf_terminated_and_parses_back() {
        let mut rec = RoundRecord::new("20260101-000001".into(), RoundType::TwoTrios, 9);
        rec.actions.push(ActionRecord::now(0, TableAction::DrawDeck(Card::joker())));
        let line = rec.to_json_line().unwrap();
        assert!(line.ends_with('\n'));
        assert!(!line.contains('\r'));
        let back: RoundRecord = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(back, rec);
        assert!(back.actions[0].ts.is_some());
    }
}
