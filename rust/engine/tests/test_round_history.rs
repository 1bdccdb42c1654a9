mod helpers;

use carioca_engine::logger::{RoundRecord, TableAction};
use carioca_engine::logging::LogCapture;
use helpers::{seeded, table_with_meld};
use tracing::Level;

#[test]
fn successful_actions_are_recorded_in_order() {
    let (mut t, sel) = table_with_meld(40);
    let kind = t.meld(&sel).unwrap();
    let discarded = t.discard(0).unwrap();

    let actions = &t.history().actions;
    assert_eq!(actions.len(), 3);
    assert!(matches!(actions[0].action, TableAction::DrawDeck(_)));
    match &actions[1].action {
        TableAction::Meld { kind: k, cards } => {
            assert_eq!(*k, kind);
            assert_eq!(cards.len(), sel.len());
        }
        other => panic!("expected a meld, got {:?}", other),
    }
    assert_eq!(actions[2].action, TableAction::Discard(discarded));
    assert!(actions.iter().all(|a| a.seat == 0 && a.ts.is_some()));
}

#[test]
fn refused_actions_leave_no_record() {
    let mut t = seeded(3);
    assert!(t.discard(0).is_err());
    t.draw_from_deck().unwrap();
    assert!(t.draw_from_deck().is_err());
    assert!(t.add_to_bank(0).is_err());
    assert!(t.meld(&[0, 0, 0]).is_err());
    assert_eq!(t.history().actions.len(), 1);
}

#[test]
fn history_serializes_to_one_json_line() {
    let mut t = seeded(5);
    t.draw_from_discard().unwrap();
    t.discard(3).unwrap();

    let line = t.history().to_json_line().unwrap();
    assert!(line.ends_with('\n'));
    assert_eq!(line.matches('\n').count(), 1);
    let back: RoundRecord = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(&back, t.history());
    assert_eq!(back.seed, t.history().seed);
}

#[test]
fn refusals_are_logged_with_their_reason() {
    let capture = LogCapture::new();
    capture.scope(|| {
        let mut t = seeded(6);
        let _ = t.discard(0);
        t.draw_from_deck().unwrap();
        let _ = t.discard(40);
    });

    assert!(capture
        .events()
        .iter()
        .any(|e| e.level == Level::INFO && e.message == "new round dealt"));

    let refused = capture.refusals();
    assert_eq!(refused.len(), 2);
    assert_eq!(refused[0].level, Level::WARN);
    assert!(refused[0].field("error").unwrap().contains("Cannot discard"));
    assert_eq!(refused[1].level, Level::ERROR);
    assert_eq!(refused[1].field("seat"), Some("0"));
    assert!(refused[1].field("error").is_some());
}
