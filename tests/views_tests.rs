// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use carteira::views::{LoadSequence, Slot};

#[test]
fn only_newest_ticket_is_current() {
    let seq = LoadSequence::new();
    let a = seq.begin();
    let b = seq.begin();
    assert!(a < b);
    assert!(!seq.is_current(a));
    assert!(seq.is_current(b));
}

#[test]
fn stale_response_is_discarded() {
    let mut slot: Slot<Vec<&str>> = Slot::new("transactions");
    let march = slot.begin();
    let april = slot.begin();
    assert!(slot.apply(april, Ok::<_, String>(vec!["abril"])));
    // the slower March response arrives last and must not win
    assert!(!slot.apply(march, Ok::<_, String>(vec!["março"])));
    assert_eq!(slot.items(), ["abril"]);
}

#[test]
fn failure_keeps_previous_value() {
    let mut slot: Slot<Vec<i32>> = Slot::new("accounts");
    assert!(slot.items().is_empty());
    assert!(slot.load(|| Ok::<_, String>(vec![1, 2])));
    assert!(!slot.load(|| Err::<Vec<i32>, _>("boom".to_string())));
    assert_eq!(slot.items(), [1, 2]);
    slot.push(3);
    assert_eq!(slot.get().map(Vec::len), Some(3));
}
