//! End-to-end scenarios over the public API.

use test_log::test;

use dawg_rs::dawg::{Dawg, DawgConfig};
use dawg_rs::error::{DawgError, Result};

fn collect(strings: impl Iterator<Item = Result<String>>) -> Vec<String> {
    strings.collect::<Result<Vec<_>>>().unwrap()
}

/// The minimal automaton of a set is unique, so any two must have the same shape.
fn assert_same_structure(dawg: &Dawg, fresh: &Dawg) {
    assert_eq!(dawg.len(), fresh.len());
    assert_eq!(dawg.node_count(), fresh.node_count());
    assert_eq!(dawg.transition_count(), fresh.transition_count());
}

#[test]
fn test_ordered_set_basics() {
    let dawg = Dawg::from_strings(["cat", "car", "cart", "dog"]).unwrap();

    assert_eq!(dawg.first().as_deref(), Some("car"));
    assert_eq!(dawg.last().as_deref(), Some("dog"));
    assert_eq!(dawg.floor("care").as_deref(), Some("car"));
    assert_eq!(dawg.ceiling("care").as_deref(), Some("cart"));
    assert_eq!(collect(dawg.prefix_set("ca").iter()), vec!["car", "cart", "cat"]);
    assert_eq!(collect(dawg.iter()), vec!["car", "cart", "cat", "dog"]);
}

#[test]
fn test_suffix_sharing() {
    let dawg = Dawg::default();
    dawg.insert("testing").unwrap();
    dawg.insert("resting").unwrap();
    assert_eq!(dawg.node_at("te"), dawg.node_at("re"));
    assert_eq!(dawg.node_at("test"), dawg.node_at("rest"));
    assert!(dawg.is_minimal());
    assert_same_structure(&dawg, &Dawg::from_strings(["resting", "testing"]).unwrap());
}

#[test]
fn test_drain_with_poll() {
    let words = ["delta", "alpha", "charlie", "bravo", "echo"];
    let dawg = Dawg::from_strings(words).unwrap();

    let mut drained = Vec::new();
    while let Some(s) = dawg.poll_first() {
        drained.push(s);
        assert!(dawg.is_minimal());
        assert!(dawg.verify_refcounts().is_empty());
        assert_same_structure(&dawg, &Dawg::from_strings(collect(dawg.iter())).unwrap());
    }
    assert_eq!(drained, vec!["alpha", "bravo", "charlie", "delta", "echo"]);
    assert!(dawg.is_empty());
    assert_eq!(dawg.node_count(), 1);
}

#[test]
fn test_reclamation() {
    let words: Vec<String> = (0..200).map(|i| format!("w{}x{}", i % 17, i)).collect();
    let dawg = Dawg::with_strings(DawgConfig::default().with_bucket_bits(4), &words).unwrap();
    assert_eq!(dawg.len(), words.len());

    for word in words.iter().rev() {
        assert!(dawg.remove(word));
    }
    assert_eq!(dawg.node_count(), 1);
    assert_eq!(dawg.transition_count(), 0);
}

#[test]
fn test_structure_independent_of_history() {
    let final_set = ["ant", "ants", "bee", "bees", "cat"];
    let direct = Dawg::from_strings(final_set).unwrap();

    let detour = Dawg::from_strings(["cat", "cats", "bee", "bet", "antelope"]).unwrap();
    detour.remove("cats");
    detour.remove("bet");
    detour.remove("antelope");
    for word in ["bees", "ants", "ant"] {
        detour.insert(word).unwrap();
    }

    assert_eq!(collect(detour.iter()), collect(direct.iter()));
    assert_same_structure(&detour, &direct);
}

#[test]
fn test_alphabet_optimization_keeps_order() {
    let dawg = Dawg::from_strings(["über", "apfel", "zug", "äpfel", "haus"]).unwrap();
    let before = collect(dawg.iter());
    let floor = dawg.floor("b");

    assert!(dawg.optimize_alphabet());
    assert_eq!(collect(dawg.iter()), before);
    assert_eq!(dawg.floor("b"), floor);
    assert_eq!(dawg.ceiling("y").as_deref(), Some("zug"));
    assert_eq!(dawg.higher("zug").as_deref(), Some("äpfel"));
    assert_eq!(dawg.insert("xylophone"), Err(DawgError::SymbolOutsideAlphabet('x')));

    dawg.clear();
    assert!(!dawg.is_alphabet_optimized());
    assert_eq!(dawg.insert("xylophone"), Ok(true));
}

#[test]
fn test_iterator_fails_fast_through_views() {
    let dawg = Dawg::from_strings(["a", "b", "c"]).unwrap();
    let view = dawg.tail_set("b", true).unwrap();
    let mut iter = view.iter();
    assert_eq!(iter.next(), Some(Ok("b".to_string())));
    view.insert("bb").unwrap();
    assert_eq!(iter.next(), Some(Err(DawgError::ConcurrentModification)));
    assert_eq!(iter.next(), None);
    assert_eq!(collect(view.iter()), vec!["b", "bb", "c"]);
}

#[test]
fn test_views_compose() {
    let words = ["apple", "apply", "apt", "bat", "bath", "batman", "cab"];
    let dawg = Dawg::from_strings(words).unwrap();

    let view = dawg.tail_set("apt", false).unwrap().prefix_set("bat").descending_set();
    assert_eq!(collect(view.iter()), vec!["batman", "bath", "bat"]);
    assert_eq!(view.first().as_deref(), Some("batman"));
    assert_eq!(view.higher("bath").as_deref(), Some("bat"));

    let narrowed = view.head_set("bath", true).unwrap();
    assert_eq!(collect(narrowed.iter()), vec!["batman", "bath"]);
    let inner = narrowed.tail_set("batman", false).unwrap();
    assert_eq!(collect(inner.iter()), vec!["bath"]);
    assert!(matches!(narrowed.tail_set("a", true), Err(DawgError::InvalidArgument(_))));

    assert_eq!(collect(dawg.strings_ending_with("h")), vec!["bath"]);
    assert_eq!(collect(dawg.strings_containing("pl")), vec!["apple", "apply"]);
}

#[test]
fn test_reserved_symbol() {
    let dawg = Dawg::default();
    assert!(matches!(dawg.insert("key\0value"), Err(DawgError::InvalidArgument(_))));
    assert!(!dawg.contains("key\0value"));

    let relaxed = Dawg::new(DawgConfig::default().with_reserved(None));
    assert_eq!(relaxed.insert("key\0value"), Ok(true));
    assert!(relaxed.contains("key\0value"));
    assert_eq!(relaxed.floor("key\u{1}").as_deref(), Some("key\0value"));
}
