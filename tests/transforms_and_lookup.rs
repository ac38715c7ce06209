//! Transform and knowledge-base behaviour through the public API.

use hexagram_diagnostics::knowledge::{DEFAULT_HEXAGRAM, HEXAGRAM_COUNT};
use hexagram_diagnostics::transform::{changing, flipped, inverted, line_diff, nuclear};
use hexagram_diagnostics::{HexagramLines, KnowledgeBase};

#[test]
fn test_every_derivation_resolves_to_a_known_hexagram() {
    let kb = KnowledgeBase::shared();
    for h in kb.hexagrams() {
        for derived in [nuclear(&h.lines), inverted(&h.lines), flipped(&h.lines)] {
            let id = kb.resolve(&derived);
            assert!((1..=HEXAGRAM_COUNT as u32).contains(&id));
            assert_eq!(kb.hexagram_lines(id).unwrap(), derived);
        }
    }
}

#[test]
fn test_inverted_and_flipped_are_involutions_for_all_ids() {
    let kb = KnowledgeBase::shared();
    for id in 1..=HEXAGRAM_COUNT as u32 {
        let lines = kb.hexagram_lines(id).unwrap();
        assert_eq!(inverted(&inverted(&lines)), lines);
        assert_eq!(flipped(&flipped(&lines)), lines);
        assert_eq!(kb.resolve(&lines), id);
    }
}

#[test]
fn test_nuclear_is_not_a_fixed_point() {
    let kb = KnowledgeBase::shared();
    let after_next = kb.resolve(&nuclear(&kb.hexagram_lines(63).unwrap()));
    let back = kb.resolve(&nuclear(&kb.hexagram_lines(after_next).unwrap()));
    assert_eq!((after_next, back), (64, 63));
    // heaven and earth are their own cores
    assert_eq!(kb.resolve(&nuclear(&kb.hexagram_lines(1).unwrap())), 1);
    assert_eq!(kb.resolve(&nuclear(&kb.hexagram_lines(2).unwrap())), 2);
}

#[test]
fn test_changing_lines_walk_between_hexagrams() {
    let kb = KnowledgeBase::shared();
    let from = kb.hexagram_lines(1).unwrap();
    let to = kb.hexagram_lines(44).unwrap();
    let diff = line_diff(&from, &to);
    assert_eq!(diff, vec![1]);
    assert_eq!(kb.resolve(&changing(&from, &diff)), 44);
}

#[test]
fn test_out_of_range_ids_miss_then_default() {
    let kb = KnowledgeBase::shared();
    for bad in [0, 65, u32::MAX] {
        let err = kb.hexagram(bad).unwrap_err();
        assert_eq!(err.kind(), "lookup_miss");
        assert_eq!(kb.hexagram_or_default(bad).id, DEFAULT_HEXAGRAM);
    }
    assert!(kb.trigram(9).is_err());
    assert_eq!(kb.trigram_or_default(0).id, 1);
}

#[test]
fn test_line_sets_deserialize_strictly() {
    let ok: HexagramLines = serde_json::from_str("[1,0,1,0,1,0]").unwrap();
    assert_eq!(ok.to_string(), "101010");
    assert!(serde_json::from_str::<HexagramLines>("[1,0,1,0,1]").is_err());
    assert!(serde_json::from_str::<HexagramLines>("[1,0,1,0,1,2]").is_err());
}
