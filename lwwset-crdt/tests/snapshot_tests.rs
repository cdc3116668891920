use lwwset_crdt::{HybridTimestamp, LwwElementSet, LwwSetConfig, LwwSetError, LwwSetSnapshot, SetOp};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::mem::size_of;

fn ts(n: u64) -> HybridTimestamp {
    HybridTimestamp::new(n, 0)
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

// ── Snapshot / restore ───────────────────────────────────────────

#[test]
fn snapshot_exposes_both_registries() {
    let s: LwwElementSet<String> = LwwElementSet::new();
    s.add("a".into(), ts(1)).unwrap();
    s.add("b".into(), ts(1)).unwrap();
    s.remove("b".into(), ts(2)).unwrap();

    let snap = s.snapshot();
    assert_eq!(
        snap.adds,
        HashMap::from([("a".to_string(), ts(1)), ("b".to_string(), ts(1))])
    );
    assert_eq!(snap.removes, HashMap::from([("b".to_string(), ts(2))]));
    assert_eq!(snap.elements(), vec!["a".to_string()]);
    assert!(snap.exists("a"));
    assert!(!snap.exists("b"));
}

#[test]
fn persisted_snapshot_restores_same_state() {
    let s: LwwElementSet<String> = LwwElementSet::new();
    s.add("kept".into(), ts(5)).unwrap();
    s.add("dropped".into(), ts(5)).unwrap();
    s.remove("dropped".into(), ts(6)).unwrap();
    s.remove("never-added".into(), ts(1)).unwrap();

    let json = serde_json::to_string(&s.snapshot()).unwrap();
    let loaded: LwwSetSnapshot<String, HybridTimestamp> = serde_json::from_str(&json).unwrap();
    let restored = LwwElementSet::from_snapshot(loaded, LwwSetConfig::default()).unwrap();

    assert_eq!(restored.snapshot(), s.snapshot());
    assert_eq!(restored.elements(), vec!["kept".to_string()]);
    assert_eq!(restored.registry_sizes(), (2, 2));
}

#[test]
fn restore_rejects_oversized_element() {
    let mut snap: LwwSetSnapshot<String, u64> = LwwSetSnapshot::new();
    snap.removes.insert("x".repeat(32), 1);

    let config = LwwSetConfig::default().with_max_element_bytes(size_of::<String>() + 8);
    let err = LwwElementSet::from_snapshot(snap, config).unwrap_err();
    assert!(matches!(
        err,
        LwwSetError::ElementSizeExceeded {
            op: SetOp::Restore,
            ..
        }
    ));
}

// ── Replica merge ────────────────────────────────────────────────

#[test]
fn merge_combines_replicas() {
    let a: LwwElementSet<String, u64> = LwwElementSet::new();
    let b: LwwElementSet<String, u64> = LwwElementSet::new();

    a.add("x".into(), 1).unwrap();
    a.add("y".into(), 1).unwrap();
    b.remove("x".into(), 2).unwrap();
    b.add("z".into(), 3).unwrap();

    a.merge(&b).unwrap();
    b.merge(&a).unwrap();

    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(sorted(a.elements()), vec!["y".to_string(), "z".to_string()]);
}

#[test]
fn merge_replay_is_noop() {
    let a: LwwElementSet<String, u64> = LwwElementSet::new();
    let b: LwwElementSet<String, u64> = LwwElementSet::new();
    b.add("x".into(), 4).unwrap();
    b.remove("y".into(), 2).unwrap();

    a.merge(&b).unwrap();
    let once = a.snapshot();
    a.merge(&b).unwrap();
    a.merge_snapshot(b.snapshot()).unwrap();
    assert_eq!(a.snapshot(), once);
}

#[test]
fn merge_does_not_lower_timestamps() {
    let a: LwwElementSet<String, u64> = LwwElementSet::new();
    let b: LwwElementSet<String, u64> = LwwElementSet::new();
    a.add("x".into(), 10).unwrap();
    b.add("x".into(), 3).unwrap();
    b.remove("x".into(), 5).unwrap();

    a.merge(&b).unwrap();
    assert_eq!(a.add_timestamp("x"), Some(10));
    assert_eq!(a.remove_timestamp("x"), Some(5));
    assert!(a.exists("x"));
}

#[test]
fn rejected_merge_leaves_state_unchanged() {
    let limit = size_of::<String>() + 4;
    let a: LwwElementSet<String, u64> =
        LwwElementSet::with_config(LwwSetConfig::default().with_max_element_bytes(limit));
    a.add("ok".into(), 1).unwrap();
    let before = a.snapshot();

    let mut incoming = LwwSetSnapshot::new();
    incoming.adds.insert("fine".to_string(), 9);
    incoming.removes.insert("ok".to_string(), 9);
    incoming.adds.insert("much too long".to_string(), 9);

    let err = a.merge_snapshot(incoming).unwrap_err();
    assert!(matches!(
        err,
        LwwSetError::ElementSizeExceeded {
            op: SetOp::Merge,
            ..
        }
    ));
    assert_eq!(a.snapshot(), before);
}

#[test]
fn snapshot_merge_matches_set_merge() {
    let mut left: LwwSetSnapshot<String, u64> = LwwSetSnapshot::new();
    left.adds.insert("a".into(), 1);
    left.removes.insert("b".into(), 4);
    let mut right: LwwSetSnapshot<String, u64> = LwwSetSnapshot::new();
    right.adds.insert("a".into(), 3);
    right.adds.insert("b".into(), 4);

    let set = LwwElementSet::from_snapshot(left.clone(), LwwSetConfig::default()).unwrap();
    set.merge_snapshot(right.clone()).unwrap();

    assert_eq!(left.merged(&right), set.snapshot());
    assert_eq!(left.merged(&right), right.merged(&left));
    assert_eq!(sorted(set.elements()), vec!["a".to_string(), "b".to_string()]);
}
