use super::*;

const INTERVALS: &[(u32, i64, i64)] = &[
    (0, 0, 10),
    (1, 5, 6),
    (2, 5, 5),
    (3, -20, -3),
    (4, 8, 40),
    (5, 9, 12),
    (6, 30, 31),
    (7, -3, 9),
];

fn brute_force(pos: i64) -> BTreeSet<u32> {
    INTERVALS
        .iter()
        .filter(|(_, s, e)| *s <= pos && pos < *e)
        .map(|(k, _, _)| *k)
        .collect()
}

fn sweep() -> IntervalSweep<u32> {
    let mut s = IntervalSweep::default();
    s.rebuild(INTERVALS.iter().copied());
    s
}

#[test]
fn single_steps_match_brute_force_both_ways() {
    let mut s = sweep();
    for pos in -25..45 {
        assert_eq!(s.seek(pos), &brute_force(pos), "forward at {pos}");
    }
    for pos in (-25..45).rev() {
        assert_eq!(s.seek(pos), &brute_force(pos), "backward at {pos}");
    }
}

#[test]
fn jumps_match_brute_force() {
    let mut s = sweep();
    let mut pos = 0i64;
    // Deterministic walk with mixed stride lengths and directions.
    for step in [7i64, -13, 29, 1, -40, 50, -3, -3, 0, 11, -60, 33, 5, -9] {
        pos += step;
        assert_eq!(s.seek(pos), &brute_force(pos), "at {pos}");
    }
}

#[test]
fn empty_interval_is_never_active() {
    let mut s = sweep();
    assert!(!s.seek(5).contains(&2));
    assert!(!s.seek(4).contains(&2));
    assert!(!s.seek(6).contains(&2));
}

#[test]
fn rebuild_resets_position() {
    let mut s = sweep();
    s.seek(9);
    assert_eq!(s.position(), Some(9));
    s.rebuild([(1u32, 100, 200)]);
    assert_eq!(s.position(), None);
    assert!(s.seek(9).is_empty());
    assert_eq!(s.seek(150).iter().copied().collect::<Vec<_>>(), vec![1]);
}
