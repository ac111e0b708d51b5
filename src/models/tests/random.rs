use crate::models::{RandomSource, SeededSource, SequenceSource};

#[test]
fn test_sequence_source_cycles_through_values() {
    let mut source = SequenceSource::new(vec![0.1, 0.6]);
    let drawn = (0..5).map(|_| source.uniform()).collect::<Vec<_>>();
    assert_eq!(drawn, vec![0.1, 0.6, 0.1, 0.6, 0.1]);
    assert_eq!(source.consumed(), 5);
}

#[test]
fn test_sequence_source_index_uses_floor() {
    let mut source = SequenceSource::new(vec![0.0, 0.5, 0.9, 0.9999]);
    assert_eq!(source.index(3), 0);
    assert_eq!(source.index(3), 1);
    assert_eq!(source.index(3), 2);
    assert_eq!(source.index(3), 2);
}

#[test]
#[should_panic]
fn test_sequence_source_rejects_empty_list() {
    SequenceSource::new(vec![]);
}

#[test]
fn test_seeded_source_is_reproducible_and_in_range() {
    let mut a = SeededSource::new(3);
    let mut b = SeededSource::new(3);
    for _ in 0..100 {
        let u = a.uniform();
        assert_eq!(u, b.uniform());
        assert!((0.0..1.0).contains(&u));
        let i = a.index(4);
        assert_eq!(i, b.index(4));
        assert!(i < 4);
    }
}
