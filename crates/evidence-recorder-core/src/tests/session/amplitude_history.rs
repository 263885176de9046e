use crate::AmplitudeHistory;

/// WHAT: History evicts oldest samples first once full
/// WHY: Visualization must show the most recent window, never grow unbounded
#[test]
fn given_capacity_three_when_pushing_four_samples_then_oldest_evicted() {
    // Given: An empty history holding three samples
    let mut history = AmplitudeHistory::new(3);

    // When: Pushing four samples
    for sample in [1, 2, 3, 4] {
        history.push(sample);
    }

    // Then: Only the three most recent remain, oldest first
    assert_eq!(history.to_vec(), vec![2, 3, 4]);
    assert_eq!(history.latest(), Some(4));
}

/// WHAT: Length stays bounded after many pushes
/// WHY: Backends can push thousands of samples during a long session
#[test]
fn given_small_capacity_when_pushing_many_samples_then_length_never_exceeds_capacity() {
    // Given: A history holding five samples
    let mut history = AmplitudeHistory::new(5);

    // When/Then: Every push keeps the length within capacity
    for sample in 0..1_000 {
        history.push(sample);
        assert!(history.len() <= history.capacity());
    }
    assert_eq!(history.to_vec(), vec![995, 996, 997, 998, 999]);
}

/// WHAT: Replacing with a long backend sequence keeps its tail
/// WHY: Backends push their whole buffer, which may exceed local capacity
#[test]
fn given_sequence_longer_than_capacity_when_replacing_then_tail_kept() {
    // Given: A history with stale content
    let mut history = AmplitudeHistory::new(3);
    history.push(42);

    // When: Replacing with a longer sequence
    history.replace_with(&[10, 20, 30, 40, 50]);

    // Then: Stale content is gone and the most recent three remain
    assert_eq!(history.to_vec(), vec![30, 40, 50]);
}

/// WHAT: Shrinking capacity evicts immediately
/// WHY: The length invariant must hold right after reconfiguration
#[test]
fn given_full_history_when_shrinking_capacity_then_oldest_dropped() {
    // Given: A full history of four samples
    let mut history = AmplitudeHistory::new(4);
    for sample in [1, 2, 3, 4] {
        history.push(sample);
    }

    // When: Shrinking to two
    history.set_capacity(2);

    // Then: Only the newest two survive
    assert_eq!(history.capacity(), 2);
    assert_eq!(history.to_vec(), vec![3, 4]);
}

/// WHAT: Zero capacity keeps nothing
/// WHY: Presenters may disable the visualizer entirely
#[test]
fn given_zero_capacity_when_pushing_then_history_stays_empty() {
    // Given: A history with no room
    let mut history = AmplitudeHistory::new(0);

    // When: Pushing and replacing
    history.push(7);
    history.replace_with(&[1, 2]);

    // Then: Nothing is retained
    assert!(history.is_empty());
}
