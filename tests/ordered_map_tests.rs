//! Unit tests for OrderedMap.
//!
//! Covers the public API end to end: insertion and lookup, the deletion
//! shapes, handle stability, iteration and the standard trait impls.

use bst_map::ordered::{KeyNotFound, OrderedMap};
use rstest::{fixture, rstest};
use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// =============================================================================
// Fixtures
// =============================================================================

#[fixture]
fn colors() -> OrderedMap<i32, &'static str> {
    let mut map = OrderedMap::new();
    for (key, value) in [3, 4, 6, 2].into_iter().zip(["red", "blue", "yellow", "at"]) {
        map.insert(key, value);
    }
    map
}

/// ```text
///          5
///        /   \
///       3     8
///      / \   / \
///     1   4 7   9
/// ```
#[fixture]
fn balanced() -> OrderedMap<i32, String> {
    [5, 3, 8, 1, 4, 7, 9]
        .into_iter()
        .map(|key| (key, key.to_string()))
        .collect()
}

fn keys_of<V>(map: &OrderedMap<i32, V>) -> Vec<i32> {
    map.keys().copied().collect()
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// Basic Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_map() {
    let map: OrderedMap<i32, String> = OrderedMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.root_handle(), None);
}

#[rstest]
fn test_default_creates_empty_map() {
    let map: OrderedMap<i32, String> = OrderedMap::default();
    assert!(map.is_empty());
}

#[rstest]
fn test_with_capacity_reserves_nodes() {
    let map: OrderedMap<i32, String> = OrderedMap::with_capacity(64);
    assert!(map.capacity() >= 64);
    assert!(map.is_empty());
}

// =============================================================================
// Insert and Get Tests
// =============================================================================

#[rstest]
fn test_lookup_after_inserts(colors: OrderedMap<i32, &'static str>) {
    assert_eq!(colors.get(&6), Some(&"yellow"));
    assert_eq!(colors.get(&2), Some(&"at"));
    assert_eq!(colors.get(&5), None);
    assert_eq!(colors.len(), 4);
}

#[rstest]
fn test_iterate_after_inserts(colors: OrderedMap<i32, &'static str>) {
    let entries: Vec<(i32, &str)> = colors.iter().map(|(key, value)| (*key, *value)).collect();
    assert_eq!(
        entries,
        vec![(2, "at"), (3, "red"), (4, "blue"), (6, "yellow")]
    );
}

#[rstest]
fn test_contains_key(colors: OrderedMap<i32, &'static str>) {
    assert!(colors.contains_key(&3));
    assert!(!colors.contains_key(&5));
    assert!(!OrderedMap::<i32, i32>::new().contains_key(&3));
}

#[rstest]
fn test_get_with_borrowed_key() {
    let mut map = OrderedMap::new();
    map.insert("hello".to_string(), 42);
    assert_eq!(map.get("hello"), Some(&42));
    assert!(map.contains_key("hello"));
    assert_eq!(map.delete("hello"), Ok(42));
}

#[rstest]
fn test_insert_overwrites_existing_key(mut colors: OrderedMap<i32, &'static str>) {
    assert_eq!(colors.insert(4, "green"), Some("blue"));
    assert_eq!(colors.get(&4), Some(&"green"));
    assert_eq!(colors.len(), 4);
    colors.check_invariants().unwrap();
}

#[rstest]
fn test_get_mut_updates_value(mut colors: OrderedMap<i32, &'static str>) {
    if let Some(value) = colors.get_mut(&3) {
        *value = "crimson";
    }
    assert_eq!(colors[&3], "crimson");
    assert_eq!(colors.get_mut(&99), None);
}

#[rstest]
fn test_index_returns_value(colors: OrderedMap<i32, &'static str>) {
    assert_eq!(colors[&6], "yellow");
}

#[rstest]
#[should_panic(expected = "key not found in ordered map")]
fn test_index_panics_on_absent_key(colors: OrderedMap<i32, &'static str>) {
    let _ = colors[&42];
}

// =============================================================================
// Delete Tests
// =============================================================================

#[rstest]
fn test_delete_two_children_promotes_successor_in_place(mut balanced: OrderedMap<i32, String>) {
    let five = balanced.handle_of(&5).unwrap();

    assert_eq!(balanced.delete(&5), Ok("5".to_string()));
    assert_eq!(keys_of(&balanced), vec![1, 3, 4, 7, 8, 9]);
    assert_eq!(balanced.entry_at(five), Some((&7, &"7".to_string())));
    assert_eq!(balanced.root_handle(), Some(five));
    balanced.check_invariants().unwrap();

    // The promoted node is deleted through its retained handle position.
    assert_eq!(balanced.delete(&7), Ok("7".to_string()));
    assert_eq!(balanced.entry_at(five), Some((&8, &"8".to_string())));
    assert_eq!(keys_of(&balanced), vec![1, 3, 4, 8, 9]);
    balanced.check_invariants().unwrap();
}

#[rstest]
#[case::leaf(1)]
#[case::leaf_on_the_right(9)]
#[case::inner_with_two_children(3)]
#[case::root(5)]
fn test_delete_each_key_keeps_order(mut balanced: OrderedMap<i32, String>, #[case] key: i32) {
    let mut expected = keys_of(&balanced);
    expected.retain(|existing| *existing != key);

    assert_eq!(balanced.delete(&key), Ok(key.to_string()));
    assert!(!balanced.contains_key(&key));
    assert_eq!(balanced.len(), 6);
    assert_eq!(keys_of(&balanced), expected);
    balanced.check_invariants().unwrap();
}

#[rstest]
fn test_delete_every_key_in_insertion_order(mut balanced: OrderedMap<i32, String>) {
    for key in [5, 3, 8, 1, 4, 7, 9] {
        balanced.delete(&key).unwrap();
        balanced.check_invariants().unwrap();
    }
    assert!(balanced.is_empty());
    assert_eq!(balanced.root_handle(), None);
}

#[rstest]
fn test_delete_absent_key_reports_key_not_found(mut balanced: OrderedMap<i32, String>) {
    let before: Vec<(i32, String)> = balanced.clone().into_iter().collect();
    let shape: Vec<i32> = balanced.pre_order().map(|(key, _)| *key).collect();

    assert_eq!(balanced.delete(&6), Err(KeyNotFound));
    assert_eq!(balanced.len(), 7);
    assert_eq!(balanced.clone().into_iter().collect::<Vec<_>>(), before);
    assert_eq!(
        balanced.pre_order().map(|(key, _)| *key).collect::<Vec<_>>(),
        shape
    );
}

#[rstest]
fn test_delete_on_empty_map_reports_key_not_found() {
    let mut map: OrderedMap<i32, i32> = OrderedMap::new();
    assert_eq!(map.delete(&0), Err(KeyNotFound));
    assert!(map.is_empty());
}

#[rstest]
fn test_key_not_found_propagates_with_question_mark() {
    fn delete_both(map: &mut OrderedMap<i32, i32>) -> Result<i32, KeyNotFound> {
        Ok(map.delete(&1)? + map.delete(&2)?)
    }

    let mut map: OrderedMap<i32, i32> = [(1, 10)].into_iter().collect();
    assert_eq!(delete_both(&mut map), Err(KeyNotFound));
    assert!(map.is_empty());
}

#[rstest]
fn test_remove_returns_option(mut colors: OrderedMap<i32, &'static str>) {
    assert_eq!(colors.remove(&2), Some("at"));
    assert_eq!(colors.remove(&2), None);
}

#[rstest]
fn test_deleted_keys_can_be_reinserted(mut balanced: OrderedMap<i32, String>) {
    balanced.delete(&5).unwrap();
    balanced.insert(5, "five".to_string());
    assert_eq!(balanced.get(&5), Some(&"five".to_string()));
    assert_eq!(balanced.len(), 7);
    balanced.check_invariants().unwrap();
}

#[rstest]
fn test_degenerate_chain_deletes() {
    let mut map: OrderedMap<i32, i32> = (0..1_000).map(|key| (key, key)).collect();
    assert_eq!(map.height(), 1_000);
    for key in (0..1_000).step_by(2) {
        map.delete(&key).unwrap();
    }
    assert_eq!(map.len(), 500);
    assert!(map.keys().all(|key| key % 2 == 1));
    map.check_invariants().unwrap();
}

// =============================================================================
// Handle Tests
// =============================================================================

#[rstest]
fn test_handles_survive_unrelated_deletes(mut balanced: OrderedMap<i32, String>) {
    let eight = balanced.handle_of(&8).unwrap();
    balanced.delete(&1).unwrap();
    balanced.delete(&4).unwrap();
    assert_eq!(balanced.entry_at(eight), Some((&8, &"8".to_string())));
}

#[rstest]
fn test_handle_of_deleted_node_does_not_alias_new_node(mut balanced: OrderedMap<i32, String>) {
    let four = balanced.handle_of(&4).unwrap();
    balanced.delete(&4).unwrap();
    balanced.insert(6, "6".to_string());
    assert_eq!(balanced.entry_at(four), None);
    assert_ne!(balanced.handle_of(&6), Some(four));
}

#[rstest]
fn test_handles_are_unique(balanced: OrderedMap<i32, String>) {
    let handles: HashSet<_> = balanced
        .keys()
        .filter_map(|key| balanced.handle_of(key))
        .collect();
    assert_eq!(handles.len(), balanced.len());
}

// =============================================================================
// Standard Trait Tests
// =============================================================================

#[rstest]
fn test_equality_ignores_tree_shape() {
    let ascending: OrderedMap<i32, i32> = (1..=5).map(|key| (key, key)).collect();
    let shuffled: OrderedMap<i32, i32> = [3, 1, 5, 2, 4].into_iter().map(|key| (key, key)).collect();
    assert_ne!(ascending.height(), shuffled.height());
    assert_eq!(ascending, shuffled);
    assert_eq!(hash_of(&ascending), hash_of(&shuffled));
}

#[rstest]
fn test_inequality_on_different_values() {
    let first: OrderedMap<i32, i32> = [(1, 1)].into_iter().collect();
    let second: OrderedMap<i32, i32> = [(1, 2)].into_iter().collect();
    assert_ne!(first, second);
}

#[rstest]
fn test_clone_is_independent(balanced: OrderedMap<i32, String>) {
    let mut cloned = balanced.clone();
    cloned.delete(&5).unwrap();
    assert_eq!(balanced.len(), 7);
    assert_eq!(cloned.len(), 6);
    assert!(balanced.contains_key(&5));
}

#[rstest]
fn test_extend_inserts_and_overwrites(mut colors: OrderedMap<i32, &'static str>) {
    colors.extend([(1, "one"), (2, "two")]);
    assert_eq!(colors.len(), 5);
    assert_eq!(colors.get(&2), Some(&"two"));
}

#[rstest]
fn test_borrowed_into_iterator(colors: OrderedMap<i32, &'static str>) {
    let mut visited = Vec::new();
    for (key, _) in &colors {
        visited.push(*key);
    }
    assert_eq!(visited, vec![2, 3, 4, 6]);
}

#[rstest]
fn test_values_follow_key_order(colors: OrderedMap<i32, &'static str>) {
    let values: Vec<&str> = colors.values().copied().collect();
    assert_eq!(values, vec!["at", "red", "blue", "yellow"]);
}

// =============================================================================
// Logging Tests
// =============================================================================

#[rstest]
fn test_operations_under_trace_subscriber(mut balanced: OrderedMap<i32, String>) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_test_writer()
        .try_init();

    balanced.insert(5, "five".to_string());
    assert!(balanced.delete(&6).is_err());
    balanced.delete(&1).unwrap();
    balanced.delete(&3).unwrap();
    balanced.delete(&5).unwrap();
    assert_eq!(keys_of(&balanced), vec![4, 7, 8, 9]);
    balanced.check_invariants().unwrap();
}
