//! A max-heap over dense keys, used for the activity-based variable order.
//!
//! Keys are never dropped from the heap storage: [`KeyValueHeap::delete_key`] moves a key past
//! the end of the active region, and [`KeyValueHeap::restore_key`] moves it back in. Its value is
//! kept in both cases, so bumping the activity of an assigned variable is still recorded.
use std::ops::AddAssign;
use std::ops::DivAssign;

use super::KeyedVec;
use super::StorageKey;
use crate::lcg_assert_moderate;

#[derive(Debug, Clone)]
pub struct KeyValueHeap<Key, Value> {
    /// The values, laid out as a binary heap in `[0, end_position)`.
    values: Vec<Value>,
    position_of: KeyedVec<Key, usize>,
    key_at: Vec<Key>,
    end_position: usize,
}

impl<Key: StorageKey, Value> Default for KeyValueHeap<Key, Value> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            position_of: KeyedVec::default(),
            key_at: Vec::new(),
            end_position: 0,
        }
    }
}

impl<Key, Value> KeyValueHeap<Key, Value>
where
    Key: StorageKey,
    Value: AddAssign<Value> + DivAssign<Value> + PartialOrd + Copy,
{
    /// The number of keys which are currently present.
    pub fn len(&self) -> usize {
        self.end_position
    }

    pub fn is_empty(&self) -> bool {
        self.end_position == 0
    }

    pub fn is_key_present(&self, key: Key) -> bool {
        key.index() < self.position_of.len() && self.position_of[key] < self.end_position
    }

    pub fn get_value(&self, key: Key) -> Value {
        self.values[self.position_of[key]]
    }

    /// The present key with the largest value, without removing it.
    pub fn peek_max(&self) -> Option<Key> {
        if self.is_empty() {
            None
        } else {
            Some(self.key_at[0])
        }
    }

    pub fn pop_max(&mut self) -> Option<Key> {
        let best = self.peek_max()?;
        self.delete_key(best);
        Some(best)
    }

    /// Register a new key with the given value. The key must be the next unused index.
    pub fn grow(&mut self, key: Key, value: Value) {
        lcg_assert_moderate!(key.index() == self.key_at.len());

        let position = self.values.len();
        self.values.push(value);
        self.key_at.push(key);
        let _ = self.position_of.push(position);

        // Move the new key from the inactive region to the end of the heap.
        self.swap_positions(position, self.end_position);
        self.end_position += 1;
        self.sift_up(self.end_position - 1);
    }

    pub fn increment(&mut self, key: Key, increment: Value) {
        let position = self.position_of[key];
        self.values[position] += increment;

        if self.is_key_present(key) {
            self.sift_up(position);
        }
    }

    /// Overwrite the value of a key, keeping the heap property.
    pub fn set_value(&mut self, key: Key, value: Value) {
        let position = self.position_of[key];
        let increased = value > self.values[position];
        self.values[position] = value;

        if self.is_key_present(key) {
            if increased {
                self.sift_up(position);
            } else {
                self.sift_down(position);
            }
        }
    }

    pub fn restore_key(&mut self, key: Key) {
        if self.is_key_present(key) {
            return;
        }

        let position = self.position_of[key];
        self.swap_positions(position, self.end_position);
        self.end_position += 1;
        self.sift_up(self.end_position - 1);
    }

    pub fn delete_key(&mut self, key: Key) {
        if !self.is_key_present(key) {
            return;
        }

        let position = self.position_of[key];
        self.end_position -= 1;
        self.swap_positions(position, self.end_position);

        if position < self.end_position {
            self.sift_down(position);
            self.sift_up(position);
        }
    }

    /// Divide every value, present or not, by `divisor`. Order is preserved for positive
    /// divisors so no restructuring is needed.
    pub fn divide_values(&mut self, divisor: Value) {
        for value in self.values.iter_mut() {
            *value /= divisor;
        }
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if self.values[parent] >= self.values[position] {
                break;
            }
            self.swap_positions(parent, position);
            position = parent;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        loop {
            let left = 2 * position + 1;
            if left >= self.end_position {
                break;
            }

            let right = left + 1;
            let largest_child = if right < self.end_position && self.values[right] > self.values[left]
            {
                right
            } else {
                left
            };

            if self.values[position] >= self.values[largest_child] {
                break;
            }

            self.swap_positions(position, largest_child);
            position = largest_child;
        }
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }

        let key_a = self.key_at[a];
        let key_b = self.key_at[b];

        self.values.swap(a, b);
        self.key_at.swap(a, b);
        self.position_of[key_a] = b;
        self.position_of[key_b] = a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap_with(values: &[f64]) -> KeyValueHeap<usize, f64> {
        let mut heap = KeyValueHeap::default();
        for (key, value) in values.iter().enumerate() {
            heap.grow(key, *value);
        }
        heap
    }

    #[test]
    fn pop_max_yields_keys_by_decreasing_value() {
        let mut heap = heap_with(&[3.0, 9.0, 1.0, 5.0]);

        let order = std::iter::from_fn(|| heap.pop_max()).collect::<Vec<_>>();
        assert_eq!(vec![1, 3, 0, 2], order);
        assert!(heap.is_empty());
    }

    #[test]
    fn deleted_key_keeps_its_value_until_restored() {
        let mut heap = heap_with(&[3.0, 9.0, 1.0]);

        heap.delete_key(1);
        assert!(!heap.is_key_present(1));
        assert_eq!(Some(0), heap.peek_max());

        heap.increment(1, 1.0);
        heap.restore_key(1);

        assert_eq!(Some(1), heap.peek_max());
        assert_eq!(10.0, heap.get_value(1));
    }

    #[test]
    fn increment_moves_key_to_the_top() {
        let mut heap = heap_with(&[3.0, 9.0, 1.0]);
        heap.increment(2, 20.0);
        assert_eq!(Some(2), heap.peek_max());
    }

    #[test]
    fn divide_values_keeps_the_order() {
        let mut heap = heap_with(&[4.0, 8.0]);
        heap.divide_values(4.0);

        assert_eq!(Some(1), heap.peek_max());
        assert_eq!(1.0, heap.get_value(0));
    }
}
