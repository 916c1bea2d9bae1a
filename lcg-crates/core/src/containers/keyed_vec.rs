use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// Dense per-key storage. Indexing takes a `Key` rather than a `usize`, so a table per Boolean
/// variable cannot be read with a literal or a propagator id by mistake.
#[derive(Debug, Hash, PartialEq, Eq)]
pub struct KeyedVec<Key, Value> {
    values: Vec<Value>,
    key: PhantomData<fn(Key)>,
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        KeyedVec {
            values: Vec::new(),
            key: PhantomData,
        }
    }
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        KeyedVec {
            values: self.values.clone(),
            key: PhantomData,
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Store `value` under the next free key, which is returned.
    pub fn push(&mut self, value: Value) -> Key {
        let key = Key::create_from_index(self.values.len());
        self.values.push(value);
        key
    }

    pub fn get(&self, key: Key) -> Option<&Value> {
        self.values.get(key.index())
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> {
        (0..self.values.len()).map(Key::create_from_index)
    }
}

impl<Key: StorageKey, Value: Clone> KeyedVec<Key, Value> {
    /// Grow with copies of `filler` until `key` is in range.
    pub(crate) fn accommodate(&mut self, key: Key, filler: Value) {
        let needed = key.index() + 1;
        if needed > self.values.len() {
            self.values.resize(needed, filler);
        }
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Value {
        &self.values[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Value {
        &mut self.values[key.index()]
    }
}

/// A key which is a position in a dense table.
pub trait StorageKey: Copy {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

impl StorageKey for usize {
    fn index(&self) -> usize {
        *self
    }

    fn create_from_index(index: usize) -> Self {
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accommodate_only_grows() {
        let mut values: KeyedVec<usize, u8> = KeyedVec::default();
        values.accommodate(3, 7);
        assert_eq!(4, values.len());

        values[1] = 2;
        values.accommodate(1, 9);

        assert_eq!(4, values.len());
        assert_eq!(2, values[1]);
        assert_eq!(vec![0, 1, 2, 3], values.keys().collect::<Vec<_>>());
    }

    #[test]
    fn pushing_hands_out_consecutive_keys() {
        let mut values: KeyedVec<usize, &str> = KeyedVec::default();

        assert_eq!(0, values.push("a"));
        assert_eq!(1, values.push("b"));
        assert_eq!(Some(&"b"), values.get(1));
        assert_eq!(None, values.get(2));
    }
}
