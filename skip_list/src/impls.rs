use std::fmt::{self, Display};

use crate::iter::Iter;
use crate::skip_list::SkipList;
use crate::Result;

impl<K, V> SkipList<K, V> {
    pub fn new() -> Self
    where
        K: Ord,
    {
        crate::skip_list::SkipListBuilder::default().build()
    }

    /// Inserts the pair, refusing keys already present.
    pub fn insert(&self, key: K, value: V) -> bool {
        self.try_insert(key, value).is_ok()
    }
    pub fn try_insert(&self, key: K, value: V) -> Result<()> {
        self.inner.lock().insert(key, value)
    }

    /// Removes the key's node, unlinking it from every level it occupies.
    pub fn erase(&self, key: &K) -> bool {
        self.try_erase(key).is_ok()
    }
    pub fn try_erase(&self, key: &K) -> Result<()> {
        self.inner.lock().erase(key)
    }

    /// Overwrites the value of an existing key in place.
    pub fn update(&self, key: &K, value: V) -> bool {
        self.try_update(key, value).is_ok()
    }
    pub fn try_update(&self, key: &K, value: V) -> Result<()> {
        self.inner.lock().update(key, value)
    }

    pub fn search(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of levels currently in use. Grows with tall inserts, never
    /// shrinks on erase.
    pub fn height(&self) -> usize {
        self.inner.lock().height()
    }

    /// Ascending iterator over one consistent snapshot. The list's lock is
    /// held until the iterator is dropped.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.inner.lock())
    }

    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().collect()
    }
}

impl<K: Ord, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders every level top-down, `level i: key:value; ...` per line.
impl<K: Display, V: Display> Display for SkipList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        for level in (0..inner.height()).rev() {
            write!(f, "level {}:", level)?;
            let mut cur = inner.first_at(level);
            while let Some(idx) = cur {
                let node = inner.node(idx);
                write!(f, " {}:{};", node.key(), node.value())?;
                cur = inner.next_at(idx, level);
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
