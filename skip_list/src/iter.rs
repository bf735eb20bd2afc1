use parking_lot::MutexGuard;

use crate::skip_list::SkipListInner;

/// Ascending iterator over the level-0 chain.
///
/// Holds the list's lock for its whole lifetime, so the yielded sequence is
/// one consistent snapshot; pairs are cloned out of the locked structure.
pub struct Iter<'a, K, V> {
    guard: MutexGuard<'a, SkipListInner<K, V>>,
    cursor: Option<usize>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(guard: MutexGuard<'a, SkipListInner<K, V>>) -> Self {
        let cursor = guard.first();
        Iter { guard, cursor }
    }
}

impl<K: Clone, V: Clone> Iterator for Iter<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.guard.node(idx);
        let item = (node.key().clone(), node.value().clone());
        self.cursor = self.guard.next_at(idx, 0);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.guard.len()))
    }
}
