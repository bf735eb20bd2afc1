use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::OrdoSkipListError;
use crate::Result;

///0 <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
///1 <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
///2 <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
///3 <head> ----------> [2] --------------------------------------------------> [9] ---------->

pub(crate) const DEFAULT_MAX_LEVEL: usize = 32;
pub(crate) const DEFAULT_PROBABILITY: f64 = 0.25;

/// A sorted key-value index backed by a skip list.
///
/// Cloning yields another handle to the same list. Every operation takes the
/// list's single exclusive lock for its whole traversal, so concurrent
/// callers observe a linearizable sequence of operations.
#[derive(Clone)]
pub struct SkipList<K, V> {
    pub(crate) inner: Arc<Mutex<SkipListInner<K, V>>>,
}

pub struct SkipListBuilder<K, V> {
    max_level: usize,
    probability: f64,
    seed: Option<u64>,
    cmp: Option<fn(&K, &K) -> Ordering>,
    v: PhantomData<V>,
}

impl<K, V> Default for SkipListBuilder<K, V> {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
            cmp: None,
            v: PhantomData,
        }
    }
}

impl<K, V> SkipListBuilder<K, V> {
    /// Highest level a node may reach. Clamped to at least 1.
    pub fn set_max_level(&mut self, max_level: usize) -> &mut Self {
        self.max_level = max_level.max(1);
        self
    }
    /// Chance that a node present at level i also reaches level i + 1.
    pub fn set_probability(&mut self, probability: f64) -> &mut Self {
        self.probability = probability.clamp(0.0, 1.0);
        self
    }
    /// Fixes the level generator's seed. Without it the generator is seeded
    /// from system entropy.
    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }
    pub fn set_comparator(&mut self, cmp: fn(&K, &K) -> Ordering) -> &mut Self {
        self.cmp = Some(cmp);
        self
    }

    pub fn build(&self) -> SkipList<K, V>
    where
        K: Ord,
    {
        self.build_with(self.cmp.unwrap_or(K::cmp))
    }

    pub fn build_with(&self, cmp: fn(&K, &K) -> Ordering) -> SkipList<K, V> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        SkipList {
            inner: Arc::new(Mutex::new(SkipListInner::new(
                self.max_level,
                self.probability,
                cmp,
                rng,
            ))),
        }
    }
}

/// Predecessor position during traversal: the sentinel head or a real node.
#[derive(Clone, Copy)]
enum Pred {
    Head,
    Node(usize),
}

pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    ///one entry per level this node participates in, `None` ends the chain
    forward: Vec<Option<usize>>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, level: usize) -> Self {
        Node {
            key,
            value,
            forward: vec![None; level],
        }
    }
    pub(crate) fn key(&self) -> &K {
        &self.key
    }
    pub(crate) fn value(&self) -> &V {
        &self.value
    }
    fn level(&self) -> usize {
        self.forward.len()
    }
}

/// Arena slot. Erased nodes become `Vacant` links in the free list and their
/// indices are reused by later inserts, so indices held in live forward
/// chains stay stable.
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant(Option<usize>),
}

pub(crate) struct SkipListInner<K, V> {
    ///node storage; forward chains index into this arena
    arena: Vec<Slot<K, V>>,
    ///head of the vacant slot free list
    free: Option<usize>,
    ///the sentinel's forward pointers, one per possible level
    head: Vec<Option<usize>>,
    ///number of levels currently in use, never shrinks
    level: usize,
    ///count of live nodes
    length: usize,
    probability: f64,
    cmp: fn(&K, &K) -> Ordering,
    rng: StdRng,
}

impl<K, V> SkipListInner<K, V> {
    pub(crate) fn new(
        max_level: usize,
        probability: f64,
        cmp: fn(&K, &K) -> Ordering,
        rng: StdRng,
    ) -> Self {
        SkipListInner {
            arena: Vec::new(),
            free: None,
            head: vec![None; max_level.max(1)],
            level: 1,
            length: 0,
            probability,
            cmp,
            rng,
        }
    }

    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<()> {
        let (mut update, candidate) = self.find_update(&key);
        if let Some(idx) = candidate {
            if (self.cmp)(self.node(idx).key(), &key) == Ordering::Equal {
                return Err(OrdoSkipListError::KeyAlreadyExists);
            }
        }
        let new_level = self.random_level();
        if new_level > self.level {
            update.resize(new_level, Pred::Head);
            self.level = new_level;
        }
        let idx = self.alloc(Node::new(key, value, new_level));
        for (level, pred) in update.into_iter().enumerate().take(new_level) {
            let next = self.next_of(pred, level);
            self.node_mut(idx).forward[level] = next;
            self.relink(pred, level, Some(idx));
        }
        self.length += 1;
        Ok(())
    }

    pub(crate) fn erase(&mut self, key: &K) -> Result<()> {
        let (update, candidate) = self.find_update(key);
        let target = match candidate {
            Some(idx)
                if (self.cmp)(self.node(idx).key(), key) == Ordering::Equal =>
            {
                idx
            }
            _ => return Err(OrdoSkipListError::KeyNotFound),
        };
        let target_level = self.node(target).level();
        for (level, pred) in update.into_iter().enumerate().take(target_level) {
            if self.next_of(pred, level) == Some(target) {
                let next = self.node(target).forward[level];
                self.relink(pred, level, next);
            }
        }
        // `level` stays at its high-water mark even when the top chains
        // empty out; traversal just walks past them.
        self.release(target);
        self.length -= 1;
        Ok(())
    }

    pub(crate) fn update(&mut self, key: &K, value: V) -> Result<()> {
        match self.lookup(key) {
            Some(idx) => {
                self.node_mut(idx).value = value;
                Ok(())
            }
            None => Err(OrdoSkipListError::KeyNotFound),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.lookup(key).map(|idx| self.node(idx).value())
    }

    pub(crate) fn len(&self) -> usize {
        self.length
    }
    pub(crate) fn height(&self) -> usize {
        self.level
    }
    pub(crate) fn max_level(&self) -> usize {
        self.head.len()
    }

    pub(crate) fn first(&self) -> Option<usize> {
        self.head[0]
    }
    pub(crate) fn first_at(&self, level: usize) -> Option<usize> {
        self.head[level]
    }
    pub(crate) fn next_at(&self, idx: usize, level: usize) -> Option<usize> {
        self.node(idx).forward[level]
    }

    pub(crate) fn node(&self, idx: usize) -> &Node<K, V> {
        match &self.arena[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("dangling skip list index {idx}"),
        }
    }
    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        match &mut self.arena[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("dangling skip list index {idx}"),
        }
    }
}

impl<K, V> SkipListInner<K, V> {
    ///walk down from the highest active level, recording the last position
    ///whose key is strictly less than `key` at every level
    fn find_update(&self, key: &K) -> (Vec<Pred>, Option<usize>) {
        let mut update = vec![Pred::Head; self.level];
        let mut cur = Pred::Head;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(cur, level) {
                if (self.cmp)(self.node(next).key(), key) == Ordering::Less {
                    cur = Pred::Node(next);
                } else {
                    break;
                }
            }
            update[level] = cur;
        }
        (update, self.next_of(cur, 0))
    }

    fn lookup(&self, key: &K) -> Option<usize> {
        let mut cur = Pred::Head;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(cur, level) {
                if (self.cmp)(self.node(next).key(), key) == Ordering::Less {
                    cur = Pred::Node(next);
                } else {
                    break;
                }
            }
        }
        let candidate = self.next_of(cur, 0)?;
        ((self.cmp)(self.node(candidate).key(), key) == Ordering::Equal)
            .then_some(candidate)
    }

    ///generate a level in [1, max_level]; reaching level i + 1 from level i
    ///has probability `self.probability`
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level() && self.rng.gen_bool(self.probability) {
            level += 1;
        }
        level
    }

    fn next_of(&self, pred: Pred, level: usize) -> Option<usize> {
        match pred {
            Pred::Head => self.head[level],
            Pred::Node(idx) => self.node(idx).forward[level],
        }
    }

    fn relink(&mut self, pred: Pred, level: usize, next: Option<usize>) {
        match pred {
            Pred::Head => self.head[level] = next,
            Pred::Node(idx) => self.node_mut(idx).forward[level] = next,
        }
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        match self.free {
            Some(idx) => {
                self.free = match &self.arena[idx] {
                    Slot::Vacant(next) => *next,
                    Slot::Occupied(_) => {
                        unreachable!("free list points at a live node")
                    }
                };
                self.arena[idx] = Slot::Occupied(node);
                idx
            }
            None => {
                self.arena.push(Slot::Occupied(node));
                self.arena.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) {
        self.arena[idx] = Slot::Vacant(self.free);
        self.free = Some(idx);
    }
}

#[cfg(test)]
impl<K, V> SkipListInner<K, V> {
    pub(crate) fn check_invariants(&self) {
        use std::collections::HashSet;

        // keys strictly increase along every level's chain
        for level in 0..self.level {
            let mut prev: Option<&K> = None;
            let mut cur = self.head[level];
            while let Some(idx) = cur {
                let node = self.node(idx);
                if let Some(prev) = prev {
                    assert_eq!(
                        (self.cmp)(prev, node.key()),
                        Ordering::Less,
                        "keys out of order at level {level}"
                    );
                }
                prev = Some(node.key());
                cur = node.forward[level];
            }
        }
        // every node linked at a higher level is also reachable at level 0
        let mut base = HashSet::new();
        let mut cur = self.head[0];
        while let Some(idx) = cur {
            base.insert(idx);
            cur = self.node(idx).forward[0];
        }
        assert_eq!(base.len(), self.length, "length disagrees with level 0");
        for level in 1..self.level {
            let mut cur = self.head[level];
            while let Some(idx) = cur {
                assert!(
                    base.contains(&idx),
                    "node at level {level} missing from level 0"
                );
                assert!(
                    self.node(idx).level() > level,
                    "node linked above its own level"
                );
                cur = self.node(idx).forward[level];
            }
        }
    }

    pub(crate) fn arena_slots(&self) -> usize {
        self.arena.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_inner() -> SkipListInner<String, String> {
        SkipListInner::new(
            20,
            DEFAULT_PROBABILITY,
            String::cmp,
            StdRng::seed_from_u64(7),
        )
    }

    fn pair(i: u32) -> (String, String) {
        (format!("{:02}", i), format!("v{}", i))
    }

    #[test]
    fn test_insert_get() {
        let mut list = test_inner();
        for i in 1..=10 {
            let (k, v) = pair(i);
            list.insert(k, v).unwrap();
        }
        for i in 1..=10 {
            let (k, v) = pair(i);
            assert_eq!(list.get(&k), Some(&v));
        }
        assert_eq!(list.get(&"00".to_string()), None);
        assert_eq!(list.get(&"11".to_string()), None);
        assert_eq!(list.len(), 10);
        list.check_invariants();
    }

    #[test]
    fn test_insert_duplicate() {
        let mut list = test_inner();
        list.insert("a".into(), "1".into()).unwrap();
        assert!(matches!(
            list.insert("a".into(), "2".into()),
            Err(OrdoSkipListError::KeyAlreadyExists)
        ));
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(&"a".to_string()), Some(&"1".to_string()));
        list.check_invariants();
    }

    #[test]
    fn test_erase_relinks() {
        let mut list = test_inner();
        for i in 1..=9 {
            let (k, v) = pair(i);
            list.insert(k, v).unwrap();
        }
        list.erase(&"05".to_string()).unwrap();
        assert_eq!(list.len(), 8);
        assert_eq!(list.get(&"05".to_string()), None);
        assert_eq!(list.get(&"04".to_string()), Some(&"v4".to_string()));
        assert_eq!(list.get(&"06".to_string()), Some(&"v6".to_string()));
        list.check_invariants();

        assert!(matches!(
            list.erase(&"05".to_string()),
            Err(OrdoSkipListError::KeyNotFound)
        ));
        assert_eq!(list.len(), 8);

        for i in (1..=9).filter(|i| *i != 5) {
            list.erase(&pair(i).0).unwrap();
        }
        assert_eq!(list.len(), 0);
        list.check_invariants();
    }

    #[test]
    fn test_update_in_place() {
        let mut list = test_inner();
        for i in 1..=6 {
            let (k, v) = pair(i);
            list.insert(k, v).unwrap();
        }
        let height = list.height();
        list.update(&"03".to_string(), "changed".into()).unwrap();
        assert_eq!(list.get(&"03".to_string()), Some(&"changed".to_string()));
        assert_eq!(list.len(), 6);
        assert_eq!(list.height(), height);
        assert!(matches!(
            list.update(&"99".to_string(), "x".into()),
            Err(OrdoSkipListError::KeyNotFound)
        ));
        list.check_invariants();
    }

    #[test]
    fn test_level_is_high_water_mark() {
        let mut list = test_inner();
        for i in 1..=64 {
            let (k, v) = pair(i);
            list.insert(k, v).unwrap();
        }
        let height = list.height();
        assert!(height > 1);
        for i in 1..=64 {
            list.erase(&pair(i).0).unwrap();
        }
        assert_eq!(list.len(), 0);
        assert_eq!(list.height(), height);
        list.check_invariants();
    }

    #[test]
    fn test_zero_probability_stays_flat() {
        let mut list =
            SkipListInner::new(20, 0.0, String::cmp, StdRng::seed_from_u64(7));
        for i in 1..=32 {
            let (k, v) = pair(i);
            list.insert(k, v).unwrap();
        }
        assert_eq!(list.height(), 1);
        list.check_invariants();
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut list = test_inner();
        for i in 1..=8 {
            let (k, v) = pair(i);
            list.insert(k, v).unwrap();
        }
        let slots = list.arena_slots();
        for i in 1..=4 {
            list.erase(&pair(i).0).unwrap();
        }
        for i in 11..=14 {
            let (k, v) = pair(i);
            list.insert(k, v).unwrap();
        }
        assert_eq!(list.arena_slots(), slots);
        list.check_invariants();
    }
}
