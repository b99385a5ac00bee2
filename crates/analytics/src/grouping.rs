use std::collections::HashMap;
use std::hash::Hash;
use std::ops::AddAssign;

/// An insertion-ordered accumulator of per-key totals.
///
/// Keys are kept in the order they were first seen, so `leader` resolves ties
/// to the earliest key reaching the maximum.
#[derive(Debug)]
pub(crate) struct Tally<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Tally<K, V>
where
    K: Eq + Hash + Clone,
    V: Copy + PartialOrd + AddAssign,
{
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// The first entry holding the maximum value, or `None` if nothing was added.
    pub(crate) fn leader(&self) -> Option<&(K, V)> {
        self.entries.iter().fold(None, |best: Option<&(K, V)>, entry| match best {
            Some(b) if entry.1 <= b.1 => Some(b),
            _ => Some(entry),
        })
    }
}

/// Groups items by key while keeping both keys and items in input order.
pub(crate) fn group_stable<'a, T, K, F>(items: &'a [T], key_of: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut groups: Vec<(K, Vec<&T>)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for item in items {
        let key = key_of(item);
        match index.get(&key) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_prefers_first_key_on_ties() {
        let mut tally = Tally::new();
        tally.add("b", 3);
        tally.add("a", 1);
        tally.add("a", 2);
        tally.add("c", 3);

        assert_eq!(tally.leader(), Some(&("b", 3)));
    }

    #[test]
    fn strictly_greater_value_takes_the_lead() {
        let mut tally = Tally::new();
        tally.add("b", 3);
        tally.add("a", 4);

        assert_eq!(tally.leader(), Some(&("a", 4)));
    }

    #[test]
    fn empty_tally_has_no_leader() {
        let tally: Tally<&str, i64> = Tally::new();
        assert!(tally.leader().is_none());
    }

    #[test]
    fn group_stable_keeps_first_seen_order() {
        let items = [("x", 1), ("y", 2), ("x", 3), ("z", 4)];
        let groups = group_stable(&items, |(k, _)| *k);

        let keys: Vec<_> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
        assert_eq!(groups[0].1, vec![&("x", 1), &("x", 3)]);
    }
}
