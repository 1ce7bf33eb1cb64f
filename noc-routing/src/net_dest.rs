// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Sets of end-node identifiers.

use std::fmt;

const BITS_PER_WORD: usize = u64::BITS as usize;

/// A set of network end-points that a message may be destined for, or that
/// a link can reach.
///
/// Stored as a bitset so that the intersection test used on every routing
/// decision is a word-wise AND.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NetDest {
    bits: Vec<u64>,
}

impl NetDest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding only `node`.
    #[must_use]
    pub fn single(node: usize) -> Self {
        let mut dest = Self::new();
        dest.insert(node);
        dest
    }

    pub fn insert(&mut self, node: usize) {
        let word = node / BITS_PER_WORD;
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        self.bits[word] |= 1u64 << (node % BITS_PER_WORD);
    }

    #[must_use]
    pub fn contains(&self, node: usize) -> bool {
        match self.bits.get(node / BITS_PER_WORD) {
            Some(word) => word & (1u64 << (node % BITS_PER_WORD)) != 0,
            None => false,
        }
    }

    /// Returns true if at least one node is in both sets.
    #[must_use]
    pub fn intersects(&self, other: &NetDest) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .any(|(a, b)| a & b != 0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over the nodes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().enumerate().flat_map(|(i, word)| {
            (0..BITS_PER_WORD)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| i * BITS_PER_WORD + bit)
        })
    }
}

impl FromIterator<usize> for NetDest {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut dest = Self::new();
        for node in iter {
            dest.insert(node);
        }
        dest
    }
}

impl fmt::Display for NetDest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, node) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{node}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set() {
        let dest = NetDest::new();
        assert!(dest.is_empty());
        assert_eq!(dest.count(), 0);
        assert!(!dest.contains(0));
        assert!(!dest.intersects(&NetDest::single(0)));
        assert_eq!(dest.to_string(), "{}");
    }

    #[test]
    fn spans_words() {
        let dest: NetDest = [1, 63, 64, 130].into_iter().collect();
        assert_eq!(dest.count(), 4);
        assert!(dest.contains(64));
        assert!(!dest.contains(65));
        assert!(!dest.contains(1000));
        assert_eq!(dest.iter().collect::<Vec<_>>(), vec![1, 63, 64, 130]);
        assert_eq!(dest.to_string(), "{1, 63, 64, 130}");
    }

    #[test]
    fn intersection() {
        let a: NetDest = [0, 5, 70].into_iter().collect();
        let b: NetDest = [70].into_iter().collect();
        let c: NetDest = [1, 2].into_iter().collect();
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!b.intersects(&c));
    }
}
