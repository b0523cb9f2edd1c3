//! Enumeration of point subsets by position.
//!
//! The subset search picks `k` of the `n` decoded points at a time. Subsets are
//! visited smallest positions first, so the first subset that passes is the one
//! that keeps the earliest points of the record.
//!
//! ```rust
//! use polyrecon::combinatorics::CombinationIterator;
//!
//! let labels = ["1", "2", "3", "6"];
//! let mut picks = CombinationIterator::new(labels.len(), 2);
//!
//! let mut chosen = vec![];
//! while let Some(positions) = picks.next() {
//!     let pair: Vec<_> = positions.iter().map(|&p| labels[p]).collect();
//!     chosen.push(pair.join(","));
//! }
//!
//! assert_eq!(chosen, ["1,2", "1,3", "1,6", "2,3", "2,6", "3,6"]);
//! ```
use rug::Integer;

/// An iterator over the `k`-combinations of `0..n` in lexicographic order.
///
/// The combination is yielded as a borrowed slice of ascending indices, which is
/// overwritten in place by the next call to [`CombinationIterator::next`].
pub struct CombinationIterator {
    n: usize,
    indices: Vec<usize>,
    init: bool,
}

impl CombinationIterator {
    /// Start at the positions `0..k` of a list of `n` points. Nothing is
    /// yielded when `k` is zero or larger than `n`.
    pub fn new(n: usize, k: usize) -> CombinationIterator {
        let indices = Vec::from_iter(0..k);
        CombinationIterator {
            n,
            indices,
            init: false,
        }
    }

    /// Advances the iterator and returns the next combination.
    pub fn next(&mut self) -> Option<&[usize]> {
        if self.indices.is_empty() || self.indices.len() > self.n {
            return None;
        }

        if !self.init {
            self.init = true;
            return Some(&self.indices);
        }

        let k = self.indices.len();
        let i = (0..k)
            .rev()
            .find(|&i| self.indices[i] < self.n - k + i)?;

        let a = self.indices[i] + 1;
        for (p, v) in self.indices[i..].iter_mut().enumerate() {
            *v = a + p;
        }

        Some(&self.indices)
    }
}

/// The number of `k`-combinations of `n` elements.
pub fn binomial(n: usize, k: usize) -> Integer {
    if k > n {
        return Integer::new();
    }
    Integer::from(n as u64).binomial(k as u32)
}

#[cfg(test)]
mod test {
    use super::{binomial, CombinationIterator};

    fn collect(n: usize, k: usize) -> Vec<Vec<usize>> {
        let mut c = CombinationIterator::new(n, k);
        let mut combinations = vec![];
        while let Some(a) = c.next() {
            combinations.push(a.to_vec());
        }
        combinations
    }

    #[test]
    fn combinations() {
        let ans = vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
        assert_eq!(collect(4, 3), ans);
    }

    #[test]
    fn lexicographic_and_complete() {
        let c = collect(7, 3);
        assert_eq!(c.len(), 35);
        assert!(c.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(binomial(7, 3), 35);
    }

    #[test]
    fn edge_cases() {
        assert_eq!(collect(3, 3), vec![vec![0, 1, 2]]);
        assert!(collect(2, 3).is_empty());
        assert!(collect(3, 0).is_empty());
        assert_eq!(collect(3, 1), vec![vec![0], vec![1], vec![2]]);
        assert_eq!(binomial(2, 3), 0);
    }

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let mut c = CombinationIterator::new(2, 2);
        assert_eq!(c.next(), Some(&[0, 1][..]));
        assert_eq!(c.next(), None);
        assert_eq!(c.next(), None);
    }
}
