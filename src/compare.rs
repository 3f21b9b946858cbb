//! # Order-insensitive comparison of two sequences.
//!
//! [`diff_unordered`] groups elements into those found on both sides, only on
//! the left and only on the right. Duplicates count individually.
//!
//! ## Matching rule
//! Greedy first fit: each left element, in order, takes the first right
//! element not matched yet that the predicate accepts. With a predicate that
//! is not an equivalence (e.g. [`substring_of`]) this is not a maximum
//! matching; the greedy result is the contract.
//!
//! # Example
//! ```
//! use sigvisor::compare::{diff_unordered, strings_equal};
//!
//! let diff = diff_unordered(["a", "a", "b"], ["a", "b", "b"], strings_equal);
//! assert_eq!(diff.common, vec!["a", "b"]);
//! assert_eq!(diff.only_left, vec!["a"]);
//! assert_eq!(diff.only_right, vec!["b"]);
//! ```

/// Result of [`diff_unordered`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnorderedDiff<T> {
    /// Left elements that found a partner on the right.
    pub common: Vec<T>,
    /// Left elements without a partner.
    pub only_left: Vec<T>,
    /// Right elements never matched.
    pub only_right: Vec<T>,
}

impl<T> UnorderedDiff<T> {
    /// Returns `true` if both sides matched completely.
    #[inline]
    pub fn is_match(&self) -> bool {
        self.only_left.is_empty() && self.only_right.is_empty()
    }
}

/// Compares `left` and `right` ignoring order, with `eq(left_elem, right_elem)`.
///
/// `common` keeps the left-hand element of each matched pair; `only_right`
/// keeps the original order of the right side.
pub fn diff_unordered<T, L, R, F>(left: L, right: R, mut eq: F) -> UnorderedDiff<T>
where
    L: IntoIterator<Item = T>,
    R: IntoIterator<Item = T>,
    F: FnMut(&T, &T) -> bool,
{
    let mut pending: Vec<Option<T>> = right.into_iter().map(Some).collect();
    let mut common = Vec::new();
    let mut only_left = Vec::new();

    for l in left {
        let hit = pending
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|r| eq(&l, r)));
        match hit {
            Some(j) => {
                pending[j] = None;
                common.push(l);
            }
            None => only_left.push(l),
        }
    }

    UnorderedDiff {
        common,
        only_left,
        only_right: pending.into_iter().flatten().collect(),
    }
}

/// Predicate: both strings are equal.
pub fn strings_equal<S: AsRef<str> + ?Sized>(a: &S, b: &S) -> bool {
    a.as_ref() == b.as_ref()
}

/// Predicate: `a` is a substring of `b`.
pub fn substring_of<S: AsRef<str> + ?Sized>(a: &S, b: &S) -> bool {
    b.as_ref().contains(a.as_ref())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_multiplicity_is_respected() {
        let diff = diff_unordered(["a", "a", "b"], ["a", "b", "b"], strings_equal);
        assert_eq!(diff.common, vec!["a", "b"]);
        assert_eq!(diff.only_left, vec!["a"]);
        assert_eq!(diff.only_right, vec!["b"]);
        assert!(!diff.is_match());
    }

    #[test]
    fn test_same_elements_different_order() {
        let diff = diff_unordered(vec![3, 1, 2, 1], vec![1, 2, 1, 3], |a, b| a == b);
        assert_eq!(diff.common, vec![3, 1, 2, 1]);
        assert!(diff.is_match());
    }

    #[test]
    fn test_empty_sides() {
        let diff = diff_unordered(Vec::<i32>::new(), vec![1, 2], |a, b| a == b);
        assert!(diff.common.is_empty());
        assert!(diff.only_left.is_empty());
        assert_eq!(diff.only_right, vec![1, 2]);

        let diff = diff_unordered(vec![1], Vec::new(), |a: &i32, b: &i32| a == b);
        assert_eq!(diff.only_left, vec![1]);
    }

    #[test]
    fn test_only_right_keeps_right_order() {
        let diff = diff_unordered(vec![2], vec![5, 2, 4, 3], |a, b| a == b);
        assert_eq!(diff.only_right, vec![5, 4, 3]);
    }

    #[test]
    fn test_substring_matching_is_greedy_first_fit() {
        // "a" grabs "ab" first, leaving "b" without its only partner
        let left = ["a", "ab"];
        let right = ["ab", "a"];
        let diff = diff_unordered(left, right, substring_of);
        assert_eq!(diff.common, vec!["a"]);
        assert_eq!(diff.only_left, vec!["ab"]);
        assert_eq!(diff.only_right, vec!["a"]);
    }

    #[test]
    fn test_predicate_argument_order() {
        let diff = diff_unordered(["log"], ["catalog"], substring_of);
        assert!(diff.is_match());

        let diff = diff_unordered(["catalog"], ["log"], substring_of);
        assert!(!diff.is_match());
    }

    #[test]
    fn test_owned_strings() {
        let expected = vec!["x".to_string(), "y".to_string()];
        let actual = vec!["y".to_string(), "x".to_string()];
        assert!(diff_unordered(expected, actual, strings_equal).is_match());
    }
}
