//! Row collection that re-sorts with minimal element moves.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};

/// One element move performed by [`SortableRows::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMove {
    pub from: usize,
    pub to: usize,
}

/// Rows kept in the order of a fixed comparator.
///
/// Rows are appended unsorted. [`SortableRows::sort`] reconciles the live
/// order with the comparator by moving rows one at a time and reports each
/// move, so an observer can mirror the changes without a rebuild. Rows with
/// equal keys keep their relative order.
#[derive(Clone)]
pub struct SortableRows<T> {
    items: Vec<T>,
    compare: fn(&T, &T) -> Ordering,
}

impl<T> SortableRows<T> {
    pub fn new(compare: fn(&T, &T) -> Ordering) -> Self {
        Self { items: Vec::new(), compare }
    }

    /// Appends a row and returns its index.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Brings the rows into comparator order.
    pub fn sort(&mut self) -> Vec<RowMove> {
        let compare = self.compare;
        let mut target: Vec<usize> = (0..self.items.len()).collect();
        target.sort_by(|&a, &b| compare(&self.items[a], &self.items[b]));

        // `live[i]` is the original index of the row now at position `i`.
        let mut live: Vec<usize> = (0..self.items.len()).collect();
        let mut moves = Vec::new();
        for (cursor, wanted) in target.into_iter().enumerate() {
            let Some(offset) = live[cursor..].iter().position(|&index| index == wanted) else {
                continue;
            };
            let from = cursor + offset;
            if from != cursor {
                let row = self.items.remove(from);
                self.items.insert(cursor, row);
                let index = live.remove(from);
                live.insert(cursor, index);
                moves.push(RowMove { from, to: cursor });
            }
        }
        moves
    }

    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }

    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    pub fn find_mut(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Option<&mut T> {
        self.items.iter_mut().find(|item| predicate(item))
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Index<usize> for SortableRows<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for SortableRows<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a SortableRows<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for SortableRows<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: Serialize> Serialize for SortableRows<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn by_key(a: &(char, i32), b: &(char, i32)) -> Ordering {
        a.1.cmp(&b.1)
    }

    fn names(rows: &SortableRows<(char, i32)>) -> String {
        rows.iter().map(|(name, _)| *name).collect()
    }

    #[test]
    fn ties_keep_their_original_order() {
        let mut rows = SortableRows::new(by_key);
        for row in [('a', 3), ('b', 1), ('c', 1), ('d', 2)] {
            rows.push(row);
        }

        let moves = rows.sort();
        assert_eq!(names(&rows), "bcda");
        assert_eq!(moves, vec![RowMove { from: 1, to: 0 }, RowMove { from: 2, to: 1 }, RowMove { from: 3, to: 2 }]);
    }

    #[test]
    fn sorted_rows_need_no_moves() {
        let mut rows = SortableRows::new(by_key);
        for row in [('a', 1), ('b', 2), ('c', 2)] {
            rows.push(row);
        }
        assert!(rows.sort().is_empty());
        assert_eq!(names(&rows), "abc");
    }

    #[test]
    fn single_promotion_is_one_move() {
        let mut rows = SortableRows::new(by_key);
        for row in [('a', 1), ('b', 2), ('c', 3), ('d', 4)] {
            rows.push(row);
        }
        if let Some(row) = rows.find_mut(|row| row.0 == 'd') {
            row.1 = 0;
        }
        assert_eq!(rows.sort(), vec![RowMove { from: 3, to: 0 }]);
        assert_eq!(names(&rows), "dabc");
    }

    proptest! {
        #[test]
        fn sort_matches_a_stable_sort(keys in prop::collection::vec(0i32..5, 0..40)) {
            let mut rows = SortableRows::new(|a: &(usize, i32), b: &(usize, i32)| a.1.cmp(&b.1));
            for (index, key) in keys.iter().enumerate() {
                rows.push((index, *key));
            }
            let mut expected: Vec<(usize, i32)> = rows.as_slice().to_vec();
            expected.sort_by_key(|row| row.1);

            let moves = rows.sort();
            prop_assert_eq!(rows.as_slice(), expected.as_slice());
            prop_assert!(moves.len() < keys.len().max(1));
        }
    }
}
