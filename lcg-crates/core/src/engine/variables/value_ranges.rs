/// A set of values stored as sorted, disjoint and non-adjacent ranges. Holds the domain of a
/// variable whose literals have not been created yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ValueRanges(Vec<(i32, i32)>);

fn adjacent(upper: i32, lower: i32) -> bool {
    i64::from(upper) + 1 == i64::from(lower)
}

impl ValueRanges {
    pub(crate) fn interval(lower_bound: i32, upper_bound: i32) -> ValueRanges {
        ValueRanges(vec![(lower_bound, upper_bound)])
    }

    /// The ranges of `values`, which must be sorted and free of duplicates.
    pub(crate) fn from_sorted(values: &[i32]) -> ValueRanges {
        let mut ranges: Vec<(i32, i32)> = Vec::new();
        for &value in values {
            match ranges.last_mut() {
                Some((_, upper)) if adjacent(*upper, value) => *upper = value,
                _ => ranges.push((value, value)),
            }
        }
        ValueRanges(ranges)
    }

    /// The index of the first range which ends at or after `value`.
    fn position(&self, value: i32) -> usize {
        self.0.partition_point(|&(_, upper)| upper < value)
    }

    pub(crate) fn contains(&self, value: i32) -> bool {
        self.0
            .get(self.position(value))
            .is_some_and(|&(lower, _)| lower <= value)
    }

    /// The smallest member which is at least `value`.
    pub(crate) fn at_or_above(&self, value: i32) -> Option<i32> {
        self.0
            .get(self.position(value))
            .map(|&(lower, _)| lower.max(value))
    }

    /// The largest member which is at most `value`.
    pub(crate) fn at_or_below(&self, value: i32) -> Option<i32> {
        let index = self.0.partition_point(|&(lower, _)| lower <= value);
        index
            .checked_sub(1)
            .map(|index| self.0[index].1.min(value))
    }

    /// The number of members in `[min, max]`.
    pub(crate) fn count_between(&self, min: i32, max: i32) -> usize {
        self.0
            .iter()
            .map(|&(lower, upper)| {
                let lower = i64::from(lower.max(min));
                let upper = i64::from(upper.min(max));
                (upper - lower + 1).max(0) as usize
            })
            .sum()
    }

    pub(crate) fn remove(&mut self, value: i32) {
        let index = self.position(value);
        let Some(&(lower, upper)) = self.0.get(index) else {
            return;
        };
        if value < lower {
            return;
        }

        match (lower == value, upper == value) {
            (true, true) => {
                let _ = self.0.remove(index);
            }
            (true, false) => self.0[index].0 = value + 1,
            (false, true) => self.0[index].1 = value - 1,
            (false, false) => {
                self.0[index].1 = value - 1;
                self.0.insert(index + 1, (value + 1, upper));
            }
        }
    }

    pub(crate) fn insert(&mut self, value: i32) {
        if self.contains(value) {
            return;
        }

        let index = self.position(value);
        let joins_previous = index > 0 && adjacent(self.0[index - 1].1, value);
        let joins_next = self
            .0
            .get(index)
            .is_some_and(|&(lower, _)| adjacent(value, lower));

        match (joins_previous, joins_next) {
            (true, true) => {
                let (_, upper) = self.0.remove(index);
                self.0[index - 1].1 = upper;
            }
            (true, false) => self.0[index - 1].1 = value,
            (false, true) => self.0[index].0 = value,
            (false, false) => self.0.insert(index, (value, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_values_form_one_range() {
        let ranges = ValueRanges::from_sorted(&[1, 2, 3, 7, 9, 10]);

        assert_eq!(ValueRanges(vec![(1, 3), (7, 7), (9, 10)]), ranges);
        assert_eq!(6, ranges.count_between(i32::MIN, i32::MAX));
        assert_eq!(3, ranges.count_between(3, 9));
    }

    #[test]
    fn neighbours_skip_the_holes() {
        let ranges = ValueRanges::from_sorted(&[1, 2, 3, 7, 9, 10]);

        assert_eq!(Some(7), ranges.at_or_above(4));
        assert_eq!(Some(2), ranges.at_or_above(2));
        assert_eq!(None, ranges.at_or_above(11));
        assert_eq!(Some(3), ranges.at_or_below(6));
        assert_eq!(Some(9), ranges.at_or_below(9));
        assert_eq!(None, ranges.at_or_below(0));
    }

    #[test]
    fn removing_splits_and_inserting_merges() {
        let mut ranges = ValueRanges::interval(0, 2_000_000);

        ranges.remove(500);
        ranges.remove(0);
        assert_eq!(ValueRanges(vec![(1, 499), (501, 2_000_000)]), ranges);
        assert!(!ranges.contains(500));

        ranges.insert(500);
        ranges.insert(0);
        assert_eq!(ValueRanges::interval(0, 2_000_000), ranges);
    }

    #[test]
    fn the_last_value_of_a_range_can_be_removed_and_restored() {
        let mut ranges = ValueRanges::from_sorted(&[4, 8]);

        ranges.remove(4);
        assert_eq!(ValueRanges(vec![(8, 8)]), ranges);
        ranges.insert(4);
        assert_eq!(ValueRanges::from_sorted(&[4, 8]), ranges);
        ranges.insert(5);
        assert_eq!(ValueRanges(vec![(4, 5), (8, 8)]), ranges);
    }
}
