//! Bounded sliding window of history points.

use std::collections::VecDeque;

use demeter_types::{HistoryPoint, Metric};

/// Number of points kept when no capacity is configured (one week of daily averages).
pub const DEFAULT_HISTORY_CAPACITY: usize = 7;

/// Ordered, capacity-bounded sequence of history points, oldest first.
///
/// Pushing into a full window evicts the oldest point.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWindow {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryWindow {
    /// Create an empty window. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point, returning the evicted oldest point if the window was full.
    pub fn push(&mut self, point: HistoryPoint) -> Option<HistoryPoint> {
        let evicted = if self.points.len() == self.capacity {
            self.points.pop_front()
        } else {
            None
        };
        self.points.push_back(point);
        evicted
    }

    /// Replace the contents, keeping only the most recent `capacity` points.
    pub fn replace(&mut self, points: Vec<HistoryPoint>) {
        let skip = points.len().saturating_sub(self.capacity);
        self.points.clear();
        self.points.extend(points.into_iter().skip(skip));
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    /// The most recent point.
    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    /// Chart coordinates for one metric: `(index, value)` with non-finite
    /// values skipped.
    pub fn series(&self, metric: Metric) -> Vec<(f64, f64)> {
        series_of(self.points.iter(), metric)
    }

    /// Axis labels in window order.
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }
}

/// Chart coordinates for one metric of an arbitrary point sequence.
///
/// The x coordinate is the point's position, so gaps stay visible when a
/// value is skipped.
pub fn series_of<'a>(
    points: impl IntoIterator<Item = &'a HistoryPoint>,
    metric: Metric,
) -> Vec<(f64, f64)> {
    points
        .into_iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let v = p.value(metric);
            v.is_finite().then_some((i as f64, v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::sample_point;

    fn day(n: usize) -> HistoryPoint {
        sample_point(&format!("Day {n}"), 20.0 + n as f64, 6.0, 1.2)
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut window = HistoryWindow::new(3);
        assert_eq!(window.push(day(1)), None);
        assert_eq!(window.push(day(2)), None);
        assert_eq!(window.push(day(3)), None);
        let evicted = window.push(day(4)).unwrap();
        assert_eq!(evicted.label, "Day 1");
        assert_eq!(window.labels(), vec!["Day 2", "Day 3", "Day 4"]);
        assert_eq!(window.latest().unwrap().label, "Day 4");
    }

    #[test]
    fn test_replace_keeps_most_recent() {
        let mut window = HistoryWindow::new(7);
        window.push(day(0));
        window.replace((1..=10).map(day).collect());
        assert_eq!(window.len(), 7);
        assert_eq!(window.labels().first(), Some(&"Day 4"));
        assert_eq!(window.labels().last(), Some(&"Day 10"));
    }

    #[test]
    fn test_replace_with_fewer_points() {
        let mut window = HistoryWindow::new(7);
        window.replace((1..=3).map(day).collect());
        assert_eq!(window.len(), 3);
        window.replace(Vec::new());
        assert!(window.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut window = HistoryWindow::new(0);
        assert_eq!(window.capacity(), 1);
        window.push(day(1));
        window.push(day(2));
        assert_eq!(window.labels(), vec!["Day 2"]);
    }

    #[test]
    fn test_series_skips_missing_values() {
        let mut window = HistoryWindow::default();
        window.push(sample_point("a", 21.0, f64::NAN, 1.0));
        window.push(sample_point("b", f64::NAN, 6.2, 1.1));
        window.push(sample_point("c", 23.0, 6.4, f64::INFINITY));

        assert_eq!(window.series(Metric::Temperature), vec![(0.0, 21.0), (2.0, 23.0)]);
        assert_eq!(window.series(Metric::Ph), vec![(1.0, 6.2), (2.0, 6.4)]);
        assert_eq!(window.series(Metric::Ec), vec![(0.0, 1.0), (1.0, 1.1)]);
    }

    #[test]
    fn test_empty_series() {
        let window = HistoryWindow::default();
        assert!(window.series(Metric::Ph).is_empty());
        assert!(window.latest().is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::mock::sample_point;
    use proptest::prelude::*;

    proptest! {
        /// The window never grows past its capacity and always holds the newest points.
        #[test]
        fn push_never_exceeds_capacity(capacity in 1usize..16, pushes in 0usize..64) {
            let mut window = HistoryWindow::new(capacity);
            for i in 0..pushes {
                window.push(sample_point(&i.to_string(), i as f64, 6.0, 1.0));
                prop_assert!(window.len() <= capacity);
            }

            let expected: Vec<String> = (pushes.saturating_sub(capacity)..pushes)
                .map(|i| i.to_string())
                .collect();
            let actual: Vec<String> = window.iter().map(|p| p.label.clone()).collect();
            prop_assert_eq!(actual, expected);
        }

        /// Replacing keeps the tail of the input, in order.
        #[test]
        fn replace_keeps_tail(capacity in 1usize..16, len in 0usize..64) {
            let mut window = HistoryWindow::new(capacity);
            let points: Vec<_> = (0..len)
                .map(|i| sample_point(&i.to_string(), i as f64, 6.0, 1.0))
                .collect();
            window.replace(points.clone());

            prop_assert_eq!(window.len(), len.min(capacity));
            let tail = &points[len.saturating_sub(capacity)..];
            prop_assert!(window.iter().eq(tail.iter()));
        }
    }
}
