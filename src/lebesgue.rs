//! Lebesgue measure on the real line, over finite unions of intervals.

use std::fmt;

use crate::ennreal::ENNReal;
use crate::error::MeasureError;
use crate::space::MeasureSpace;

/// A finite union of half-open intervals `[a, b)`.
///
/// Stored normalized: intervals are nonempty, sorted, pairwise disjoint and
/// non-adjacent, so structural equality is set equality. Endpoints may be
/// `±∞`.
#[derive(Clone, PartialEq, Default)]
pub struct IntervalSet {
    intervals: Vec<(f64, f64)>,
}

impl IntervalSet {
    /// Normalize an arbitrary list of intervals. Empty, reversed and NaN
    /// intervals are dropped.
    pub fn new(intervals: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut raw: Vec<(f64, f64)> = intervals
            .into_iter()
            .filter(|(a, b)| a < b)
            .collect();
        raw.sort_by(|x, y| x.0.total_cmp(&y.0));

        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(raw.len());
        for (a, b) in raw {
            match merged.last_mut() {
                Some(last) if a <= last.1 => last.1 = last.1.max(b),
                _ => merged.push((a, b)),
            }
        }
        Self { intervals: merged }
    }

    /// `∅`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `ℝ`.
    pub fn real_line() -> Self {
        Self {
            intervals: vec![(f64::NEG_INFINITY, f64::INFINITY)],
        }
    }

    /// `[start, end)`.
    pub fn interval(start: f64, end: f64) -> Self {
        Self::new([(start, end)])
    }

    /// `[start, end)`, rejecting reversed, NaN or infinite endpoints.
    pub fn bounded(start: f64, end: f64) -> Result<Self, MeasureError> {
        if !(start.is_finite() && end.is_finite() && start <= end) {
            return Err(MeasureError::InvalidInterval { start, end });
        }
        Ok(Self::interval(start, end))
    }

    /// The normalized intervals.
    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.intervals
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total length, `∞` if unbounded.
    pub fn length(&self) -> ENNReal {
        self.intervals
            .iter()
            .map(|(a, b)| ENNReal::new(b - a).unwrap_or(ENNReal::INFINITY))
            .sum()
    }

    /// Returns `true` if `x` lies in the set.
    pub fn contains(&self, x: f64) -> bool {
        // Intervals are sorted by start: find the last one starting at or before x.
        let idx = self.intervals.partition_point(|(a, _)| *a <= x);
        idx > 0 && x < self.intervals[idx - 1].1
    }

    /// `self ∪ other`.
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.intervals.iter().chain(&other.intervals).copied())
    }

    /// `self ∩ other`.
    pub fn inter(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.intervals.len() && j < other.intervals.len() {
            let (a1, b1) = self.intervals[i];
            let (a2, b2) = other.intervals[j];
            let start = a1.max(a2);
            let end = b1.min(b2);
            if start < end {
                out.push((start, end));
            }
            if b1 < b2 {
                i += 1;
            } else {
                j += 1;
            }
        }
        Self { intervals: out }
    }

    /// `ℝ \ self`.
    pub fn complement(&self) -> Self {
        let mut out = Vec::with_capacity(self.intervals.len() + 1);
        let mut cursor = f64::NEG_INFINITY;
        for &(a, b) in &self.intervals {
            if cursor < a {
                out.push((cursor, a));
            }
            cursor = b;
        }
        if cursor < f64::INFINITY {
            out.push((cursor, f64::INFINITY));
        }
        Self { intervals: out }
    }

    /// `self \ other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.inter(&other.complement())
    }
}

impl fmt::Debug for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.intervals.is_empty() {
            return write!(f, "∅");
        }
        for (i, (a, b)) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, " ∪ ")?;
            }
            write!(f, "[{a}, {b})")?;
        }
        Ok(())
    }
}

/// Lebesgue measure on `ℝ`. Every [`IntervalSet`] is measurable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lebesgue;

impl MeasureSpace for Lebesgue {
    type Point = f64;
    type Set = IntervalSet;

    fn empty(&self) -> IntervalSet {
        IntervalSet::empty()
    }

    fn univ(&self) -> IntervalSet {
        IntervalSet::real_line()
    }

    fn union(&self, a: &IntervalSet, b: &IntervalSet) -> IntervalSet {
        a.union(b)
    }

    fn inter(&self, a: &IntervalSet, b: &IntervalSet) -> IntervalSet {
        a.inter(b)
    }

    fn diff(&self, a: &IntervalSet, b: &IntervalSet) -> IntervalSet {
        a.difference(b)
    }

    fn compl(&self, set: &IntervalSet) -> IntervalSet {
        set.complement()
    }

    fn is_empty(&self, set: &IntervalSet) -> bool {
        set.is_empty()
    }

    fn contains(&self, set: &IntervalSet, point: &f64) -> bool {
        set.contains(*point)
    }

    fn is_measurable(&self, _set: &IntervalSet) -> bool {
        true
    }

    fn measure(&self, set: &IntervalSet) -> ENNReal {
        set.length()
    }
}
