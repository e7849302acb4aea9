use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::error::{AppError, AppResult};

/// A half-open time interval `[start, end)`.
///
/// Touching endpoints do not count as overlap, so two back-to-back
/// availability windows or bookings are always legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::UnprocessableEntity(format!(
                "interval must end after it starts ({start} >= {end})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    pub fn contains(&self, inner: &Interval) -> bool {
        contains(self.start, self.end, inner.start, inner.end)
    }

    /// Intersection with `bounds`, or `None` when it is empty.
    pub fn clip(&self, bounds: &Interval) -> Option<Interval> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        (start < end).then_some(Interval { start, end })
    }
}

pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

pub fn contains(
    outer_start: DateTime<Utc>,
    outer_end: DateTime<Utc>,
    inner_start: DateTime<Utc>,
    inner_end: DateTime<Utc>,
) -> bool {
    outer_start <= inner_start && inner_end <= outer_end
}

/// True when one of `windows` fully contains `inner`. A period that
/// merely overlaps a window, or spans two touching windows, is not
/// covered.
pub fn covered_by(windows: &[Interval], inner: &Interval) -> bool {
    windows.iter().any(|w| w.contains(inner))
}

/// Removes every cut that intersects `base` and yields the remaining
/// sub-intervals in ascending order.
///
/// Cuts may arrive unsorted; they are clipped to `base` and sorted by
/// start before subtraction, so any permutation of `cuts` produces the
/// same sequence. Zero-length remainders are dropped. The returned
/// iterator is lazy and can be restarted by cloning it.
pub fn subtract(base: Interval, cuts: &[Interval]) -> Subtraction {
    let mut cuts: Vec<Interval> = cuts.iter().filter_map(|c| c.clip(&base)).collect();
    cuts.sort_unstable_by_key(|c| c.start);
    Subtraction {
        cursor: base.start,
        end: base.end,
        cuts,
        idx: 0,
        exhausted: false,
    }
}

#[derive(Debug, Clone)]
pub struct Subtraction {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    cuts: Vec<Interval>,
    idx: usize,
    exhausted: bool,
}

impl Iterator for Subtraction {
    type Item = Interval;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        while self.idx < self.cuts.len() {
            let cut = self.cuts[self.idx];
            self.idx += 1;
            if self.cursor < cut.start {
                let gap = Interval {
                    start: self.cursor,
                    end: cut.start,
                };
                self.cursor = self.cursor.max(cut.end);
                return Some(gap);
            }
            self.cursor = self.cursor.max(cut.end);
        }
        self.exhausted = true;
        (self.cursor < self.end).then_some(Interval {
            start: self.cursor,
            end: self.end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, hour, min, 0).unwrap()
    }

    fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> Interval {
        Interval::new(at(sh, sm), at(eh, em)).unwrap()
    }

    #[test]
    fn interval_rejects_empty_and_reversed() {
        assert!(Interval::new(at(10, 0), at(10, 0)).is_err());
        assert!(Interval::new(at(11, 0), at(10, 0)).is_err());
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        assert!(!iv(9, 0, 10, 0).overlaps(&iv(10, 0, 11, 0)));
        assert!(iv(9, 0, 10, 1).overlaps(&iv(10, 0, 11, 0)));
    }

    #[test]
    fn containment_allows_equal_bounds() {
        let outer = iv(9, 0, 17, 0);
        assert!(outer.contains(&iv(9, 0, 17, 0)));
        assert!(outer.contains(&iv(10, 0, 11, 0)));
        assert!(!outer.contains(&iv(8, 59, 10, 0)));
        assert!(!outer.contains(&iv(16, 0, 17, 1)));
    }

    #[test]
    fn clip_to_disjoint_bounds_is_none() {
        assert_eq!(iv(9, 0, 10, 0).clip(&iv(10, 0, 11, 0)), None);
        assert_eq!(
            iv(9, 0, 12, 0).clip(&iv(10, 0, 11, 0)),
            Some(iv(10, 0, 11, 0))
        );
    }

    #[test]
    fn coverage_needs_a_single_containing_window() {
        let windows = [iv(9, 0, 12, 0), iv(13, 0, 17, 0)];
        assert!(covered_by(&windows, &iv(9, 0, 12, 0)));
        assert!(covered_by(&windows, &iv(14, 0, 15, 0)));
        // overlapping a window's edge is not containment
        assert!(!covered_by(&windows, &iv(11, 0, 12, 30)));
        // neither is bridging two separate windows
        assert!(!covered_by(&windows, &iv(11, 0, 14, 0)));
        assert!(!covered_by(&windows, &iv(7, 0, 8, 0)));
    }

    #[test]
    fn nothing_is_covered_without_windows() {
        assert!(!covered_by(&[], &iv(9, 0, 10, 0)));
    }

    #[test]
    fn adjacent_windows_do_not_merge_for_coverage() {
        // Back-to-back windows stay distinct; a period crossing the
        // shared endpoint is rejected even though every instant of it
        // lies inside some window.
        let windows = [iv(9, 0, 12, 0), iv(12, 0, 17, 0)];
        assert!(!covered_by(&windows, &iv(11, 0, 13, 0)));
        assert!(covered_by(&windows, &iv(12, 0, 13, 0)));
    }

    #[test]
    fn subtract_single_cut_splits_base() {
        let rest: Vec<_> = subtract(iv(9, 0, 17, 0), &[iv(10, 0, 11, 0)]).collect();
        assert_eq!(rest, vec![iv(9, 0, 10, 0), iv(11, 0, 17, 0)]);
    }

    #[test]
    fn subtract_ignores_cuts_outside_base() {
        let rest: Vec<_> = subtract(iv(9, 0, 17, 0), &[iv(7, 0, 8, 0), iv(18, 0, 19, 0)]).collect();
        assert_eq!(rest, vec![iv(9, 0, 17, 0)]);
    }

    #[test]
    fn subtract_clips_cuts_crossing_the_bounds() {
        let rest: Vec<_> = subtract(iv(9, 0, 17, 0), &[iv(8, 0, 9, 30), iv(16, 30, 18, 0)]).collect();
        assert_eq!(rest, vec![iv(9, 30, 16, 30)]);
    }

    #[test]
    fn subtract_drops_zero_length_remainders() {
        // Cuts chained edge to edge leave nothing in between.
        let rest: Vec<_> =
            subtract(iv(9, 0, 12, 0), &[iv(9, 0, 10, 0), iv(10, 0, 11, 0), iv(11, 0, 12, 0)])
                .collect();
        assert!(rest.is_empty());
    }

    #[test]
    fn subtract_handles_overlapping_cuts() {
        let rest: Vec<_> =
            subtract(iv(9, 0, 17, 0), &[iv(10, 0, 12, 0), iv(11, 0, 13, 0)]).collect();
        assert_eq!(rest, vec![iv(9, 0, 10, 0), iv(13, 0, 17, 0)]);
    }

    #[test]
    fn subtract_is_invariant_under_cut_permutations() {
        let base = iv(8, 0, 18, 0);
        let cuts = [iv(9, 0, 9, 45), iv(12, 0, 13, 0), iv(16, 30, 17, 0)];
        let expected: Vec<_> = subtract(base, &cuts).collect();
        let permutations: [[Interval; 3]; 5] = [
            [cuts[0], cuts[2], cuts[1]],
            [cuts[1], cuts[0], cuts[2]],
            [cuts[1], cuts[2], cuts[0]],
            [cuts[2], cuts[0], cuts[1]],
            [cuts[2], cuts[1], cuts[0]],
        ];
        for p in permutations {
            let got: Vec<_> = subtract(base, &p).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn subtraction_restarts_from_a_clone() {
        let it = subtract(iv(9, 0, 17, 0), &[iv(10, 0, 11, 0)]);
        let first: Vec<_> = it.clone().collect();
        let second: Vec<_> = it.collect();
        assert_eq!(first, second);
    }
}
