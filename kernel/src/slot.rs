use crate::interval::{subtract, Interval};
use chrono::Duration;

/// Derives the free bookable slots from a snapshot of availability
/// windows and active bookings.
///
/// Each window is clipped to the query range and the intersecting
/// bookings are subtracted from it; remainders shorter than
/// `min_duration` are dropped. Windows of one office never overlap,
/// so the per-window remainders only need concatenation and a sort by
/// start. Pure: same snapshot in, same slots out.
pub fn free_slots(
    windows: &[Interval],
    bookings: &[Interval],
    range: Interval,
    min_duration: Duration,
) -> Vec<Interval> {
    let mut slots: Vec<Interval> = windows
        .iter()
        .filter_map(|w| w.clip(&range))
        .flat_map(|w| subtract(w, bookings).filter(|s| s.duration() >= min_duration))
        .collect();
    slots.sort_unstable_by_key(|s| s.start);
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, hour, min, 0).unwrap()
    }

    fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> Interval {
        Interval::new(at(sh, sm), at(eh, em)).unwrap()
    }

    #[test]
    fn one_booking_splits_the_day() {
        // Window 09:00-17:00, confirmed booking 10:00-11:00, min 30min.
        let slots = free_slots(
            &[iv(9, 0, 17, 0)],
            &[iv(10, 0, 11, 0)],
            iv(0, 0, 23, 59),
            Duration::minutes(30),
        );
        assert_eq!(slots, vec![iv(9, 0, 10, 0), iv(11, 0, 17, 0)]);
    }

    #[test]
    fn no_windows_means_no_slots() {
        let slots = free_slots(&[], &[], iv(0, 0, 23, 59), Duration::minutes(30));
        assert!(slots.is_empty());
    }

    #[test]
    fn short_remainders_are_dropped() {
        // The 15 minute gap before the booking is below the minimum.
        let slots = free_slots(
            &[iv(9, 0, 12, 0)],
            &[iv(9, 15, 11, 0)],
            iv(0, 0, 23, 59),
            Duration::minutes(30),
        );
        assert_eq!(slots, vec![iv(11, 0, 12, 0)]);
    }

    #[test]
    fn windows_are_clipped_to_the_query_range() {
        let slots = free_slots(
            &[iv(8, 0, 18, 0)],
            &[],
            iv(9, 0, 12, 0),
            Duration::minutes(30),
        );
        assert_eq!(slots, vec![iv(9, 0, 12, 0)]);
    }

    #[test]
    fn slots_across_windows_come_out_ordered() {
        let slots = free_slots(
            &[iv(14, 0, 16, 0), iv(9, 0, 11, 0)],
            &[iv(10, 0, 10, 30)],
            iv(0, 0, 23, 59),
            Duration::minutes(30),
        );
        assert_eq!(
            slots,
            vec![iv(9, 0, 10, 0), iv(10, 30, 11, 0), iv(14, 0, 16, 0)]
        );
    }

    #[test]
    fn fully_booked_window_yields_nothing() {
        let slots = free_slots(
            &[iv(9, 0, 11, 0)],
            &[iv(9, 0, 11, 0)],
            iv(0, 0, 23, 59),
            Duration::minutes(30),
        );
        assert!(slots.is_empty());
    }
}
