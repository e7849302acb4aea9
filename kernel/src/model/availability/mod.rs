use crate::{
    interval::Interval,
    model::id::{AvailabilityId, OfficeId},
};

pub mod event;

/// An office-scoped time interval during which bookings may be
/// placed. Windows of one office never overlap each other.
#[derive(Debug, Clone)]
pub struct AvailabilityWindow {
    pub id: AvailabilityId,
    pub office_id: OfficeId,
    pub period: Interval,
}
