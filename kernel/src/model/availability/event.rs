use crate::{
    interval::Interval,
    model::id::{AvailabilityId, OfficeId},
};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateAvailability {
    pub office_id: OfficeId,
    pub period: Interval,
}

/// Partial update; the merged interval is re-validated against the
/// no-overlap rule (excluding the window itself) before persisting.
#[derive(Debug, new)]
pub struct UpdateAvailability {
    pub office_id: OfficeId,
    pub availability_id: AvailabilityId,
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
}

#[derive(Debug, new)]
pub struct DeleteAvailability {
    pub office_id: OfficeId,
    pub availability_id: AvailabilityId,
}
