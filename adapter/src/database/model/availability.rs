use chrono::{DateTime, Utc};
use kernel::{
    interval::Interval,
    model::{
        availability::AvailabilityWindow,
        id::{AvailabilityId, OfficeId},
    },
};
use shared::error::{AppError, AppResult};

#[derive(sqlx::FromRow)]
pub struct AvailabilityRow {
    pub availability_id: AvailabilityId,
    pub office_id: OfficeId,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
}

impl TryFrom<AvailabilityRow> for AvailabilityWindow {
    type Error = AppError;

    fn try_from(value: AvailabilityRow) -> AppResult<Self> {
        let AvailabilityRow {
            availability_id,
            office_id,
            available_from,
            available_to,
        } = value;
        // The table carries a CHECK (available_to > available_from),
        // so this only fails on a corrupted row.
        let period = Interval::new(available_from, available_to).map_err(|_| {
            AppError::ConversionEntityError(format!(
                "availability window {availability_id} has an empty interval"
            ))
        })?;
        Ok(AvailabilityWindow {
            id: availability_id,
            office_id,
            period,
        })
    }
}
