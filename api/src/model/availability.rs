use chrono::{DateTime, Duration, Utc};
use garde::Validate;
use kernel::{
    interval::Interval,
    model::{
        availability::{
            event::{CreateAvailability, UpdateAvailability},
            AvailabilityWindow,
        },
        id::{AvailabilityId, OfficeId},
    },
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

pub const DEFAULT_SLOT_MINUTES: i64 = 60;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityRequest {
    #[garde(skip)]
    pub available_from: DateTime<Utc>,
    #[garde(skip)]
    pub available_to: DateTime<Utc>,
}

impl CreateAvailabilityRequest {
    pub fn into_event(self, office_id: OfficeId) -> AppResult<CreateAvailability> {
        let period = Interval::new(self.available_from, self.available_to)?;
        Ok(CreateAvailability::new(office_id, period))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityRequest {
    #[garde(skip)]
    pub available_from: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub available_to: Option<DateTime<Utc>>,
}

impl UpdateAvailabilityRequest {
    pub fn into_event(
        self,
        office_id: OfficeId,
        availability_id: AvailabilityId,
    ) -> UpdateAvailability {
        let UpdateAvailabilityRequest {
            available_from,
            available_to,
        } = self;
        UpdateAvailability {
            office_id,
            availability_id,
            available_from,
            available_to,
        }
    }
}

/// Optional range filter for window listing; both bounds or neither.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRangeQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl AvailabilityRangeQuery {
    pub fn range(&self) -> AppResult<Option<Interval>> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Interval::new(start, end).map(Some),
            (None, None) => Ok(None),
            _ => Err(AppError::UnprocessableEntity(
                "startDate and endDate must be provided together".into(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Minimum slot length in minutes.
    pub duration: Option<i64>,
}

impl SlotQuery {
    pub fn range(&self) -> AppResult<Interval> {
        Interval::new(self.start_date, self.end_date)
    }

    pub fn min_duration(&self) -> AppResult<Duration> {
        let minutes = self.duration.unwrap_or(DEFAULT_SLOT_MINUTES);
        if minutes < 1 {
            return Err(AppError::UnprocessableEntity(
                "duration must be at least one minute".into(),
            ));
        }
        Ok(Duration::minutes(minutes))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub id: AvailabilityId,
    pub office_id: OfficeId,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
}

impl From<AvailabilityWindow> for AvailabilityResponse {
    fn from(value: AvailabilityWindow) -> Self {
        let AvailabilityWindow {
            id,
            office_id,
            period,
        } = value;
        Self {
            id,
            office_id,
            available_from: period.start,
            available_to: period.end,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotResponse {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl From<Interval> for SlotResponse {
    fn from(value: Interval) -> Self {
        Self {
            start_at: value.start,
            end_at: value.end,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub slots: Vec<SlotResponse>,
}

impl From<Vec<Interval>> for SlotsResponse {
    fn from(value: Vec<Interval>) -> Self {
        Self {
            slots: value.into_iter().map(SlotResponse::from).collect(),
        }
    }
}
