use crate::{
    interval::Interval,
    model::{
        actor::Actor,
        availability::{
            event::{CreateAvailability, DeleteAvailability, UpdateAvailability},
            AvailabilityWindow,
        },
        id::OfficeId,
    },
};
use async_trait::async_trait;
use chrono::Duration;
use shared::error::AppResult;

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Persists a new window after the office/ownership/overlap
    /// checks; the check-then-insert runs as one atomic unit.
    async fn create(&self, event: CreateAvailability, actor: &Actor)
        -> AppResult<AvailabilityWindow>;
    /// Windows of the office intersecting `range` (all of them when
    /// `None`), ordered by start ascending. Public.
    async fn find_all(
        &self,
        office_id: OfficeId,
        range: Option<Interval>,
    ) -> AppResult<Vec<AvailabilityWindow>>;
    /// Re-validates the merged interval against the no-overlap rule
    /// (excluding the window itself) before persisting.
    async fn update(&self, event: UpdateAvailability, actor: &Actor)
        -> AppResult<AvailabilityWindow>;
    /// Hard-deletes the window unless an active booking is contained
    /// in it.
    async fn delete(&self, event: DeleteAvailability, actor: &Actor) -> AppResult<()>;
    /// Free sub-intervals of the office's windows over `range`, at
    /// least `min_duration` long.
    async fn find_available_slots(
        &self,
        office_id: OfficeId,
        range: Interval,
        min_duration: Duration,
    ) -> AppResult<Vec<Interval>>;
}
