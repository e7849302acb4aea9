use crate::model::{
    actor::Actor,
    booking::{
        event::{BookingListFilter, CreateBooking, UpdateBooking, UpdateBookingStatus},
        Booking,
    },
    id::BookingId,
    list::PaginatedList,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Availability containment, conflict detection, visitor
    /// resolution and the insert run as one atomic unit; a concurrent
    /// create for the same interval surfaces as `ResourceConflict`.
    async fn create(&self, event: CreateBooking) -> AppResult<Booking>;
    /// Filtered page of bookings. Office-owner callers are restricted
    /// to the offices they own regardless of the requested filter.
    async fn find_all(
        &self,
        filter: BookingListFilter,
        actor: &Actor,
    ) -> AppResult<PaginatedList<Booking>>;
    /// Fails with `EntityNotFound` when the booking is absent or not
    /// visible to the caller, so existence never leaks.
    async fn find_by_id(&self, booking_id: BookingId, actor: &Actor) -> AppResult<Booking>;
    /// Non-status field update; staff or owning office-owner only.
    async fn update(&self, event: UpdateBooking, actor: &Actor) -> AppResult<Booking>;
    /// Resolves visibility, then defers to the booking state machine
    /// before persisting the new status.
    async fn update_status(&self, event: UpdateBookingStatus, actor: &Actor)
        -> AppResult<Booking>;
}
