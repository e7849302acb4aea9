use crate::{
    interval::Interval,
    model::{
        actor::Actor,
        id::{BookingId, OfficeId, UserId, VisitorId},
    },
    permission::{can_act, Capability},
};
use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};
use strum::{Display, EnumString};

pub mod event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Requested,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Active bookings count for overlap/conflict checks.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Requested | BookingStatus::Confirmed)
    }
}

#[derive(Debug)]
pub struct Booking {
    pub id: BookingId,
    pub office: BookingOffice,
    pub period: Interval,
    pub status: BookingStatus,
    pub title: Option<String>,
    pub description: Option<String>,
    pub needs_support: bool,
    pub notes: Option<String>,
    pub visitor: Option<BookingVisitor>,
    // Snapshot of the visitor's contact data, kept readable even if
    // the linked visitor record is later altered.
    pub visitor_name: Option<String>,
    pub visitor_email: Option<String>,
    pub visitor_whatsapp: Option<String>,
    /// Absent for anonymous/public creation.
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct BookingOffice {
    pub office_id: OfficeId,
    pub number: String,
    pub company_name: String,
}

#[derive(Debug)]
pub struct BookingVisitor {
    pub visitor_id: VisitorId,
    pub name: String,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
}

impl Booking {
    /// True when `email` matches the snapshot email or the linked
    /// visitor's email, case-insensitively.
    pub fn matches_visitor_email(&self, email: &str) -> bool {
        let matches = |e: Option<&str>| e.is_some_and(|x| x.eq_ignore_ascii_case(email));
        matches(self.visitor_email.as_deref())
            || self
                .visitor
                .as_ref()
                .is_some_and(|v| matches(v.email.as_deref()))
    }

    /// The booking state machine. Checks that moving to `next` is in
    /// the transition table and that `actor` may trigger it.
    ///
    /// Moving to the current status is an idempotent no-op. A legal
    /// transition by an unauthorized actor fails with `Forbidden`; a
    /// transition outside the table fails with
    /// `InvalidStatusTransition` regardless of the actor.
    pub fn check_transition(
        &self,
        next: BookingStatus,
        actor: &Actor,
        office_owner_ids: &[UserId],
    ) -> AppResult<()> {
        use BookingStatus::*;

        let current = self.status;
        if current == next {
            return Ok(());
        }

        let legal = matches!(
            (current, next),
            (Requested, Confirmed)
                | (Requested | Confirmed, Cancelled)
                | (Requested | Confirmed, Completed)
        );
        if !legal {
            return Err(AppError::InvalidStatusTransition(format!(
                "a {current} booking cannot move to {next}"
            )));
        }

        let allowed = match next {
            Confirmed => can_act(
                actor.role,
                actor.user_id,
                office_owner_ids,
                Capability::BookingConfirm,
            ),
            Cancelled => {
                can_act(
                    actor.role,
                    actor.user_id,
                    office_owner_ids,
                    Capability::BookingCancel,
                ) || actor
                    .visitor_email
                    .as_deref()
                    .is_some_and(|e| self.matches_visitor_email(e))
            }
            Completed => can_act(
                actor.role,
                actor.user_id,
                office_owner_ids,
                Capability::BookingComplete,
            ),
            Requested => unreachable!(),
        };
        if allowed {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "you are not allowed to mark this booking as {next}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use chrono::TimeZone;

    fn sample_booking(status: BookingStatus) -> Booking {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 3, 11, 0, 0).unwrap();
        Booking {
            id: BookingId::new(),
            office: BookingOffice {
                office_id: OfficeId::new(),
                number: "101".into(),
                company_name: "Acme".into(),
            },
            period: Interval::new(start, end).unwrap(),
            status,
            title: None,
            description: None,
            needs_support: false,
            notes: None,
            visitor: None,
            visitor_name: Some("Ana".into()),
            visitor_email: Some("ana@example.com".into()),
            visitor_whatsapp: None,
            created_by: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn attendant_confirms_a_requested_booking() {
        let booking = sample_booking(BookingStatus::Requested);
        let actor = Actor::registered(Role::Attendant, UserId::new());
        assert!(booking
            .check_transition(BookingStatus::Confirmed, &actor, &[])
            .is_ok());
    }

    #[test]
    fn owning_office_owner_confirms_but_cannot_complete() {
        let booking = sample_booking(BookingStatus::Requested);
        let owner = UserId::new();
        let actor = Actor::registered(Role::OfficeOwner, owner);
        let owners = vec![owner];
        assert!(booking
            .check_transition(BookingStatus::Confirmed, &actor, &owners)
            .is_ok());
        assert!(matches!(
            booking.check_transition(BookingStatus::Completed, &actor, &owners),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn non_owning_office_owner_is_forbidden() {
        let booking = sample_booking(BookingStatus::Requested);
        let actor = Actor::registered(Role::OfficeOwner, UserId::new());
        assert!(matches!(
            booking.check_transition(BookingStatus::Confirmed, &actor, &[UserId::new()]),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn anonymous_caller_cannot_confirm() {
        let booking = sample_booking(BookingStatus::Requested);
        let actor = Actor::anonymous(Some("ana@example.com".into()));
        assert!(matches!(
            booking.check_transition(BookingStatus::Confirmed, &actor, &[]),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn visitor_cancels_own_booking_by_email() {
        let booking = sample_booking(BookingStatus::Confirmed);
        let own = Actor::anonymous(Some("ANA@example.com".into()));
        assert!(booking
            .check_transition(BookingStatus::Cancelled, &own, &[])
            .is_ok());

        let other = Actor::anonymous(Some("bob@example.com".into()));
        assert!(matches!(
            booking.check_transition(BookingStatus::Cancelled, &other, &[]),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        let actor = Actor::registered(Role::Admin, UserId::new());
        let completed = sample_booking(BookingStatus::Completed);
        assert!(matches!(
            completed.check_transition(BookingStatus::Requested, &actor, &[]),
            Err(AppError::InvalidStatusTransition(_))
        ));
        let cancelled = sample_booking(BookingStatus::Cancelled);
        assert!(matches!(
            cancelled.check_transition(BookingStatus::Confirmed, &actor, &[]),
            Err(AppError::InvalidStatusTransition(_))
        ));
    }

    #[test]
    fn same_state_transition_is_a_no_op() {
        let booking = sample_booking(BookingStatus::Cancelled);
        let actor = Actor::anonymous(None);
        assert!(booking
            .check_transition(BookingStatus::Cancelled, &actor, &[])
            .is_ok());
    }

    #[test]
    fn requested_to_completed_is_staff_only() {
        let booking = sample_booking(BookingStatus::Requested);
        let attendant = Actor::registered(Role::Attendant, UserId::new());
        assert!(booking
            .check_transition(BookingStatus::Completed, &attendant, &[])
            .is_ok());
        let visitor = Actor::anonymous(Some("ana@example.com".into()));
        assert!(matches!(
            booking.check_transition(BookingStatus::Completed, &visitor, &[]),
            Err(AppError::Forbidden(_))
        ));
    }
}
