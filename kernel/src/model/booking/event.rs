use crate::{
    interval::Interval,
    model::{
        booking::BookingStatus,
        id::{BookingId, OfficeId, UserId, VisitorId},
        list::ListOptions,
        visitor::event::CreateVisitor,
    },
};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(Debug)]
pub struct CreateBooking {
    pub office_id: OfficeId,
    pub period: Interval,
    pub title: Option<String>,
    pub description: Option<String>,
    pub needs_support: bool,
    pub notes: Option<String>,
    /// Reference to an already persisted visitor.
    pub visitor_id: Option<VisitorId>,
    /// Inline visitor data; reused by email match or persisted fresh.
    pub visitor: Option<CreateVisitor>,
    pub visitor_name: Option<String>,
    pub visitor_email: Option<String>,
    pub visitor_whatsapp: Option<String>,
    pub created_by: Option<UserId>,
}

impl CreateBooking {
    /// A booking must carry a visitor reference, inline visitor data,
    /// or at least a contact snapshot.
    pub fn has_visitor_reference(&self) -> bool {
        self.visitor_id.is_some()
            || self.visitor.is_some()
            || (self.visitor_name.is_some()
                && (self.visitor_email.is_some() || self.visitor_whatsapp.is_some()))
    }
}

#[derive(Debug)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub needs_support: Option<bool>,
    pub notes: Option<String>,
    pub visitor_name: Option<String>,
    pub visitor_email: Option<String>,
    pub visitor_whatsapp: Option<String>,
}

#[derive(Debug, new)]
pub struct UpdateBookingStatus {
    pub booking_id: BookingId,
    pub status: BookingStatus,
}

/// Closed, typed filter for booking listing; validated at the API
/// boundary.
#[derive(Debug, Default)]
pub struct BookingListFilter {
    pub office_id: Option<OfficeId>,
    pub status: Option<BookingStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Case-insensitive substring over snapshot and linked emails.
    pub visitor_email: Option<String>,
    pub list: ListOptions,
}
