use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::{
    interval::Interval,
    model::{
        actor::Actor,
        booking::{
            event::{BookingListFilter, CreateBooking, UpdateBooking},
            Booking, BookingOffice, BookingStatus, BookingVisitor,
        },
        id::{BookingId, OfficeId, UserId, VisitorId},
        visitor::event::CreateVisitor,
    },
};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;

use super::build_list_options;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatusName {
    Requested,
    Confirmed,
    Cancelled,
    Completed,
}

impl From<BookingStatusName> for BookingStatus {
    fn from(value: BookingStatusName) -> Self {
        match value {
            BookingStatusName::Requested => BookingStatus::Requested,
            BookingStatusName::Confirmed => BookingStatus::Confirmed,
            BookingStatusName::Cancelled => BookingStatus::Cancelled,
            BookingStatusName::Completed => BookingStatus::Completed,
        }
    }
}

impl From<BookingStatus> for BookingStatusName {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Requested => BookingStatusName::Requested,
            BookingStatus::Confirmed => BookingStatusName::Confirmed,
            BookingStatus::Cancelled => BookingStatusName::Cancelled,
            BookingStatus::Completed => BookingStatusName::Completed,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitorRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(inner(email))]
    pub email: Option<String>,
    #[garde(skip)]
    pub whatsapp: Option<String>,
}

impl From<CreateVisitorRequest> for CreateVisitor {
    fn from(value: CreateVisitorRequest) -> Self {
        let CreateVisitorRequest {
            name,
            email,
            whatsapp,
        } = value;
        Self {
            name,
            email,
            whatsapp,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub office_id: OfficeId,
    #[garde(skip)]
    pub start_at: DateTime<Utc>,
    #[garde(skip)]
    pub end_at: DateTime<Utc>,
    #[garde(inner(length(min = 1, max = 200)))]
    pub title: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    #[serde(default)]
    pub needs_support: bool,
    #[garde(skip)]
    pub notes: Option<String>,
    #[garde(skip)]
    pub visitor_id: Option<VisitorId>,
    #[garde(dive)]
    pub visitor: Option<CreateVisitorRequest>,
    #[garde(inner(length(min = 1)))]
    pub visitor_name: Option<String>,
    #[garde(inner(email))]
    pub visitor_email: Option<String>,
    #[garde(skip)]
    pub visitor_whatsapp: Option<String>,
}

impl CreateBookingRequest {
    pub fn into_event(self, created_by: Option<UserId>) -> AppResult<CreateBooking> {
        let period = Interval::new(self.start_at, self.end_at)?;
        Ok(CreateBooking {
            office_id: self.office_id,
            period,
            title: self.title,
            description: self.description,
            needs_support: self.needs_support,
            notes: self.notes,
            visitor_id: self.visitor_id,
            visitor: self.visitor.map(CreateVisitor::from),
            visitor_name: self.visitor_name,
            visitor_email: self.visitor_email,
            visitor_whatsapp: self.visitor_whatsapp,
            created_by,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[garde(skip)]
    pub status: Option<BookingStatusName>,
    #[garde(inner(length(min = 1, max = 200)))]
    pub title: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub needs_support: Option<bool>,
    #[garde(skip)]
    pub notes: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub visitor_name: Option<String>,
    #[garde(inner(email))]
    pub visitor_email: Option<String>,
    #[garde(skip)]
    pub visitor_whatsapp: Option<String>,
}

impl UpdateBookingRequest {
    pub fn into_event(self, booking_id: BookingId) -> UpdateBooking {
        // The status change rides along in the request but runs
        // through the state machine, not the field update.
        let UpdateBookingRequest {
            status: _,
            title,
            description,
            needs_support,
            notes,
            visitor_name,
            visitor_email,
            visitor_whatsapp,
        } = self;
        UpdateBooking {
            booking_id,
            title,
            description,
            needs_support,
            notes,
            visitor_name,
            visitor_email,
            visitor_whatsapp,
        }
    }
}

/// Visitors acting anonymously identify themselves by email.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorEmailQuery {
    pub visitor_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub office_id: Option<OfficeId>,
    pub status: Option<BookingStatusName>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub visitor_email: Option<String>,
}

impl BookingListQuery {
    pub fn into_filter(self) -> AppResult<BookingListFilter> {
        let list = build_list_options(self.page, self.limit)?;
        Ok(BookingListFilter {
            office_id: self.office_id,
            status: self.status.map(BookingStatus::from),
            start_date: self.start_date,
            end_date: self.end_date,
            visitor_email: self.visitor_email,
            list,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    pub office: BookingOfficeResponse,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: BookingStatusName,
    pub title: Option<String>,
    pub description: Option<String>,
    pub needs_support: bool,
    pub notes: Option<String>,
    pub visitor: Option<BookingVisitorResponse>,
    pub visitor_name: Option<String>,
    pub visitor_email: Option<String>,
    pub visitor_whatsapp: Option<String>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            id,
            office,
            period,
            status,
            title,
            description,
            needs_support,
            notes,
            visitor,
            visitor_name,
            visitor_email,
            visitor_whatsapp,
            created_by,
            created_at,
            updated_at,
        } = value;
        Self {
            id,
            office: office.into(),
            start_at: period.start,
            end_at: period.end,
            status: status.into(),
            title,
            description,
            needs_support,
            notes,
            visitor: visitor.map(BookingVisitorResponse::from),
            visitor_name,
            visitor_email,
            visitor_whatsapp,
            created_by,
            created_at,
            updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOfficeResponse {
    pub office_id: OfficeId,
    pub number: String,
    pub company_name: String,
}

impl From<BookingOffice> for BookingOfficeResponse {
    fn from(value: BookingOffice) -> Self {
        let BookingOffice {
            office_id,
            number,
            company_name,
        } = value;
        Self {
            office_id,
            number,
            company_name,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingVisitorResponse {
    pub visitor_id: VisitorId,
    pub name: String,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
}

impl From<BookingVisitor> for BookingVisitorResponse {
    fn from(value: BookingVisitor) -> Self {
        let BookingVisitor {
            visitor_id,
            name,
            email,
            whatsapp,
        } = value;
        Self {
            visitor_id,
            name,
            email,
            whatsapp,
        }
    }
}

/// Projection stripped of visitor contact data and notes, served to
/// callers who are not staff, not an owner of the office and not the
/// booking's visitor.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBookingResponse {
    pub id: BookingId,
    pub office: BookingOfficeResponse,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: BookingStatusName,
}

impl From<Booking> for PublicBookingResponse {
    fn from(value: Booking) -> Self {
        Self {
            id: value.id,
            start_at: value.period.start,
            end_at: value.period.end,
            status: value.status.into(),
            office: value.office.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum BookingView {
    Full(BookingResponse),
    Public(PublicBookingResponse),
}

impl BookingView {
    pub fn for_actor(booking: Booking, actor: &Actor) -> Self {
        let own = actor
            .visitor_email
            .as_deref()
            .is_some_and(|e| booking.matches_visitor_email(e));
        if !actor.is_anonymous() || own {
            Self::Full(booking.into())
        } else {
            Self::Public(booking.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kernel::model::role::Role;

    fn sample_booking() -> Booking {
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
            status: BookingStatus::Requested,
            title: Some("kickoff".into()),
            description: None,
            needs_support: false,
            notes: Some("bring badge".into()),
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
    fn staff_sees_the_full_booking() {
        let actor = Actor::registered(Role::Attendant, UserId::new());
        let view = BookingView::for_actor(sample_booking(), &actor);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["visitorEmail"], "ana@example.com");
        assert_eq!(value["notes"], "bring badge");
    }

    #[test]
    fn anonymous_caller_gets_the_reduced_projection() {
        let actor = Actor::anonymous(None);
        let view = BookingView::for_actor(sample_booking(), &actor);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["status"], "REQUESTED");
        assert!(value.get("visitorEmail").is_none());
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn matching_visitor_email_sees_the_full_booking() {
        let actor = Actor::anonymous(Some("ANA@example.com".into()));
        let view = BookingView::for_actor(sample_booking(), &actor);
        assert!(matches!(view, BookingView::Full(_)));
    }

    #[test]
    fn update_request_carries_an_optional_status() {
        let req: UpdateBookingRequest = serde_json::from_value(serde_json::json!({
            "title": "moved",
            "status": "CONFIRMED"
        }))
        .unwrap();
        assert!(matches!(req.status, Some(BookingStatusName::Confirmed)));
        let update = req.into_event(BookingId::new());
        assert_eq!(update.title.as_deref(), Some("moved"));

        let bare: UpdateBookingRequest =
            serde_json::from_value(serde_json::json!({ "notes": "call ahead" })).unwrap();
        assert!(bare.status.is_none());
    }

    #[test]
    fn status_names_serialize_screaming_snake() {
        let value = serde_json::to_value(BookingStatusName::Cancelled).unwrap();
        assert_eq!(value, "CANCELLED");
        let parsed: BookingStatusName = serde_json::from_value(value).unwrap();
        assert!(matches!(BookingStatus::from(parsed), BookingStatus::Cancelled));
    }
}
