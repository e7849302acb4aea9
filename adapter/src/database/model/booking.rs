use chrono::{DateTime, Utc};
use kernel::{
    interval::Interval,
    model::{
        booking::{Booking, BookingOffice, BookingStatus, BookingVisitor},
        id::{BookingId, OfficeId, UserId, VisitorId},
    },
};
use shared::error::{AppError, AppResult};
use std::str::FromStr;

/// One booking joined with its office and (optionally) its linked
/// visitor record.
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub office_id: OfficeId,
    pub office_number: String,
    pub company_name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub needs_support: bool,
    pub notes: Option<String>,
    pub visitor_id: Option<VisitorId>,
    pub linked_visitor_name: Option<String>,
    pub linked_visitor_email: Option<String>,
    pub linked_visitor_whatsapp: Option<String>,
    pub visitor_name: Option<String>,
    pub visitor_email: Option<String>,
    pub visitor_whatsapp: Option<String>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> AppResult<Self> {
        let BookingRow {
            booking_id,
            office_id,
            office_number,
            company_name,
            start_at,
            end_at,
            status,
            title,
            description,
            needs_support,
            notes,
            visitor_id,
            linked_visitor_name,
            linked_visitor_email,
            linked_visitor_whatsapp,
            visitor_name,
            visitor_email,
            visitor_whatsapp,
            created_by,
            created_at,
            updated_at,
        } = value;

        let status = BookingStatus::from_str(&status).map_err(|_| {
            AppError::ConversionEntityError(format!("unknown booking status: {status}"))
        })?;
        let period = Interval::new(start_at, end_at).map_err(|_| {
            AppError::ConversionEntityError(format!("booking {booking_id} has an empty interval"))
        })?;
        let visitor = visitor_id.map(|id| BookingVisitor {
            visitor_id: id,
            name: linked_visitor_name.unwrap_or_default(),
            email: linked_visitor_email,
            whatsapp: linked_visitor_whatsapp,
        });

        Ok(Booking {
            id: booking_id,
            office: BookingOffice {
                office_id,
                number: office_number,
                company_name,
            },
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
        })
    }
}
