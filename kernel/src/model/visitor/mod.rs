use crate::model::id::VisitorId;

pub mod event;

/// Optional persisted identity, keyed by email and reused across
/// bookings when the email matches.
#[derive(Debug)]
pub struct Visitor {
    pub id: VisitorId,
    pub name: String,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
}
