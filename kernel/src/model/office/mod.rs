use crate::model::id::{OfficeId, UserId};
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug)]
pub struct Office {
    pub id: OfficeId,
    pub number: String,
    pub company_name: String,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub owners: Vec<OfficeOwner>,
}

#[derive(Debug)]
pub struct OfficeOwner {
    pub user_id: UserId,
    pub user_name: String,
}

impl Office {
    /// A deleted or inactive office accepts no new availability or
    /// bookings.
    pub fn is_bookable(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}
