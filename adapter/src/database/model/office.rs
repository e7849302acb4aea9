use chrono::{DateTime, Utc};
use kernel::model::{
    id::{OfficeId, UserId},
    office::{Office, OfficeOwner},
};

#[derive(sqlx::FromRow)]
pub struct OfficeRow {
    pub office_id: OfficeId,
    pub number: String,
    pub company_name: String,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl OfficeRow {
    pub fn into_office(self, owners: Vec<OfficeOwner>) -> Office {
        let OfficeRow {
            office_id,
            number,
            company_name,
            is_active,
            deleted_at,
        } = self;
        Office {
            id: office_id,
            number,
            company_name,
            is_active,
            deleted_at,
            owners,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct OfficeOwnerRow {
    pub office_id: OfficeId,
    pub user_id: UserId,
    pub user_name: String,
}

impl From<OfficeOwnerRow> for OfficeOwner {
    fn from(value: OfficeOwnerRow) -> Self {
        let OfficeOwnerRow {
            office_id: _,
            user_id,
            user_name,
        } = value;
        OfficeOwner { user_id, user_name }
    }
}
