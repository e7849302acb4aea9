use crate::model::id::{OfficeId, UserId};
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateOffice {
    pub number: String,
    pub company_name: String,
    pub owner_ids: Vec<UserId>,
}

#[derive(Debug)]
pub struct UpdateOffice {
    pub office_id: OfficeId,
    pub number: Option<String>,
    pub company_name: Option<String>,
    pub is_active: Option<bool>,
    pub owner_ids: Option<Vec<UserId>>,
}

#[derive(Debug, new)]
pub struct DeleteOffice {
    pub office_id: OfficeId,
}
