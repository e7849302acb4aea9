use garde::Validate;
use kernel::model::{
    id::{OfficeId, UserId},
    office::{
        event::{CreateOffice, UpdateOffice},
        Office, OfficeOwner,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfficeRequest {
    #[garde(length(min = 1))]
    pub number: String,
    #[garde(length(min = 1))]
    pub company_name: String,
    #[garde(skip)]
    #[serde(default)]
    pub owner_ids: Vec<UserId>,
}

impl From<CreateOfficeRequest> for CreateOffice {
    fn from(value: CreateOfficeRequest) -> Self {
        let CreateOfficeRequest {
            number,
            company_name,
            owner_ids,
        } = value;
        Self {
            number,
            company_name,
            owner_ids,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfficeRequest {
    #[garde(inner(length(min = 1)))]
    pub number: Option<String>,
    #[garde(inner(length(min = 1)))]
    pub company_name: Option<String>,
    #[garde(skip)]
    pub is_active: Option<bool>,
    #[garde(skip)]
    pub owner_ids: Option<Vec<UserId>>,
}

impl UpdateOfficeRequest {
    pub fn into_event(self, office_id: OfficeId) -> UpdateOffice {
        let UpdateOfficeRequest {
            number,
            company_name,
            is_active,
            owner_ids,
        } = self;
        UpdateOffice {
            office_id,
            number,
            company_name,
            is_active,
            owner_ids,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeResponse {
    pub id: OfficeId,
    pub number: String,
    pub company_name: String,
    pub is_active: bool,
    pub owners: Vec<OfficeOwnerResponse>,
}

impl From<Office> for OfficeResponse {
    fn from(value: Office) -> Self {
        let Office {
            id,
            number,
            company_name,
            is_active,
            deleted_at: _,
            owners,
        } = value;
        Self {
            id,
            number,
            company_name,
            is_active,
            owners: owners.into_iter().map(OfficeOwnerResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeOwnerResponse {
    pub user_id: UserId,
    pub user_name: String,
}

impl From<OfficeOwner> for OfficeOwnerResponse {
    fn from(value: OfficeOwner) -> Self {
        let OfficeOwner { user_id, user_name } = value;
        Self { user_id, user_name }
    }
}
