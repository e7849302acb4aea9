use garde::Validate;
use kernel::model::{
    id::UserId,
    role::Role,
    user::{event::CreateUser, User},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    Admin,
    Attendant,
    OfficeOwner,
}

impl From<RoleName> for Role {
    fn from(value: RoleName) -> Self {
        match value {
            RoleName::Admin => Role::Admin,
            RoleName::Attendant => Role::Attendant,
            RoleName::OfficeOwner => Role::OfficeOwner,
        }
    }
}

impl From<Role> for RoleName {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => RoleName::Admin,
            Role::Attendant => RoleName::Attendant,
            Role::OfficeOwner => RoleName::OfficeOwner,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 8))]
    pub password: String,
    #[garde(skip)]
    pub role: RoleName,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        let CreateUserRequest {
            name,
            email,
            password,
            role,
        } = value;
        Self {
            name,
            email,
            password,
            role: role.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: RoleName,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            id,
            name,
            email,
            role,
        } = value;
        Self {
            id,
            name,
            email,
            role: role.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_serialize_screaming_snake() {
        let value = serde_json::to_value(RoleName::OfficeOwner).unwrap();
        assert_eq!(value, "OFFICE_OWNER");
        let parsed: RoleName = serde_json::from_value(value).unwrap();
        assert!(matches!(Role::from(parsed), Role::OfficeOwner));
    }

    #[test]
    fn create_request_becomes_an_event() {
        let req: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "name": "Mia",
            "email": "mia@example.com",
            "password": "correct horse",
            "role": "ATTENDANT"
        }))
        .unwrap();
        let event = CreateUser::from(req);
        assert_eq!(event.email, "mia@example.com");
        assert!(matches!(event.role, Role::Attendant));
    }
}
