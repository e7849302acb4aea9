use strum::{Display, EnumString};

/// Staff roles, ordered by privilege: ADMIN > ATTENDANT > OFFICE_OWNER.
/// Anonymous visitors carry no role at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Attendant,
    OfficeOwner,
}
