pub mod availability;
pub mod booking;
pub mod office;
pub mod user;
