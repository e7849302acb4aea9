pub mod actor;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod id;
pub mod list;
pub mod office;
pub mod role;
pub mod user;
pub mod visitor;
