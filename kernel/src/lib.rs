pub mod interval;
pub mod model;
pub mod permission;
pub mod repository;
pub mod slot;
