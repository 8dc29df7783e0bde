pub mod field_catalog;
pub mod verify;
