pub mod button_scanner;
pub mod classifier;
pub mod field_scanner;
pub mod label;
pub mod locator;
pub mod scan_config;
pub mod scan_model;
