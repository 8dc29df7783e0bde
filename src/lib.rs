pub mod catalog;
pub mod cli;
pub mod dom;
pub mod error;
pub mod report;
pub mod scan;
pub mod trace;
