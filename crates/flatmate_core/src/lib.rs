pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod inference;
pub mod ledger;
pub mod model;
pub mod notify;
pub mod report;
pub mod scheduler;
pub mod storage;
