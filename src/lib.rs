pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use config::Settings;
pub use error::{Error, Result};
pub use services::{run_export, ExportJob, ExportSummary};
