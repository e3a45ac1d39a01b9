pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use crate::client::MondayClient;
pub use crate::config::AppConfig;
pub use crate::error::{ReportError, Result};
pub use crate::service::ReportService;
