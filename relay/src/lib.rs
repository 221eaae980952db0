pub mod config;
pub mod error;
pub mod llemma_service;
pub mod milk_log;
pub mod models;

pub use config::RelayConfig;
pub use error::RelayError;
pub use llemma_service::LlemmaService;
pub use milk_log::{MilkLog, MilkType};
pub use models::*;
