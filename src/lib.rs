pub mod api;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use datasource::{
    DataSourceError, DirectorySource, HyperliquidDataSource, MockDataSource, VaultDataSource,
    VaultsAnalyserSource,
};
pub use db::{init_db, RegistrationStore, Repository};
pub use domain::{Address, TimeMs, UserPosition, WindowMetrics, WindowSpec};
pub use error::AppError;
pub use orchestration::{Report, ReportService};
