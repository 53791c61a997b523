pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpFetcher, LocalStorage};
pub use app::pipelines::kata_pipeline::KataPipeline;
pub use crate::core::etl::EtlEngine;
pub use domain::model::PerformanceRecord;
pub use domain::table::{OutputFormat, RecordTable};
pub use utils::error::{EtlError, Result};
