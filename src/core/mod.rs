pub mod aggregate;
pub mod category;
pub mod etl;
pub mod parse;
pub mod rounds;

pub use crate::domain::model::{PerformanceRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
pub use crate::domain::table::RecordTable;
pub use crate::utils::error::Result;
