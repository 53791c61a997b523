use crate::domain::model::TransformResult;
use crate::domain::table::{OutputFormat, RecordTable};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Retrieves raw page content. One plain GET per call, no retries.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// An input list of event URLs and the file its records are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesJob {
    pub input: String,
    pub output: String,
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn series(&self) -> Vec<SeriesJob>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RecordTable>;
    async fn transform(&self, table: RecordTable) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
