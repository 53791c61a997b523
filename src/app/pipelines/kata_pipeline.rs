use crate::core::aggregate::{read_event_list, Aggregator};
use crate::domain::model::TransformResult;
use crate::domain::ports::{PageFetcher, Pipeline, SeriesJob, Storage};
use crate::domain::table::{OutputFormat, RecordTable};
use crate::utils::error::Result;
use url::Url;

/// Rounds discovered for one event during a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPlan {
    pub draws_url: String,
    pub round_urls: Vec<String>,
}

/// Reads one series' event list, aggregates its kata performances and
/// writes them to the series output file.
pub struct KataPipeline<F: PageFetcher, S: Storage> {
    pub(crate) aggregator: Aggregator<F>,
    pub(crate) storage: S,
    pub(crate) job: SeriesJob,
    pub(crate) format: OutputFormat,
}

impl<F: PageFetcher, S: Storage> KataPipeline<F, S> {
    pub fn new(fetcher: F, storage: S, base_url: Url, job: SeriesJob, format: OutputFormat) -> Self {
        Self {
            aggregator: Aggregator::new(fetcher, base_url),
            storage,
            job,
            format,
        }
    }

    pub fn job(&self) -> &SeriesJob {
        &self.job
    }

    async fn event_urls(&self) -> Result<Vec<String>> {
        let content = self.storage.read_file(&self.job.input).await?;
        let urls = read_event_list(&String::from_utf8_lossy(&content));
        tracing::debug!("{} lists {} events", self.job.input, urls.len());
        Ok(urls)
    }

    /// Lists every event's kata rounds without fetching the rounds.
    pub async fn plan(&self) -> Result<Vec<EventPlan>> {
        let mut plans = Vec::new();
        for draws_url in self.event_urls().await? {
            let round_urls = self.aggregator.round_urls(&draws_url).await?;
            plans.push(EventPlan {
                draws_url,
                round_urls,
            });
        }
        Ok(plans)
    }
}

#[async_trait::async_trait]
impl<F: PageFetcher, S: Storage> Pipeline for KataPipeline<F, S> {
    async fn extract(&self) -> Result<RecordTable> {
        // 依序抓取每個賽事的所有型輪次
        let urls = self.event_urls().await?;
        self.aggregator.events(&urls).await
    }

    async fn transform(&self, table: RecordTable) -> Result<TransformResult> {
        // 按輸出格式生成文件內容
        let output = table.render(self.format)?;
        Ok(TransformResult { table, output })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        tracing::debug!(
            "Writing {} records ({} bytes) to {}",
            result.table.len(),
            result.output.len(),
            self.job.output
        );
        // 保存輸出文件
        self.storage.write_file(&self.job.output, &result.output).await?;
        Ok(self.job.output.clone())
    }
}
