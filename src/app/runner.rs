use crate::adapters::LocalStorage;
use crate::app::pipelines::kata_pipeline::{EventPlan, KataPipeline};
use crate::core::etl::EtlEngine;
use crate::domain::ports::{ConfigProvider, PageFetcher, SeriesJob, Storage};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use url::Url;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Recompute series whose output already exists.
    pub force: bool,
    /// Only list the rounds of each event.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesOutcome {
    Skipped,
    Planned(Vec<EventPlan>),
    Written(String),
}

/// Runs every configured series in order.
///
/// An existing output file counts as a finished series and is not read.
/// The first error aborts the run; series written before it stay on disk.
pub async fn run_series<C, F>(
    config: &C,
    fetcher: F,
    options: RunOptions,
) -> Result<Vec<(SeriesJob, SeriesOutcome)>>
where
    C: ConfigProvider + Validate,
    F: PageFetcher + Clone,
{
    // 驗證配置
    config.validate()?;
    let base_url = Url::parse(config.base_url())?;
    let storage = LocalStorage::new(config.output_path().to_string());

    let mut outcomes = Vec::new();
    for job in config.series() {
        // 輸出文件已存在則跳過
        if !options.force && !options.dry_run && storage.exists(&job.output).await? {
            tracing::info!("File '{}' already exists, skipping {}", job.output, job.input);
            outcomes.push((job, SeriesOutcome::Skipped));
            continue;
        }

        // 創建管道
        tracing::info!("Processing series {}", job.input);
        let pipeline = KataPipeline::new(
            fetcher.clone(),
            storage.clone(),
            base_url.clone(),
            job.clone(),
            config.output_format(),
        );

        // 試運行只列出輪次，否則運行ETL引擎
        let outcome = if options.dry_run {
            SeriesOutcome::Planned(pipeline.plan().await?)
        } else {
            let output = EtlEngine::new(pipeline).run().await?;
            SeriesOutcome::Written(storage.full_path(&output).display().to_string())
        };
        outcomes.push((job, outcome));
    }

    Ok(outcomes)
}
