use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting ETL process");

        // Extract
        tracing::info!("Extracting performances...");
        let table = self.pipeline.extract().await?;
        tracing::info!("Extracted {} performances", table.len());

        // Transform
        let result = self.pipeline.transform(table).await?;
        tracing::debug!("Rendered {} bytes", result.output.len());

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "Output saved to: {} ({:.1?})",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}
