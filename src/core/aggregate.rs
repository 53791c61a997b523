use crate::core::category::extract_round;
use crate::core::rounds::collect_round_urls;
use crate::domain::ports::PageFetcher;
use crate::domain::table::RecordTable;
use crate::utils::error::Result;
use tracing::{error, info, instrument};
use url::Url;

/// Walks events and their kata rounds one page at a time.
pub struct Aggregator<F: PageFetcher> {
    fetcher: F,
    base_url: Url,
}

impl<F: PageFetcher> Aggregator<F> {
    pub fn new(fetcher: F, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Kata round URLs linked from an event's draws index.
    pub async fn round_urls(&self, draws_url: &str) -> Result<Vec<String>> {
        let page = self.fetcher.fetch(draws_url).await?;
        collect_round_urls(&page, &self.base_url)
            .inspect_err(|e| error!(url = %draws_url, error = %e, "Cannot read draws index"))
    }

    /// Performances of a single category/round page.
    pub async fn round(&self, round_url: &str) -> Result<RecordTable> {
        let page = self.fetcher.fetch(round_url).await?;
        let records = extract_round(&page)
            .inspect_err(|e| error!(url = %round_url, error = %e, "Cannot extract round"))?;
        info!(url = %round_url, records = records.len(), "Extracted round");
        Ok(RecordTable::new(records))
    }

    /// All kata performances of one event, round by round.
    #[instrument(level = "info", skip(self))]
    pub async fn event(&self, draws_url: &str) -> Result<RecordTable> {
        let round_urls = self.round_urls(draws_url).await?;
        info!(rounds = round_urls.len(), "Found kata rounds");

        let mut rounds = Vec::with_capacity(round_urls.len());
        for round_url in &round_urls {
            rounds.push(self.round(round_url).await?);
        }

        let table = RecordTable::concat(rounds)?;
        info!(records = table.len(), "Event complete");
        Ok(table)
    }

    /// Concatenates the events in the order given. The first failure aborts
    /// the whole run.
    pub async fn events(&self, draws_urls: &[String]) -> Result<RecordTable> {
        let mut events = Vec::with_capacity(draws_urls.len());
        for draws_url in draws_urls {
            events.push(self.event(draws_url).await?);
        }
        RecordTable::concat(events)
    }
}

/// One event draws URL per line; blank lines are ignored.
pub fn read_event_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
