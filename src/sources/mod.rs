mod bulletin;
pub mod extract;
mod ticker;
mod worldometers;

pub use worldometers::AggregatorPage;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Url;
use crate::config::SourcesConfig;
use crate::domain::{Announcement, AuthoritativeFigure};

/// The fetch layer the poll cycle consumes. Implementations hand back
/// structured data; "nothing usable this cycle" is an error the caller
/// absorbs.
#[async_trait]
pub trait Sources: Send + Sync + 'static {
    async fn fetch_country_table(&self) -> anyhow::Result<AggregatorPage>;
    async fn fetch_authoritative_figure(&self) -> anyhow::Result<AuthoritativeFigure>;
    async fn fetch_announcement_candidate(&self) -> anyhow::Result<Announcement>;
}

/// Production implementation scraping the public pages over HTTP.
#[derive(Clone)]
pub struct HttpSources {
    client: reqwest::Client,
    /// The announcement host serves a certificate chain reqwest rejects, so
    /// those pages go through a client that skips verification.
    lenient_client: reqwest::Client,
    config: SourcesConfig,
}

impl HttpSources {
    pub fn new(config: SourcesConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("couldn't build the HTTP client")?;
        let lenient_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context("couldn't build the lenient HTTP client")?;
        Ok(Self { client, lenient_client, config })
    }

    async fn fetch_page(&self, client: &reqwest::Client, url: &Url) -> anyhow::Result<String> {
        let response = client.get(url.clone())
            .send().await
            .with_context(|| format!("couldn't fetch {url}"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("{status} from {url}"))
        }
        response.text().await
            .with_context(|| format!("couldn't read the body of {url}"))
    }

    async fn figure_from(&self, url: &Url) -> anyhow::Result<AuthoritativeFigure> {
        let body = self.fetch_page(&self.client, url).await?;
        ticker::parse_ticker(&body, &self.config.ticker_title)
    }

    async fn candidate_from(&self, url: &Url) -> anyhow::Result<Announcement> {
        let html = self.fetch_page(&self.lenient_client, url).await?;
        let bulletin = bulletin::parse_bulletin_page(&html)
            .ok_or_else(|| anyhow!("no bulletin found on {url}"))?;
        Announcement::new(bulletin.display_time, bulletin.content, self.config.utc_offset_hours)
            .ok_or_else(|| anyhow!("the bulletin on {url} carries an unparseable time stamp"))
    }
}

#[async_trait]
impl Sources for HttpSources {
    async fn fetch_country_table(&self) -> anyhow::Result<AggregatorPage> {
        let html = self.fetch_page(&self.client, &self.config.stats_url).await?;
        let page = worldometers::parse_page(&html);
        if page.today.is_empty() {
            return Err(anyhow!("no countries parsed from {}", self.config.stats_url))
        }
        Ok(page)
    }

    /// Primary ticker first, one same-cycle fallback after it.
    async fn fetch_authoritative_figure(&self) -> anyhow::Result<AuthoritativeFigure> {
        match self.figure_from(&self.config.ticker_url).await {
            Ok(figure) => Ok(figure),
            Err(primary) => {
                let fallback = self.config.ticker_fallback_url.as_ref()
                    .ok_or(primary)?;
                log::warn!("primary ticker failed, trying {fallback}");
                self.figure_from(fallback).await
            }
        }
    }

    /// Primary announcement page first, one same-cycle fallback after it.
    async fn fetch_announcement_candidate(&self) -> anyhow::Result<Announcement> {
        match self.candidate_from(&self.config.bulletin_url).await {
            Ok(candidate) => Ok(candidate),
            Err(primary) => {
                let fallback = self.config.bulletin_fallback_url.as_ref()
                    .ok_or(primary)?;
                log::warn!("primary announcement page failed, trying {fallback}");
                self.candidate_from(fallback).await
            }
        }
    }
}
