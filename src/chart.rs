use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::{config::Settings, failure, info, utils};

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; ",
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Supplies the ranked song titles of a chart date.
#[allow(async_fn_in_trait)]
pub trait ChartSource {
    /// Titles in rank order; empty when nothing could be fetched.
    async fn titles(&self, date: NaiveDate) -> Vec<String>;
}

/// Scrapes the Billboard Hot 100 page of a date.
#[derive(Debug, Clone)]
pub struct BillboardChart {
    client: Client,
    base_url: String,
}

impl BillboardChart {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        Self::new(settings.chart_url.clone(), settings.http_timeout)
    }

    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}/{}/", self.base_url, utils::date_key(date))
    }

    async fn fetch(&self, date: NaiveDate) -> Result<String, reqwest::Error> {
        self.client
            .get(self.url_for(date))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

impl ChartSource for BillboardChart {
    async fn titles(&self, date: NaiveDate) -> Vec<String> {
        info!("Scraping the top 100 songs for {}", utils::date_key(date));

        let html = match self.fetch(date).await {
            Ok(html) => html,
            Err(e) => {
                failure!("Failed to fetch chart page {}: {}", self.url_for(date), e);
                return Vec::new();
            }
        };

        match parse_titles(&html) {
            Ok(titles) => {
                let preview: Vec<&str> = titles.iter().take(3).map(String::as_str).collect();
                info!(
                    "Scraped {} songs for {}. Example titles: {:?}",
                    titles.len(),
                    utils::date_key(date),
                    preview
                );
                titles
            }
            Err(e) => {
                failure!("Failed to parse chart page: {}", e);
                Vec::new()
            }
        }
    }
}

/// Extracts the song titles from a chart page.
///
/// Each chart row is an `li.lrv-u-width-100p`; the title is the `h3` inside
/// the first `li` of the row's first `ul`. Rows without that shape are
/// skipped.
pub fn parse_titles(html: &str) -> Result<Vec<String>, String> {
    let row_selector = parse_selector("li.lrv-u-width-100p")?;
    let list_selector = parse_selector("ul")?;
    let item_selector = parse_selector("li")?;
    let heading_selector = parse_selector("h3")?;

    let document = Html::parse_document(html);
    let titles = document
        .select(&row_selector)
        .filter_map(|row| {
            let list = row.select(&list_selector).next()?;
            let item = list.select(&item_selector).next()?;
            let heading = item.select(&heading_selector).next()?;
            let title = heading.text().collect::<String>().trim().to_string();
            (!title.is_empty()).then_some(title)
        })
        .collect();

    Ok(titles)
}

fn parse_selector(selector: &str) -> Result<Selector, String> {
    Selector::parse(selector).map_err(|e| format!("invalid selector '{}': {:?}", selector, e))
}
