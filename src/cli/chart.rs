use tabled::Table;

use crate::{
    chart::{BillboardChart, ChartSource},
    config::Settings,
    error, failure, info,
    management::ChartCache,
    types::ChartTableRow,
    utils, warning,
};

/// Prints the songs of a chart date, scraping and caching them if needed.
pub async fn chart(settings: &Settings, date: Option<String>) {
    let date = super::run::resolve_date(date).await;
    let key = utils::date_key(date);
    let cache = ChartCache::new(&settings.data_dir);

    let titles = match cache.load(&key).await {
        Ok(Some(titles)) if !titles.is_empty() => titles,
        other => {
            if let Err(e) = other {
                failure!("Cannot read cached chart for {}: {}", key, e);
            }

            let source = match BillboardChart::from_settings(settings) {
                Ok(source) => source,
                Err(e) => error!("Cannot build HTTP client for chart scraping: {}", e),
            };
            let titles = source.titles(date).await;
            if !titles.is_empty() {
                if let Err(e) = cache.save(&key, &titles).await {
                    failure!("Failed to cache chart for {}: {}", key, e);
                }
            }
            titles
        }
    };

    if titles.is_empty() {
        warning!("No songs found in the chart for {}", key);
        return;
    }

    info!("{} songs on {}", titles.len(), key);
    let rows: Vec<ChartTableRow> = titles
        .into_iter()
        .enumerate()
        .map(|(i, title)| ChartTableRow { rank: i + 1, title })
        .collect();
    println!("{}", Table::new(rows));
}
