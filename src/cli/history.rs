use tabled::Table;

use crate::{
    config::Settings, info, management::PlaylistRegistry, types::HistoryTableRow, utils, warning,
};

/// Lists the dates that already have a playlist, optionally just one.
pub async fn history(settings: &Settings, date: Option<String>) {
    let registry = match PlaylistRegistry::in_dir(&settings.data_dir)
        .load_from_cache()
        .await
    {
        Ok(registry) => registry,
        Err(e) => {
            warning!("Failed to load playlist history. Err: {}", e);
            return;
        }
    };

    let filter = match date.as_deref().map(utils::parse_date) {
        Some(Ok(date)) => Some(utils::date_key(date)),
        Some(Err(e)) => {
            warning!("{}", e);
            return;
        }
        None => None,
    };

    let rows: Vec<HistoryTableRow> = registry
        .entries()
        .filter(|(d, _)| filter.as_deref().is_none_or(|f| f == *d))
        .map(|(d, id)| HistoryTableRow {
            date: d.to_string(),
            playlist_id: id.to_string(),
        })
        .collect();

    if rows.is_empty() {
        info!("No playlists recorded yet");
        return;
    }

    println!("{}", Table::new(rows));
}
