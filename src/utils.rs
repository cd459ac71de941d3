use chrono::NaiveDate;
use url::Url;

/// Format every work unit key is written in.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` work unit key.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| format!("'{}' is not a date in the format YYYY-MM-DD: {}", value.trim(), e))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn playlist_name(date: NaiveDate) -> String {
    format!("{} / Top 100 Songs", date_key(date))
}

pub fn playlist_description(date: NaiveDate) -> String {
    format!("Top 100 songs on {}", date_key(date))
}

/// Pulls the authorization code out of what the operator pasted.
///
/// Accepts either the bare code or the whole redirected URL
/// (`http://localhost:8888/callback?code=...`). Returns `None` for empty
/// input or a URL without a `code` parameter.
pub fn extract_auth_code(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(input) {
        if url.has_host() {
            return url
                .query_pairs()
                .find(|(k, _)| k == "code")
                .map(|(_, v)| v.into_owned())
                .filter(|v| !v.is_empty());
        }
    }

    if let Some(query) = input.split_once('?').map(|(_, q)| q) {
        return url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty());
    }

    Some(input.to_string())
}
