use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::types::AuthCallback;

/// Receives Spotify's redirect and hands the code to the waiting prompt.
///
/// The token exchange itself happens in the session, not here, so the
/// callback only records what arrived.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthCallback>>>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;

    if let Some(code) = params.get("code").filter(|c| !c.is_empty()) {
        state.code = Some(code.clone());
        return Html("<h2>Authorization received.</h2><p>Close the browser window.</p>");
    }

    match params.get("error") {
        Some(error) => {
            state.error = Some(error.clone());
            Html("<h4>Authorization was denied.</h4>")
        }
        None => Html("<h4>Missing authorization code.</h4>"),
    }
}
