use tokio::time::sleep;

use crate::{failure, success};

use super::{Session, SpotifyApi};

impl<A: SpotifyApi> Session<A> {
    /// Makes sure the account id playlists are created under is on record.
    ///
    /// Waits the identity delay before the lookup; the API tends to reject
    /// calls that arrive right after a token was minted. Returns whether a
    /// user id is available afterwards.
    pub async fn ensure_identity(&mut self) -> bool {
        if self.user_id().is_some() {
            return true;
        }

        let token = match self.require_token() {
            Ok(token) => token,
            Err(e) => {
                failure!("Cannot look up user id: {}", e);
                return false;
            }
        };

        sleep(self.config().pacing.identity_delay).await;

        match self.api().current_user(&token).await {
            Ok(profile) if !profile.id.is_empty() => {
                self.set_user_id(profile.id).await;
                success!("User id saved");
                true
            }
            Ok(_) => {
                failure!("Profile response did not contain a user id");
                false
            }
            Err(e) => {
                failure!("Failed to get user id: {}", e);
                false
            }
        }
    }
}
