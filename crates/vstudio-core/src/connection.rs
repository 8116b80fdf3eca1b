//! YouTube account connection card.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use tracing::{info, warn};
use vstudio_client::YouTubeApi;
use vstudio_models::ChannelInfo;

use crate::busy::BusyFlags;
use crate::outcome::{Outcome, SkipReason};

/// Outcome of the OAuth redirect back into the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCallback {
    Success,
    Error,
    /// No `auth` parameter, or an unknown value.
    Absent,
}

impl AuthCallback {
    /// Read the `auth` parameter from a query string (leading `?` optional).
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let value = query
            .split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(key, _)| *key == "auth")
            .map(|(_, value)| {
                urlencoding::decode(value)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.to_string())
            });

        match value.as_deref() {
            Some("success") => AuthCallback::Success,
            Some("error") => AuthCallback::Error,
            _ => AuthCallback::Absent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ConnectionOp {
    Check,
    Connect,
    Disconnect,
}

#[derive(Debug, Default)]
struct ConnectionState {
    authenticated: bool,
    channel: Option<ChannelInfo>,
    error: Option<String>,
}

/// Channel summary lines shown while connected.
pub fn channel_summary(channel: &ChannelInfo) -> Vec<String> {
    let mut lines = vec![channel.channel_title.clone()];
    if let Some(custom_url) = channel.custom_url.as_deref().filter(|u| !u.is_empty()) {
        lines.push(custom_url.to_string());
    }
    lines.push(format!("{} subscribers", channel.subscriber_count));
    lines.push(format!("{} videos", channel.video_count));
    lines.push(format!("{} views", channel.view_count));
    lines
}

pub struct ConnectionPanel<Y> {
    api: Y,
    state: Mutex<ConnectionState>,
    busy: BusyFlags<ConnectionOp>,
}

impl<Y> fmt::Debug for ConnectionPanel<Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPanel")
            .field("state", &self.state)
            .finish()
    }
}

impl<Y: YouTubeApi> ConnectionPanel<Y> {
    pub fn new(api: Y) -> Self {
        Self {
            api,
            state: Mutex::new(ConnectionState::default()),
            busy: BusyFlags::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConnectionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().authenticated
    }

    pub fn channel(&self) -> Option<ChannelInfo> {
        self.lock().channel.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Auth status, then channel info when connected.
    pub async fn check_status(&self) -> bool {
        let Some(_guard) = self.busy.try_begin(ConnectionOp::Check) else {
            return self.is_authenticated();
        };
        self.lock().error = None;

        let result = async {
            let status = self.api.auth_status().await?;
            let channel = if status.is_authenticated {
                Some(self.api.channel_info().await?)
            } else {
                None
            };
            Ok::<_, vstudio_client::StudioError>((status.is_authenticated, channel))
        }
        .await;

        let mut state = self.lock();
        match result {
            Ok((authenticated, channel)) => {
                state.authenticated = authenticated;
                state.channel = channel;
            }
            Err(e) => {
                warn!(error = %e, "Error checking auth status");
                state.authenticated = false;
                state.channel = None;
                state.error = Some("Failed to check connection status".to_string());
            }
        }
        state.authenticated
    }

    /// OAuth URL the caller should open.
    pub async fn connect(&self) -> Result<String, String> {
        let Some(_guard) = self.busy.try_begin(ConnectionOp::Connect) else {
            return Err(SkipReason::Busy.to_string());
        };
        self.lock().error = None;

        match self.api.auth_url().await {
            Ok(response) => {
                info!("Redirecting to YouTube OAuth");
                Ok(response.auth_url)
            }
            Err(e) => {
                warn!(error = %e, "Error connecting to YouTube");
                let message = "Failed to initiate YouTube connection".to_string();
                self.lock().error = Some(message.clone());
                Err(message)
            }
        }
    }

    pub async fn disconnect(&self) -> Outcome {
        let Some(_guard) = self.busy.try_begin(ConnectionOp::Disconnect) else {
            return Outcome::Skipped(SkipReason::Busy);
        };
        self.lock().error = None;

        match self.api.disconnect().await {
            Ok(()) => {
                let mut state = self.lock();
                state.authenticated = false;
                state.channel = None;
                Outcome::Done("YouTube account disconnected".to_string())
            }
            Err(e) => {
                warn!(error = %e, "Error disconnecting from YouTube");
                let message = "Failed to disconnect YouTube account".to_string();
                self.lock().error = Some(message.clone());
                Outcome::Failed(message)
            }
        }
    }

    /// Handle the redirect query after OAuth.
    pub async fn handle_callback(&self, query: &str) -> AuthCallback {
        let callback = AuthCallback::from_query(query);
        match callback {
            AuthCallback::Success => {
                self.lock().error = None;
                self.check_status().await;
            }
            AuthCallback::Error => {
                self.lock().error =
                    Some("Failed to connect YouTube account. Please try again.".to_string());
            }
            AuthCallback::Absent => {}
        }
        callback
    }
}
