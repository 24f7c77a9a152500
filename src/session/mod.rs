//! Per-client RTSP session state (RFC 2326 §3).
//!
//! A [`Session`] records which media a client has attached to and how each
//! substream is delivered:
//!
//! ```text
//! Session ("S1")
//! └── SessionMedia (/cam1)  ──shares──> engine Media
//!     ├── SessionStream #0  ──bound to──> MediaStream #0 (server_port=6000-6001)
//!     │     client transport: RTP/AVP;unicast;client_port=5000-5001
//!     └── SessionStream #1  ──bound to──> MediaStream #1
//! ```
//!
//! ## Request mapping
//!
//! SETUP URIs name a substream (`/cam1/track0`). The handler strips the
//! control suffix and looks the media up by `/cam1`, since lookups compare
//! the whole path.
//!
//! ```text
//! SETUP rtsp://host/cam1/track0  -> get_media(/cam1) / manage_media, get_or_create_stream(0), set_transport
//! PLAY  rtsp://host/cam1         -> get_media, SessionMedia::play
//! PAUSE rtsp://host/cam1         -> get_media, SessionMedia::pause
//! TEARDOWN rtsp://host/cam1      -> get_media, SessionMedia::stop, release_media
//! ```
//!
//! ## Concurrency
//!
//! `Session` is `Send + Sync`. The media list, each media's stream list and
//! each stream's transport sit behind their own `parking_lot` locks, taken
//! in that order. Two requests for the same session may run on different
//! workers. Engine callbacks must not re-enter the session that called them.

pub mod media;
pub mod stream;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Result, SessionError};
use crate::media::Media;
use crate::url::MediaUrl;
pub use media::SessionMedia;
pub use stream::SessionStream;

/// What [`Session::manage_media`] does when the URL path is already attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttachPolicy {
    /// Detach the existing entry, releasing its media.
    #[default]
    Replace,
    /// Keep the existing entry alongside the new one. Lookups return the
    /// newest, so the older entry is only reachable through
    /// [`Session::medias`].
    Shadow,
}

/// Session-level configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub attach_policy: AttachPolicy,
}

/// A single client's RTSP session.
///
/// Created by the connection handler with an id it allocated; dropping the
/// session releases every attached media and its streams.
pub struct Session {
    id: String,
    config: SessionConfig,
    /// Oldest first; lookups and iteration go newest first.
    medias: Mutex<Vec<Arc<SessionMedia>>>,
}

impl Session {
    /// Create a session with the default configuration.
    ///
    /// Uniqueness of `id` is the caller's responsibility.
    pub fn new(id: &str) -> Result<Self> {
        Self::with_config(id, SessionConfig::default())
    }

    /// Create a session with a custom configuration.
    pub fn with_config(id: &str, config: SessionConfig) -> Result<Self> {
        if id.is_empty() {
            return Err(SessionError::InvalidSessionId);
        }
        tracing::debug!(session_id = id, policy = ?config.attach_policy, "session created");
        Ok(Self {
            id: id.to_string(),
            config,
            medias: Mutex::new(Vec::new()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Attach `media` to this session under a copy of `url`.
    ///
    /// With [`AttachPolicy::Replace`] an entry already attached at the same
    /// path is detached first.
    ///
    /// The returned handle shares ownership with the session. Holding it
    /// past the session's drop (or past [`release_media`](Self::release_media))
    /// keeps the entry, its streams and the engine media alive until the
    /// handle is dropped too.
    pub fn manage_media(&self, url: &MediaUrl, media: Arc<dyn Media>) -> Arc<SessionMedia> {
        let entry = Arc::new(SessionMedia::new(url.clone(), media));

        let mut medias = self.medias.lock();
        if self.config.attach_policy == AttachPolicy::Replace {
            let before = medias.len();
            medias.retain(|m| !m.url().same_path(url));
            if medias.len() != before {
                tracing::debug!(session_id = %self.id, url = %url, "replacing attached media");
            }
        }
        medias.push(entry.clone());

        tracing::debug!(
            session_id = %self.id,
            url = %url,
            total_medias = medias.len(),
            "media attached"
        );

        entry
    }

    /// Look up attached media by URL path (scheme, host and query are
    /// ignored). The most recently attached match wins.
    ///
    /// Linear in the number of attached media.
    pub fn get_media(&self, url: &MediaUrl) -> Option<Arc<SessionMedia>> {
        self.medias
            .lock()
            .iter()
            .rev()
            .find(|m| m.url().same_path(url))
            .cloned()
    }

    /// Detach and return the most recently attached media at `url`'s path.
    ///
    /// The engine media is released once the caller drops the returned
    /// entry.
    pub fn release_media(&self, url: &MediaUrl) -> Option<Arc<SessionMedia>> {
        let mut medias = self.medias.lock();
        let pos = medias.iter().rposition(|m| m.url().same_path(url))?;
        let removed = medias.remove(pos);
        tracing::debug!(
            session_id = %self.id,
            url = %url,
            remaining = medias.len(),
            "media released"
        );
        Some(removed)
    }

    /// All attached media, most recently attached first.
    pub fn medias(&self) -> Vec<Arc<SessionMedia>> {
        self.medias.lock().iter().rev().cloned().collect()
    }

    pub fn n_medias(&self) -> usize {
        self.medias.lock().len()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("medias", &*self.medias.lock())
            .finish()
    }
}

/// Releases the session's references to every attached media. Entries
/// are freed here unless the caller still holds `Arc` handles to them or to
/// their streams.
impl Drop for Session {
    fn drop(&mut self) {
        tracing::debug!(session_id = %self.id, n_medias = self.medias.get_mut().len(), "session released");
    }
}
