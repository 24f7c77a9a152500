use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Result, SessionError};
use crate::media::{Media, StateChange};
use crate::session::stream::SessionStream;
use crate::url::MediaUrl;

/// A media resource attached to a session under a URL.
///
/// Holds its own copy of the URL, a shared reference to the engine media,
/// and the [`SessionStream`]s the client has set up on it. Playback
/// requests are forwarded to the engine unchanged.
pub struct SessionMedia {
    url: MediaUrl,
    media: Arc<dyn Media>,
    /// Oldest first; lookups and iteration go newest first.
    streams: Mutex<Vec<Arc<SessionStream>>>,
}

impl SessionMedia {
    pub(crate) fn new(url: MediaUrl, media: Arc<dyn Media>) -> Self {
        Self {
            url,
            media,
            streams: Mutex::new(Vec::new()),
        }
    }

    pub fn url(&self) -> &MediaUrl {
        &self.url
    }

    pub fn media(&self) -> &Arc<dyn Media> {
        &self.media
    }

    /// Get the stream for substream `index`, creating it on first use.
    ///
    /// Returns `None` if the media has no substream at `index`. Repeated
    /// calls with the same index return the same `Arc`. A stream handle
    /// held past this media's release keeps the engine substream alive, but
    /// not the media itself.
    pub fn get_or_create_stream(&self, index: usize) -> Option<Arc<SessionStream>> {
        let Some(media_stream) = self.media.stream(index) else {
            tracing::debug!(url = %self.url, index, n_streams = self.media.n_streams(), "no such substream");
            return None;
        };

        let mut streams = self.streams.lock();
        if let Some(existing) = streams
            .iter()
            .rev()
            .find(|s| Arc::ptr_eq(s.media_stream(), &media_stream))
        {
            return Some(existing.clone());
        }

        let stream = Arc::new(SessionStream::new(index, media_stream));
        streams.push(stream.clone());
        tracing::debug!(url = %self.url, index, total_streams = streams.len(), "stream created");

        Some(stream)
    }

    /// Streams set up on this media, most recently created first.
    pub fn streams(&self) -> Vec<Arc<SessionStream>> {
        self.streams.lock().iter().rev().cloned().collect()
    }

    pub fn n_streams(&self) -> usize {
        self.streams.lock().len()
    }

    /// Register every stream's client transport with the engine, then ask
    /// the engine to play.
    ///
    /// Fails with [`SessionError::TransportNotConfigured`] before touching
    /// the engine if any stream has no negotiated transport. Otherwise the
    /// engine's result is returned as-is; registrations are kept even when
    /// it reports [`StateChange::Failure`].
    pub fn play(&self) -> Result<StateChange> {
        let streams = self.streams.lock();

        if let Some(missing) = streams.iter().find(|s| !s.has_transport()) {
            tracing::warn!(url = %self.url, index = missing.index(), "PLAY before transport setup");
            return Err(SessionError::TransportNotConfigured {
                url: self.url.to_string(),
                index: missing.index(),
            });
        }

        for stream in streams.iter().rev() {
            stream.register_transport();
        }

        let ret = self.media.play();
        log_state_change(&self.url, "play", streams.len(), ret);
        Ok(ret)
    }

    /// Ask the engine to pause. The engine's result is returned as-is.
    pub fn pause(&self) -> StateChange {
        let ret = self.media.pause();
        log_state_change(&self.url, "pause", self.n_streams(), ret);
        ret
    }

    /// Ask the engine to stop. The engine's result is returned as-is.
    ///
    /// After a successful stop the engine refuses further play/pause.
    pub fn stop(&self) -> StateChange {
        let ret = self.media.stop();
        log_state_change(&self.url, "stop", self.n_streams(), ret);
        ret
    }
}

fn log_state_change(url: &MediaUrl, request: &'static str, n_streams: usize, ret: StateChange) {
    if ret.is_failure() {
        tracing::warn!(%url, request, n_streams, "media state change failed");
    } else {
        tracing::info!(%url, request, n_streams, result = ?ret, "media state change");
    }
}

impl std::fmt::Debug for SessionMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionMedia")
            .field("url", &self.url)
            .field("streams", &*self.streams.lock())
            .finish_non_exhaustive()
    }
}

impl Drop for SessionMedia {
    fn drop(&mut self) {
        tracing::trace!(url = %self.url, n_streams = self.streams.get_mut().len(), "session media released");
    }
}
