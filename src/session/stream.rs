use std::sync::Arc;

use parking_lot::RwLock;

use crate::media::MediaStream;
use crate::transport::Transport;

/// One substream of an attached media, with the client transport
/// negotiated for it during SETUP.
///
/// Created by [`SessionMedia::get_or_create_stream`](super::SessionMedia::get_or_create_stream)
/// and owned by that [`SessionMedia`](super::SessionMedia).
pub struct SessionStream {
    index: usize,
    media_stream: Arc<dyn MediaStream>,
    client_transport: RwLock<Option<Transport>>,
}

impl SessionStream {
    pub(crate) fn new(index: usize, media_stream: Arc<dyn MediaStream>) -> Self {
        Self {
            index,
            media_stream,
            client_transport: RwLock::new(None),
        }
    }

    /// Substream index this stream was requested at.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The engine substream this stream is bound to.
    pub fn media_stream(&self) -> &Arc<dyn MediaStream> {
        &self.media_stream
    }

    /// Store `client` as this stream's transport and build the server's
    /// answer to it.
    ///
    /// The answer echoes the client's protocol, profile, lower transport and
    /// client ports, and carries the substream's reserved server ports.
    /// Other client fields (destination, TTL, interleaving) are not echoed.
    /// A previously stored client transport is dropped.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use rtsp_session::media::{Media, MediaStream, StateChange};
    /// # use rtsp_session::{MediaUrl, PortRange, Session, Transport};
    /// # struct Track;
    /// # impl MediaStream for Track {
    /// #     fn server_port(&self) -> PortRange { PortRange::new(6000, 6001) }
    /// #     fn add_transport(&self, _: &Transport) {}
    /// # }
    /// # struct Cam(Arc<dyn MediaStream>);
    /// # impl Media for Cam {
    /// #     fn stream(&self, i: usize) -> Option<Arc<dyn MediaStream>> { (i == 0).then(|| self.0.clone()) }
    /// #     fn n_streams(&self) -> usize { 1 }
    /// #     fn play(&self) -> StateChange { StateChange::Success }
    /// #     fn pause(&self) -> StateChange { StateChange::Success }
    /// #     fn stop(&self) -> StateChange { StateChange::Success }
    /// # }
    /// let session = Session::new("S1").unwrap();
    /// let media = session.manage_media(&MediaUrl::from_path("/cam1"), Arc::new(Cam(Arc::new(Track))));
    /// let stream = media.get_or_create_stream(0).unwrap();
    ///
    /// let server = stream.set_transport(Transport::rtp_avp_udp(PortRange::new(5000, 5001)));
    /// assert_eq!(server.client_port, PortRange::new(5000, 5001));
    /// assert_eq!(server.server_port, PortRange::new(6000, 6001));
    /// ```
    pub fn set_transport(&self, client: Transport) -> Transport {
        let server = Transport {
            trans: client.trans,
            profile: client.profile,
            lower_transport: client.lower_transport,
            client_port: client.client_port,
            server_port: self.media_stream.server_port(),
            ..Transport::default()
        };

        let previous = self.client_transport.write().replace(client);

        tracing::debug!(
            index = self.index,
            client_port = %server.client_port,
            server_port = %server.server_port,
            lower_transport = ?server.lower_transport,
            renegotiated = previous.is_some(),
            "transport negotiated"
        );

        server
    }

    /// Returns a clone of the negotiated client transport, if any.
    pub fn client_transport(&self) -> Option<Transport> {
        self.client_transport.read().clone()
    }

    /// Whether SETUP has negotiated a transport for this stream.
    pub fn has_transport(&self) -> bool {
        self.client_transport.read().is_some()
    }

    /// Register the negotiated transport with the engine substream.
    /// Returns `false` if none has been negotiated.
    pub(crate) fn register_transport(&self) -> bool {
        match self.client_transport.read().as_ref() {
            Some(transport) => {
                self.media_stream.add_transport(transport);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for SessionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStream")
            .field("index", &self.index)
            .field("server_port", &self.media_stream.server_port())
            .field("client_transport", &*self.client_transport.read())
            .finish()
    }
}
