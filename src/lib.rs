//! Per-client session state for an RTSP server.
//!
//! Sits between the connection handler (request parsing, responses) and the
//! media engine (pipelines, RTP delivery). See [`session`] for the data
//! model and [`media`] for the engine interface.

pub mod error;
pub mod media;
pub mod session;
pub mod transport;
pub mod url;

pub use error::{Result, SessionError};
pub use media::{Media, MediaStream, StateChange};
pub use session::{AttachPolicy, Session, SessionConfig, SessionMedia, SessionStream};
pub use transport::{LowerTransport, PortRange, Profile, TransProtocol, Transport};
pub use url::MediaUrl;
