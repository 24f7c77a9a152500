//! Media engine interface.
//!
//! The session layer does not build pipelines or send packets. It drives a
//! media engine through two traits:
//!
//! - [`Media`]: a playable resource (e.g. one camera feed) with a state
//!   machine and a table of substreams.
//! - [`MediaStream`]: one substream of a [`Media`] (e.g. the H.264 video
//!   track) with a reserved server port pair and a set of delivery targets.
//!
//! ## Engine state machine
//!
//! ```text
//! idle ──play──> playing <──pause/play──> paused
//!   │               │                        │
//!   └──────stop─────┴──────────stop──────────┴──> stopped
//! ```
//!
//! The engine enforces its own transitions. Once stopped, a media refuses
//! further play/pause requests and reports [`StateChange::Failure`].

use std::sync::Arc;

use crate::transport::{PortRange, Transport};

/// Outcome of a state transition request, reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// The transition was refused or failed.
    Failure,
    /// The transition completed.
    Success,
    /// The transition will complete asynchronously.
    Async,
    /// The transition completed but the media cannot preroll (live source).
    NoPreroll,
}

impl StateChange {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }
}

/// A playable media resource owned by the engine.
///
/// Shared between the engine and every session that attached it, so
/// implementations use interior mutability.
pub trait Media: Send + Sync {
    /// Substream at `index`, or `None` if out of range.
    ///
    /// Must return the same `Arc` for the same substream on every call:
    /// sessions identify streams by pointer.
    fn stream(&self, index: usize) -> Option<Arc<dyn MediaStream>>;

    /// Number of substreams.
    fn n_streams(&self) -> usize;

    /// Start delivery to every registered transport.
    fn play(&self) -> StateChange;

    /// Suspend delivery.
    fn pause(&self) -> StateChange;

    /// Stop delivery for good.
    fn stop(&self) -> StateChange;
}

/// One substream of a [`Media`].
pub trait MediaStream: Send + Sync {
    /// Server-side (RTP, RTCP) ports this substream sends from.
    fn server_port(&self) -> PortRange;

    /// Register `transport` as a delivery target for this substream.
    fn add_transport(&self, transport: &Transport);
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::*;

    /// Substream double that records every registered transport.
    pub struct FakeStream {
        pub server_port: PortRange,
        pub added: Mutex<Vec<Transport>>,
    }

    impl MediaStream for FakeStream {
        fn server_port(&self) -> PortRange {
            self.server_port
        }

        fn add_transport(&self, transport: &Transport) {
            self.added.lock().push(transport.clone());
        }
    }

    /// Media double with fixed substreams and a scripted play result.
    pub struct FakeMedia {
        pub streams: Vec<Arc<FakeStream>>,
        pub play_result: StateChange,
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl FakeMedia {
        /// Substream `i` sends from ports `6000 + 2i`/`6001 + 2i`.
        pub fn with_streams(n: usize) -> Self {
            let streams = (0..n)
                .map(|i| {
                    let rtp = 6000 + 2 * i as u16;
                    Arc::new(FakeStream {
                        server_port: PortRange::new(rtp, rtp + 1),
                        added: Mutex::new(Vec::new()),
                    })
                })
                .collect();
            Self {
                streams,
                play_result: StateChange::Success,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Media for FakeMedia {
        fn stream(&self, index: usize) -> Option<Arc<dyn MediaStream>> {
            self.streams
                .get(index)
                .map(|s| s.clone() as Arc<dyn MediaStream>)
        }

        fn n_streams(&self) -> usize {
            self.streams.len()
        }

        fn play(&self) -> StateChange {
            self.calls.lock().push("play");
            self.play_result
        }

        fn pause(&self) -> StateChange {
            self.calls.lock().push("pause");
            StateChange::Success
        }

        fn stop(&self) -> StateChange {
            self.calls.lock().push("stop");
            StateChange::Success
        }
    }
}
