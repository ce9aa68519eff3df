//! Post-batch refresh signaling

/// Receives the coalesced refresh signal after a qualifying batch.
///
/// The runner raises at most one signal per batch; what a refresh actually
/// does (rescan, reload, nothing) is the caller's business.
pub trait RefreshHandler {
    fn refresh(&mut self);
}

/// Handler that swallows the signal, for callers that only inspect summaries
#[derive(Debug, Default)]
pub struct NullRefresh;

impl RefreshHandler for NullRefresh {
    fn refresh(&mut self) {}
}
