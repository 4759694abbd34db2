//! Per-call cancellation and generation tracking.
//!
//! Every transport call is issued against a fresh [`GenerationToken`]. The
//! controller remembers which generation is current; a completion whose
//! generation is no longer current must not touch state.

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Identity and cancellation handle for one transport call.
#[derive(Clone, Debug)]
pub struct GenerationToken {
    generation: u64,
    token: CancellationToken,
}

impl GenerationToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The cancellation signal handed to the transport.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Owns the current generation and its token.
#[derive(Debug, Default)]
pub struct CancellationController {
    generation: u64,
    current: Option<CancellationToken>,
}

impl CancellationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and make its token current.
    ///
    /// The previous token, if any, stops being current but is not cancelled.
    pub fn issue(&mut self) -> GenerationToken {
        self.generation += 1;
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        GenerationToken {
            generation: self.generation,
            token,
        }
    }

    /// Signal the current token. Returns whether there was one to signal.
    ///
    /// The generation stays current: the transport's own reaction to the
    /// signal is still applied.
    pub fn abort(&mut self) -> bool {
        match &self.current {
            Some(token) => {
                debug!(generation = self.generation, "cancelling current token");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Signal the current token and retire its generation, so nothing is
    /// current until the next [`issue`](Self::issue).
    pub fn invalidate(&mut self) {
        self.abort();
        self.current = None;
        self.generation += 1;
    }

    /// Whether a call issued under `generation` may still apply its result.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current.is_some() && self.generation == generation
    }

    /// Counter value. Retired by [`invalidate`](Self::invalidate) as well as
    /// by [`issue`](Self::issue), so it may name no token.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
