use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

const PENDING: u8 = 0;
const DONE: u8 = 1;
const ABANDONED: u8 = 2;

/// Result of polling a [`CompletionHandle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompletionState {
    /// The requested pass has not been applied yet.
    Pending,
    /// The requested pass has been applied; derived state reflects it.
    Done,
    /// The owning table was disposed before the pass could apply.
    Abandoned,
}

/// A poll-style future for a deferred pass (forced re-sort, scroll-to-row).
///
/// Handles resolve at most once, and only after the relevant recompute has
/// committed. Disposing the owning table abandons outstanding handles
/// instead of leaving them pending forever.
#[derive(Clone, Debug)]
pub struct CompletionHandle(Arc<AtomicU8>);

impl CompletionHandle {
    pub(crate) fn pending() -> Self {
        CompletionHandle(Arc::new(AtomicU8::new(PENDING)))
    }

    /// A handle for an operation that finished synchronously.
    pub(crate) fn done() -> Self {
        CompletionHandle(Arc::new(AtomicU8::new(DONE)))
    }

    /// A handle for an operation requested after disposal.
    pub(crate) fn abandoned() -> Self {
        CompletionHandle(Arc::new(AtomicU8::new(ABANDONED)))
    }

    pub(crate) fn complete(&self) {
        let _ = self
            .0
            .compare_exchange(PENDING, DONE, Ordering::AcqRel, Ordering::Acquire);
    }

    pub(crate) fn abandon(&self) {
        let _ =
            self.0
                .compare_exchange(PENDING, ABANDONED, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn state(&self) -> CompletionState {
        match self.0.load(Ordering::Acquire) {
            DONE => CompletionState::Done,
            ABANDONED => CompletionState::Abandoned,
            _ => CompletionState::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == CompletionState::Pending
    }

    pub fn is_done(&self) -> bool {
        self.state() == CompletionState::Done
    }

    pub fn is_abandoned(&self) -> bool {
        self.state() == CompletionState::Abandoned
    }
}
