// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred draw completions.
//!
//! Some draws finish later than the call that started them (transitions, asynchronous image
//! decoding). They register a future here; the pass that triggered them joins everything once,
//! at its end, and hands the caller a single [`Settle`] to await before the next pass.

extern crate alloc;

use alloc::vec::Vec;
use core::future::Future;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};

/// Resolves once every completion collected during a pass has finished.
pub type Settle = BoxFuture<'static, ()>;

/// Completions collected during the current pass.
#[derive(Default)]
pub struct Completions {
    pending: Vec<BoxFuture<'static, ()>>,
}

impl core::fmt::Debug for Completions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Completions")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Completions {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a completion.
    pub fn push(&mut self, completion: impl Future<Output = ()> + Send + 'static) {
        self.pending.push(completion.boxed());
    }

    /// Number of completions not yet handed out.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Takes every pending completion and joins them into one future.
    pub fn settle(&mut self) -> Settle {
        let pending = core::mem::take(&mut self.pending);
        async move {
            join_all(pending).await;
        }
        .boxed()
    }

    /// Drops every pending completion without waiting for it.
    ///
    /// Used when a fresh full pass replaces the state those completions were animating.
    /// Returns how many were dropped.
    pub fn supersede(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "superseded pending completions");
        }
        dropped
    }
}

/// A [`Settle`] that is already resolved.
pub fn settled() -> Settle {
    futures::future::ready(()).boxed()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use futures::executor::block_on;

    use super::*;

    #[test]
    fn settle_joins_everything_pushed_so_far() {
        let done = Arc::new(AtomicUsize::new(0));
        let mut completions = Completions::new();
        for _ in 0..3 {
            let done = Arc::clone(&done);
            completions.push(async move {
                done.fetch_add(1, Ordering::SeqCst);
            });
        }
        let settle = completions.settle();
        assert!(completions.is_empty(), "settle drains the list");
        assert_eq!(done.load(Ordering::SeqCst), 0, "nothing runs before awaiting");
        block_on(settle);
        assert_eq!(done.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn supersede_drops_without_running() {
        let done = Arc::new(AtomicUsize::new(0));
        let mut completions = Completions::new();
        let flag = Arc::clone(&done);
        completions.push(async move {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(completions.supersede(), 1);
        block_on(completions.settle());
        assert_eq!(done.load(Ordering::SeqCst), 0);
        block_on(settled());
    }
}
