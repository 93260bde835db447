// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! View-local state with stale-response protection.
//!
//! Every load takes a [`Ticket`] from its slot. When the response comes back
//! it is applied only if no newer load was started in the meantime.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::ScopedJoinHandle;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct LoadSequence {
    issued: AtomicU64,
}

impl LoadSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}

/// One collection a view displays.
#[derive(Debug)]
pub struct Slot<T> {
    name: &'static str,
    seq: LoadSequence,
    value: Option<T>,
}

impl<T> Slot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            seq: LoadSequence::new(),
            value: None,
        }
    }

    pub fn begin(&self) -> Ticket {
        self.seq.begin()
    }

    /// Stores a successful result for the newest ticket. Stale results are
    /// dropped; failures are logged and keep whatever was shown before.
    pub fn apply<E: Display>(&mut self, ticket: Ticket, result: Result<T, E>) -> bool {
        if !self.seq.is_current(ticket) {
            debug!(slot = self.name, ?ticket, "discarding stale response");
            return false;
        }
        match result {
            Ok(v) => {
                self.value = Some(v);
                true
            }
            Err(e) => {
                error!(slot = self.name, error = %e, "load failed");
                false
            }
        }
    }

    /// Begins and applies in one step, for loads with nothing in between.
    pub fn load<E: Display>(&mut self, fetch: impl FnOnce() -> Result<T, E>) -> bool {
        let ticket = self.begin();
        self.apply(ticket, fetch())
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }
}

impl<T> Slot<Vec<T>> {
    /// Loaded items, or an empty slice if nothing loaded yet.
    pub fn items(&self) -> &[T] {
        self.value.as_deref().unwrap_or(&[])
    }

    pub fn push(&mut self, item: T) {
        self.value.get_or_insert_with(Vec::new).push(item);
    }
}

/// Joins a scoped load, re-raising a panic from the worker thread.
pub fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}
