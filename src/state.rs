//! View-state building blocks
//!
//! - `Slot<T>`: one fetched slice with request sequencing, so a slow response
//!   from an earlier request never overwrites a later one.
//! - `RefreshGate`: reentrancy guard shared by a manual refresh trigger and
//!   the poller of the same view.
//! - `NoticeBoard`: transient notifications with per-kind expiry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::constants::notices::MAX_VISIBLE;

/// Identity of one in-flight request against a slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// What happened to a completed request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A later request for the same slot already settled
    Stale,
}

/// One fetched slice of view state.
///
/// Every request takes a ticket from `begin`. The most recently issued
/// request to settle wins: once ticket N settled (success or failure), any
/// completion with a ticket <= N is discarded. Failures never clear the
/// current value.
#[derive(Clone, Debug)]
pub struct Slot<T> {
    value: Option<T>,
    issued: u64,
    settled: u64,
    error: Option<String>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self { value: None, issued: 0, settled: 0, error: None }
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    fn settle(&mut self, ticket: Ticket) -> LoadOutcome {
        if ticket.0 <= self.settled {
            return LoadOutcome::Stale;
        }
        self.settled = ticket.0;
        LoadOutcome::Applied
    }

    pub fn complete(&mut self, ticket: Ticket, value: T) -> LoadOutcome {
        let outcome = self.settle(ticket);
        if outcome == LoadOutcome::Applied {
            self.value = Some(value);
            self.error = None;
        }
        outcome
    }

    /// Record a failed request; the previous value stays visible
    pub fn fail(&mut self, ticket: Ticket, message: impl Into<String>) -> LoadOutcome {
        let outcome = self.settle(ticket);
        if outcome == LoadOutcome::Applied {
            self.error = Some(message.into());
        }
        outcome
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Error of the latest settled request, cleared by the next success
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }

    /// Requests issued but not yet settled (a later settle also covers earlier ones)
    pub fn in_flight(&self) -> bool {
        self.issued > self.settled
    }
}

// ============= Reentrancy guard =============

/// Shared busy flag of a refresh trigger
#[derive(Clone, Debug, Default)]
pub struct RefreshGate {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of a refresh; releases the gate on drop, so both
/// success and failure paths restore the trigger.
#[derive(Debug)]
pub struct RefreshPermit {
    busy: Arc<AtomicBool>,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<RefreshPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshPermit { busy: self.busy.clone() })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for RefreshPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

// ============= Notices =============

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    /// Banner color suffix
    pub fn tone(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "danger",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Option<Instant>,
}

/// Lifetimes per notice kind. Errors stay until dismissed unless `error_ttl` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoticePolicy {
    pub success_ttl: Duration,
    pub error_ttl: Option<Duration>,
}

impl NoticePolicy {
    pub fn new(success_ttl: Duration, error_ttl: Option<Duration>) -> Self {
        Self { success_ttl, error_ttl }
    }

    fn ttl(&self, kind: NoticeKind) -> Option<Duration> {
        match kind {
            NoticeKind::Success | NoticeKind::Info | NoticeKind::Warning => Some(self.success_ttl),
            NoticeKind::Error => self.error_ttl,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    next_id: u64,
    policy: NoticePolicy,
}

impl NoticeBoard {
    pub fn new(policy: NoticePolicy) -> Self {
        Self { notices: Vec::new(), next_id: 1, policy }
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            kind,
            message: message.into(),
            expires_at: self.policy.ttl(kind).map(|ttl| now + ttl),
        });
        if self.notices.len() > MAX_VISIBLE {
            let excess = self.notices.len() - MAX_VISIBLE;
            self.notices.drain(..excess);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Drop expired notices and return the rest, newest first
    pub fn active(&mut self, now: Instant) -> Vec<Notice> {
        self.notices
            .retain(|n| n.expires_at.map_or(true, |deadline| now < deadline));
        self.notices.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
