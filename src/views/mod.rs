//! View-sync controllers
//!
//! One controller per page. Each owns its state behind a `std::sync::Mutex`
//! and drives fetch → normalize → state for its slices. Locks are taken only
//! between awaits: a load begins its ticket under the lock, releases it for
//! the request, then re-locks to settle the result.

pub mod forecast;
pub mod report;
pub mod settings;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::constants::events;
use crate::error::FetchError;
use crate::state::{LoadOutcome, NoticeBoard, NoticeKind, Slot, Ticket};

pub use forecast::{ForecastState, ForecastView};
pub use report::{ReportState, ReportView};
pub use settings::{ParametersForm, PositionField, SchedulerForm, SettingsState, SettingsView, TickerForm};

/// Result of a guarded manual trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The trigger ran to completion (successfully or not)
    Ran,
    /// Another refresh of the same view was in flight
    Busy,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Logging and notice policy of one fetched slice
pub(crate) struct Pipeline {
    pub tag: &'static str,
    pub event: &'static str,
    /// Notice text for transport failures and message-less domain errors
    pub fallback: &'static str,
    /// Whether `ok: false` also raises a notice
    pub notify_domain: bool,
}

impl Pipeline {
    /// Settle a finished fetch into its slot.
    ///
    /// Failures keep the previous value. Notices are raised only when the
    /// failed request is the latest one to settle.
    pub(crate) fn settle<T>(
        &self,
        slot: &mut Slot<T>,
        notices: &mut NoticeBoard,
        ticket: Ticket,
        result: Result<T, FetchError>,
    ) -> Result<LoadOutcome, FetchError> {
        match result {
            Ok(value) => {
                let outcome = slot.complete(ticket, value);
                match outcome {
                    LoadOutcome::Applied => debug!("{} {} ticket={}", self.tag, self.event, ticket.seq()),
                    LoadOutcome::Stale => debug!(
                        "{} {} ({}) ticket={}",
                        self.tag,
                        events::STALE_RESPONSE_DISCARDED,
                        self.event,
                        ticket.seq()
                    ),
                }
                Ok(outcome)
            }
            Err(e) => {
                let message = e.user_message(self.fallback);
                if slot.fail(ticket, message.clone()) == LoadOutcome::Applied {
                    if e.is_transport() {
                        error!("{} {}: {}", self.tag, events::LOAD_FAILED, e);
                        notices.push(NoticeKind::Error, self.fallback, Instant::now());
                    } else if self.notify_domain {
                        warn!("{} {}: {}", self.tag, events::LOAD_FAILED, e);
                        notices.push(NoticeKind::Error, message, Instant::now());
                    }
                } else {
                    debug!("{} {} (failed) ticket={}", self.tag, events::STALE_RESPONSE_DISCARDED, ticket.seq());
                }
                Err(e)
            }
        }
    }
}
