//! Serialization of overlapping seek requests
//!
//! Each request receives a generation number. A newer request supersedes any
//! pending one, and only the latest request can complete.

use crate::{Result, SeekPlan, SeekResolver};
use seekpos_core::{Position, TimeRange};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Handle to an issued seek request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekTicket {
    generation: u64,
    plan: SeekPlan,
}

impl SeekTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn plan(&self) -> &SeekPlan {
        &self.plan
    }
}

/// Result of completing a seek
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOutcome {
    /// The request was the latest one; its plan is now in effect
    Completed(SeekPlan),
    /// A newer request replaced this one, or it was cancelled or already completed
    Superseded,
}

/// Thread-safe front end issuing seek requests against a resolver
pub struct SeekController {
    resolver: SeekResolver,
    generation: AtomicU64,
    pending: Mutex<Option<SeekTicket>>,
}

impl SeekController {
    pub fn new(resolver: SeekResolver) -> Self {
        Self {
            resolver,
            generation: AtomicU64::new(0),
            pending: Mutex::new(None),
        }
    }

    /// Resolves a position and makes it the pending seek, replacing any older one
    pub fn request(&self, position: Position, segment: Option<&TimeRange>) -> Result<SeekTicket> {
        let plan = self.resolver.resolve(&position, segment)?;

        // Generation is assigned under the lock so it matches replacement order
        let mut pending = self.lock_pending();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(previous) = pending.as_ref() {
            debug!(
                "Seek #{} superseded by #{}",
                previous.generation, generation
            );
        }

        let ticket = SeekTicket { generation, plan };
        *pending = Some(ticket);
        info!("Seek #{} requested to {}", generation, plan.resolved);
        Ok(ticket)
    }

    /// Marks a seek as done
    pub fn complete(&self, ticket: &SeekTicket) -> SeekOutcome {
        let mut pending = self.lock_pending();
        match pending.as_ref() {
            Some(current) if current.generation == ticket.generation => {
                *pending = None;
                info!("Seek #{} completed at {}", ticket.generation, ticket.plan.resolved);
                SeekOutcome::Completed(ticket.plan)
            }
            _ => {
                debug!("Seek #{} is no longer current", ticket.generation);
                SeekOutcome::Superseded
            }
        }
    }

    /// Drops the pending seek, if any
    pub fn cancel(&self) -> Option<SeekPlan> {
        self.lock_pending().take().map(|ticket| ticket.plan)
    }

    /// Plan of the pending seek, if any
    pub fn pending(&self) -> Option<SeekPlan> {
        self.lock_pending().as_ref().map(|ticket| ticket.plan)
    }

    /// Generation of the most recent request (0 before the first one)
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    pub fn resolver(&self) -> &SeekResolver {
        &self.resolver
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<SeekTicket>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MediaTimeline, ResolverConfig};
    use seekpos_core::MediaTime;

    fn controller() -> SeekController {
        let timeline =
            MediaTimeline::with_sync_interval(MediaTime::from_seconds(60.0), MediaTime::from_seconds(2.0))
                .unwrap();
        SeekController::new(SeekResolver::new(timeline, ResolverConfig::default()))
    }

    #[test]
    fn test_single_request_completes() {
        let controller = controller();
        let ticket = controller.request(Position::exact_seconds(10.0), None).unwrap();

        assert_eq!(ticket.generation(), 1);
        assert_eq!(controller.pending(), Some(*ticket.plan()));
        assert_eq!(controller.complete(&ticket), SeekOutcome::Completed(*ticket.plan()));
        assert_eq!(controller.pending(), None);
    }

    #[test]
    fn test_newer_request_supersedes_older() {
        let controller = controller();
        let first = controller.request(Position::exact_seconds(10.0), None).unwrap();
        let second = controller.request(Position::exact_seconds(20.0), None).unwrap();

        assert_eq!(controller.complete(&first), SeekOutcome::Superseded);
        assert_eq!(controller.pending(), Some(*second.plan()));
        assert!(matches!(controller.complete(&second), SeekOutcome::Completed(_)));
    }

    #[test]
    fn test_completing_twice_reports_superseded() {
        let controller = controller();
        let ticket = controller.request(Position::near_seconds(5.0), None).unwrap();
        assert!(matches!(controller.complete(&ticket), SeekOutcome::Completed(_)));
        assert_eq!(controller.complete(&ticket), SeekOutcome::Superseded);
    }

    #[test]
    fn test_cancel() {
        let controller = controller();
        let ticket = controller.request(Position::exact_seconds(10.0), None).unwrap();
        assert_eq!(controller.cancel(), Some(*ticket.plan()));
        assert_eq!(controller.complete(&ticket), SeekOutcome::Superseded);
    }

    #[test]
    fn test_failed_request_keeps_pending_seek() {
        let controller = controller();
        let ticket = controller.request(Position::exact_seconds(10.0), None).unwrap();

        let outside = TimeRange::new(MediaTime::from_seconds(100.0), MediaTime::from_seconds(110.0)).unwrap();
        assert!(controller.request(Position::exact_seconds(105.0), Some(&outside)).is_err());
        assert_eq!(controller.current_generation(), 1);
        assert_eq!(controller.pending(), Some(*ticket.plan()));
    }

    #[test]
    fn test_concurrent_requests_leave_one_winner() {
        let controller = controller();

        let tickets: Vec<SeekTicket> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let controller = &controller;
                    scope.spawn(move || {
                        controller
                            .request(Position::exact_seconds(i as f64), None)
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(controller.current_generation(), 8);
        let completed = tickets
            .iter()
            .filter(|ticket| matches!(controller.complete(ticket), SeekOutcome::Completed(_)))
            .count();
        assert_eq!(completed, 1);
    }
}
