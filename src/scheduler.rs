//! A tokio-backed [`Scheduler`] for hosts that want to wire a pipeline's
//! tick stage up to real wall-clock delivery.
//!
//! Scheduling of periodic ticks is an external collaborator the core
//! plugs into, not part of the core itself; this module is that
//! collaborator, wiring `tokio` timers around a pipeline's stages rather
//! than baking timing into the stage trait itself.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::context::Scheduler;

/// A message redelivered by [`TokioScheduler`] after its requested delay.
///
/// Carries only the type-erased payload a stage asked to be redelivered;
/// the host is responsible for downcasting it back into the management
/// message type its pipeline expects before calling
/// [`crate::Injector::management`].
pub struct Redelivery {
    pub payload: Box<dyn std::any::Any + Send>,
}

/// A [`Scheduler`] that spawns a tokio timer task per request and pushes
/// the redelivered payload onto an mpsc channel a host task drains.
///
/// One `TokioScheduler` is meant to be shared (via `Arc`) across every
/// stage in a single pipeline's [`crate::Context`]; scheduling is a host
/// capability, not a per-stage resource.
pub struct TokioScheduler {
    sender: mpsc::UnboundedSender<Redelivery>,
    pending: Arc<Mutex<usize>>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver a host task should poll to
    /// learn when a scheduled message is due.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Redelivery>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                sender,
                pending: Arc::new(Mutex::new(0)),
            }),
            receiver,
        )
    }

    /// Number of scheduled deliveries not yet fired. Exposed for hosts
    /// (and tests) that want to confirm a tick re-armed before shutting
    /// down.
    pub fn pending(&self) -> usize {
        *self.pending.lock().unwrap()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, msg: Box<dyn std::any::Any + Send>) {
        *self.pending.lock().unwrap() += 1;
        let sender = self.sender.clone();
        let pending = self.pending.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            *pending.lock().unwrap() -= 1;
            let _ = sender.send(Redelivery { payload: msg });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schedules_and_redelivers_after_delay() {
        let (scheduler, mut rx) = TokioScheduler::new();
        scheduler.schedule_after(Duration::from_millis(5), Box::new(42u32));
        assert_eq!(scheduler.pending(), 1);

        let redelivered = rx.recv().await.expect("redelivery");
        let payload = redelivered
            .payload
            .downcast::<u32>()
            .expect("payload type");
        assert_eq!(*payload, 42);
    }
}
