//! The tick generator: a passthrough stage that keeps a periodic
//! [`crate::control::Control::Tick`] alive via the host's scheduler.
//!
//! This stage is transparent to ordinary traffic (commands and events
//! cross unchanged) and reactive only on its management path: a `Tick` it
//! receives is re-armed by asking the [`crate::context::Scheduler`]
//! capability to redeliver the same message after a configured interval.
//! It does not originate the first tick; a host kicks the cycle off with
//! one `management(&Control::Tick)` call after building the pipeline.

use std::time::Duration;

use anyhow::Result;

use crate::context::Context;
use crate::control::Control;
use crate::emission::Emission;
use crate::pipe_pair::PipePair;
use crate::stage::Stage;

/// A stage that forwards commands and events unchanged and, on each
/// `Tick`, asks the Context's scheduler capability to redeliver another
/// `Tick` after `interval`.
pub struct TickStage<T> {
    interval: Duration,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> TickStage<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> Clone for TickStage<T> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> Copy for TickStage<T> {}

impl<T> Stage for TickStage<T> {
    type CmdAbove = T;
    type CmdBelow = T;
    type EvtAbove = T;
    type EvtBelow = T;
    type Management = Control;
    type Pipe = TickPipe<T>;

    fn apply(&self, _ctx: &mut Context) -> Self::Pipe {
        TickPipe {
            interval: self.interval,
            _marker: std::marker::PhantomData,
        }
    }
}

/// The instantiated runtime of [`TickStage`]. Carries no state beyond the
/// configured interval; re-arming happens through the Context's scheduler
/// capability on every `Tick`, not through anything this pipe owns.
pub struct TickPipe<T> {
    interval: Duration,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> PipePair for TickPipe<T> {
    type CmdAbove = T;
    type CmdBelow = T;
    type EvtAbove = T;
    type EvtBelow = T;
    type Management = Control;

    fn on_command(&mut self, ctx: &mut Context, cmd: T) -> Result<Emission<T, T>> {
        Ok(ctx.single_command(cmd))
    }

    fn on_event(&mut self, ctx: &mut Context, evt: T) -> Result<Emission<T, T>> {
        Ok(ctx.single_event(evt))
    }

    fn on_management(&mut self, ctx: &mut Context, msg: &Control) -> Result<Emission<T, T>> {
        match msg {
            Control::Tick => {
                if let Some(scheduler) = ctx.scheduler() {
                    scheduler.schedule_after(self.interval, Box::new(Control::Tick));
                }
                Ok(ctx.nothing())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TokioScheduler;

    #[test]
    fn forwards_commands_and_events_unchanged() {
        let mut ctx = Context::new();
        let stage = TickStage::<String>::new(Duration::from_secs(1));
        let mut pipe = stage.apply(&mut ctx);

        let em = pipe.on_command(&mut ctx, "payload".to_string()).unwrap();
        assert_eq!(em.len(), 1);

        let em = pipe.on_event(&mut ctx, "payload".to_string()).unwrap();
        assert_eq!(em.len(), 1);
    }

    #[tokio::test]
    async fn tick_rearms_itself_through_the_scheduler() {
        let (scheduler, mut rx) = TokioScheduler::new();
        let mut ctx = Context::with_scheduler(scheduler);
        let stage = TickStage::<String>::new(Duration::from_millis(5));
        let mut pipe = stage.apply(&mut ctx);

        let em = pipe.on_management(&mut ctx, &Control::Tick).unwrap();
        assert!(em.is_empty());

        let redelivery = rx.recv().await.expect("rearmed tick");
        let tick = redelivery
            .payload
            .downcast::<Control>()
            .expect("Control payload");
        assert_eq!(*tick, Control::Tick);
    }

    #[test]
    fn without_a_scheduler_tick_is_a_harmless_no_op() {
        let mut ctx = Context::new();
        let stage = TickStage::<String>::new(Duration::from_secs(1));
        let mut pipe = stage.apply(&mut ctx);

        let em = pipe.on_management(&mut ctx, &Control::Tick).unwrap();
        assert!(em.is_empty());
    }
}
