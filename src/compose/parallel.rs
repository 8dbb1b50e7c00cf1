//! Parallel composition: one stage's command path paired with another's
//! event path.
//!
//! Unlike [`super::vertical::Vertical`], the two sides never call into
//! each other: `left` owns the full command pipeline (`on_command`) and
//! `right` owns the full event pipeline (`on_event`), so there is no
//! reentrant dispatch. Both sides see every management message, left
//! before right, matching `Vertical`'s ordering convention. The discarded
//! sides (`left.on_event`, `right.on_command`) are unreachable by
//! construction, so no dispatch is needed for them.

use anyhow::Result;

use crate::context::Context;
use crate::emission::{concat, Emission};
use crate::pipe_pair::PipePair;
use crate::stage::Stage;

/// Parallel composition of two stages: `left`'s command pipeline and
/// `right`'s event pipeline, glued at the same above/below port types.
pub struct Parallel<L, R> {
    left: L,
    right: R,
}

impl<L, R> Parallel<L, R> {
    /// Pair `left`'s command path with `right`'s event path into a single
    /// stage.
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L, R> Stage for Parallel<L, R>
where
    L: Stage,
    R: Stage<
        CmdAbove = L::CmdAbove,
        CmdBelow = L::CmdBelow,
        EvtAbove = L::EvtAbove,
        EvtBelow = L::EvtBelow,
        Management = L::Management,
    >,
{
    type CmdAbove = L::CmdAbove;
    type CmdBelow = L::CmdBelow;
    type EvtAbove = L::EvtAbove;
    type EvtBelow = L::EvtBelow;
    type Management = L::Management;
    type Pipe = ParallelPipe<L::Pipe, R::Pipe>;

    fn apply(&self, ctx: &mut Context) -> Self::Pipe {
        let left = self.left.apply(ctx);
        let right = self.right.apply(ctx);
        ParallelPipe { left, right }
    }
}

/// The instantiated runtime of a [`Parallel`] composition.
pub struct ParallelPipe<LP, RP> {
    left: LP,
    right: RP,
}

impl<LP, RP> PipePair for ParallelPipe<LP, RP>
where
    LP: PipePair,
    RP: PipePair<
        CmdAbove = LP::CmdAbove,
        CmdBelow = LP::CmdBelow,
        EvtAbove = LP::EvtAbove,
        EvtBelow = LP::EvtBelow,
        Management = LP::Management,
    >,
{
    type CmdAbove = LP::CmdAbove;
    type CmdBelow = LP::CmdBelow;
    type EvtAbove = LP::EvtAbove;
    type EvtBelow = LP::EvtBelow;
    type Management = LP::Management;

    fn on_command(
        &mut self,
        ctx: &mut Context,
        cmd: Self::CmdAbove,
    ) -> Result<Emission<Self::EvtAbove, Self::CmdBelow>> {
        self.left.on_command(ctx, cmd)
    }

    fn on_event(
        &mut self,
        ctx: &mut Context,
        evt: Self::EvtBelow,
    ) -> Result<Emission<Self::EvtAbove, Self::CmdBelow>> {
        self.right.on_event(ctx, evt)
    }

    fn on_management(
        &mut self,
        ctx: &mut Context,
        msg: &Self::Management,
    ) -> Result<Emission<Self::EvtAbove, Self::CmdBelow>> {
        let from_left = self.left.on_management(ctx, msg)?;
        let from_right = self.right.on_management(ctx, msg)?;
        Ok(concat(from_left, from_right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use crate::injector::{build, CommandSink, EventSink};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct VecSinks {
        commands: Rc<RefCell<Vec<String>>>,
        events: Rc<RefCell<Vec<String>>>,
    }

    impl CommandSink<String> for VecSinks {
        fn on_command(&mut self, cmd: String) {
            self.commands.borrow_mut().push(cmd);
        }
    }
    impl EventSink<String> for VecSinks {
        fn on_event(&mut self, evt: String) {
            self.events.borrow_mut().push(evt);
        }
    }

    #[test]
    fn command_path_routes_through_left_only() {
        // Left uppercases commands; right would lowercase them. Only
        // left's transform should be visible on the command path.
        struct Upper;
        struct UpperPipe;
        impl Stage for Upper {
            type CmdAbove = String;
            type CmdBelow = String;
            type EvtAbove = String;
            type EvtBelow = String;
            type Management = ();
            type Pipe = UpperPipe;
            fn apply(&self, _ctx: &mut Context) -> UpperPipe {
                UpperPipe
            }
        }
        impl PipePair for UpperPipe {
            type CmdAbove = String;
            type CmdBelow = String;
            type EvtAbove = String;
            type EvtBelow = String;
            type Management = ();
            fn on_command(
                &mut self,
                ctx: &mut Context,
                cmd: String,
            ) -> Result<Emission<String, String>> {
                Ok(ctx.single_command(cmd.to_uppercase()))
            }
            fn on_event(
                &mut self,
                ctx: &mut Context,
                evt: String,
            ) -> Result<Emission<String, String>> {
                Ok(ctx.single_event(evt))
            }
            fn on_management(
                &mut self,
                ctx: &mut Context,
                _msg: &(),
            ) -> Result<Emission<String, String>> {
                Ok(ctx.nothing())
            }
        }

        struct Lower;
        struct LowerPipe;
        impl Stage for Lower {
            type CmdAbove = String;
            type CmdBelow = String;
            type EvtAbove = String;
            type EvtBelow = String;
            type Management = ();
            type Pipe = LowerPipe;
            fn apply(&self, _ctx: &mut Context) -> LowerPipe {
                LowerPipe
            }
        }
        impl PipePair for LowerPipe {
            type CmdAbove = String;
            type CmdBelow = String;
            type EvtAbove = String;
            type EvtBelow = String;
            type Management = ();
            fn on_command(
                &mut self,
                ctx: &mut Context,
                cmd: String,
            ) -> Result<Emission<String, String>> {
                Ok(ctx.single_command(cmd.to_lowercase()))
            }
            fn on_event(
                &mut self,
                ctx: &mut Context,
                evt: String,
            ) -> Result<Emission<String, String>> {
                Ok(ctx.single_event(evt.to_lowercase()))
            }
            fn on_management(
                &mut self,
                ctx: &mut Context,
                _msg: &(),
            ) -> Result<Emission<String, String>> {
                Ok(ctx.nothing())
            }
        }

        let stage = Parallel::new(Upper, Lower);
        let mut ctx = Context::new();
        let sink = VecSinks::default();
        let commands_seen = sink.commands.clone();
        let events_seen = sink.events.clone();
        let mut injector = build(&stage, &mut ctx, sink);
        injector.inject_command("Abc".to_string());
        injector.inject_event("Xyz".to_string());
        assert_eq!(*commands_seen.borrow(), vec!["ABC".to_string()]);
        assert_eq!(*events_seen.borrow(), vec!["xyz".to_string()]);
    }

    #[test]
    fn identity_over_identity_forwards_both_paths() {
        let stage: Parallel<Identity<String, ()>, Identity<String, ()>> =
            Parallel::new(Identity::new(), Identity::new());
        let mut ctx = Context::new();
        let sink = VecSinks::default();
        let commands_seen = sink.commands.clone();
        let mut injector = build(&stage, &mut ctx, sink);
        injector.inject_command("hi".to_string());
        assert_eq!(*commands_seen.borrow(), vec!["hi".to_string()]);
    }
}
