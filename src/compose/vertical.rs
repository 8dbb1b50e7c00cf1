//! Vertical composition: the reentrant dispatch core.
//!
//! Stacking `L` over `R` yields a single stage whose downward output from
//! `L` is re-fed into `R`'s command input, and whose upward output from
//! `R` is re-fed into `L`'s event input. A command emitted by `L` may
//! become an event `R` routes back up through `L` (and vice versa);
//! `loop_left`/`loop_right` below are that reentrant dispatch, implemented
//! as plain mutual recursion bounded by composition depth.

use anyhow::Result;

use crate::context::Context;
use crate::emission::{concat, Emission, EmissionItem};
use crate::pipe_pair::PipePair;
use crate::stage::Stage;

/// Vertical composition of two stages: `L`'s inner (command-below,
/// event-below) ports become internal wiring to `R`, invisible at the
/// composed stage's boundary.
pub struct Vertical<L, R> {
    left: L,
    right: R,
}

impl<L, R> Vertical<L, R> {
    /// Compose `left` over `right` into a single stage.
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L, R> Stage for Vertical<L, R>
where
    L: Stage,
    R: Stage<CmdAbove = L::CmdBelow, EvtAbove = L::EvtBelow, Management = L::Management>,
{
    type CmdAbove = L::CmdAbove;
    type CmdBelow = R::CmdBelow;
    type EvtAbove = L::EvtAbove;
    type EvtBelow = R::EvtBelow;
    type Management = L::Management;
    type Pipe = VerticalPipe<L::Pipe, R::Pipe>;

    fn apply(&self, ctx: &mut Context) -> Self::Pipe {
        let left = self.left.apply(ctx);
        let right = self.right.apply(ctx);
        VerticalPipe { left, right }
    }
}

/// The instantiated runtime of a [`Vertical`] composition.
pub struct VerticalPipe<LP, RP> {
    left: LP,
    right: RP,
}

impl<LP, RP> PipePair for VerticalPipe<LP, RP>
where
    LP: PipePair,
    RP: PipePair<CmdAbove = LP::CmdBelow, EvtAbove = LP::EvtBelow, Management = LP::Management>,
{
    type CmdAbove = LP::CmdAbove;
    type CmdBelow = RP::CmdBelow;
    type EvtAbove = LP::EvtAbove;
    type EvtBelow = RP::EvtBelow;
    type Management = LP::Management;

    fn on_command(
        &mut self,
        ctx: &mut Context,
        cmd: Self::CmdAbove,
    ) -> Result<Emission<Self::EvtAbove, Self::CmdBelow>> {
        let em = self.left.on_command(ctx, cmd)?;
        self.loop_left(ctx, em)
    }

    fn on_event(
        &mut self,
        ctx: &mut Context,
        evt: Self::EvtBelow,
    ) -> Result<Emission<Self::EvtAbove, Self::CmdBelow>> {
        let em = self.right.on_event(ctx, evt)?;
        self.loop_right(ctx, em)
    }

    fn on_management(
        &mut self,
        ctx: &mut Context,
        msg: &Self::Management,
    ) -> Result<Emission<Self::EvtAbove, Self::CmdBelow>> {
        let from_left = self.left.on_management(ctx, msg)?;
        let from_right = self.right.on_management(ctx, msg)?;
        let resolved_left = self.loop_left(ctx, from_left)?;
        let resolved_right = self.loop_right(ctx, from_right)?;
        // Left's output is appended before right's.
        Ok(concat(resolved_left, resolved_right))
    }
}

impl<LP, RP> VerticalPipe<LP, RP>
where
    LP: PipePair,
    RP: PipePair<CmdAbove = LP::CmdBelow, EvtAbove = LP::EvtBelow, Management = LP::Management>,
{
    /// Resolve an emission produced by `left` (or by `left`'s management
    /// handler) against `right`: downward commands are forwarded into
    /// `right.on_command` and their result re-resolved through
    /// `loop_right`; upward events pass straight through. An `UpEvent`
    /// produced mid-traversal exits upward without re-entering `left`.
    fn loop_left(
        &mut self,
        ctx: &mut Context,
        em: Emission<LP::EvtAbove, LP::CmdBelow>,
    ) -> Result<Emission<LP::EvtAbove, RP::CmdBelow>> {
        match em {
            Emission::Empty => Ok(Emission::Empty),
            Emission::OneEvent(e) => Ok(Emission::OneEvent(e)),
            Emission::OneCommand(c) => {
                let sub = self.right.on_command(ctx, c)?;
                self.loop_right(ctx, sub)
            }
            Emission::Many(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        EmissionItem::UpEvent(e) => out.push(EmissionItem::UpEvent(e)),
                        EmissionItem::DownCommand(c) => {
                            let sub = self.right.on_command(ctx, c)?;
                            let resolved = self.loop_right(ctx, sub)?;
                            out.extend(ctx.dealias(resolved).into_items());
                        }
                    }
                }
                Ok(Emission::from_items(out))
            }
        }
    }

    /// Symmetric to `loop_left`: resolve an emission produced by `right`
    /// against `left`. Downward commands pass straight through to exit at
    /// the bottom; upward events reenter `left.on_event`.
    fn loop_right(
        &mut self,
        ctx: &mut Context,
        em: Emission<RP::EvtAbove, RP::CmdBelow>,
    ) -> Result<Emission<LP::EvtAbove, RP::CmdBelow>> {
        match em {
            Emission::Empty => Ok(Emission::Empty),
            Emission::OneCommand(c) => Ok(Emission::OneCommand(c)),
            Emission::OneEvent(e) => {
                let sub = self.left.on_event(ctx, e)?;
                self.loop_left(ctx, sub)
            }
            Emission::Many(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        EmissionItem::DownCommand(c) => out.push(EmissionItem::DownCommand(c)),
                        EmissionItem::UpEvent(e) => {
                            let sub = self.left.on_event(ctx, e)?;
                            let resolved = self.loop_left(ctx, sub)?;
                            out.extend(ctx.dealias(resolved).into_items());
                        }
                    }
                }
                Ok(Emission::from_items(out))
            }
        }
    }
}
