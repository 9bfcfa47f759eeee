//! The `ControlLogic` trait: the main extension point for user code.

use crate::{Command, ControlContext, ControlResult};

/// Pluggable dispatch logic.
///
/// Implement this trait to decide where elevators go.  Every method receives
/// an owned-data [`ControlContext`]; the only way to affect the simulation
/// is to return [`Command`]s.
///
/// # Required methods
///
/// Only [`tick`][Self::tick] is required.  [`start`][Self::start] has a no-op
/// default so simple controllers don't need to implement it.
///
/// # Failure
///
/// Returning `Err` (or panicking) is reported to the host and discards the
/// commands of that call; the simulation carries on with the next frame.
///
/// # Example
///
/// ```rust,ignore
/// struct GroundFloorShuttle;
///
/// impl ControlLogic for GroundFloorShuttle {
///     fn tick(&mut self, ctx: &ControlContext) -> ControlResult<Vec<Command>> {
///         Ok(ctx
///             .elevators
///             .iter()
///             .filter(|e| e.is_idle())
///             .map(|e| e.go_to_floor(0))
///             .collect())
///     }
/// }
/// ```
pub trait ControlLogic: 'static {
    /// Called once when the challenge starts, before the first tick.
    fn start(&mut self, _ctx: &ControlContext) -> ControlResult<()> {
        Ok(())
    }

    /// Called once per frame, after physics has advanced by `ctx.dt`.
    fn tick(&mut self, ctx: &ControlContext) -> ControlResult<Vec<Command>>;
}

impl<L: ControlLogic + ?Sized> ControlLogic for Box<L> {
    fn start(&mut self, ctx: &ControlContext) -> ControlResult<()> {
        (**self).start(ctx)
    }

    fn tick(&mut self, ctx: &ControlContext) -> ControlResult<Vec<Command>> {
        (**self).tick(ctx)
    }
}

/// Adapter turning a closure into a [`ControlLogic`].  Build with [`from_fn`].
pub struct FnControl<F>(F);

/// Wrap `f` so it can be used wherever a [`ControlLogic`] is expected.
pub fn from_fn<F>(f: F) -> FnControl<F>
where
    F: FnMut(&ControlContext) -> ControlResult<Vec<Command>> + 'static,
{
    FnControl(f)
}

impl<F> ControlLogic for FnControl<F>
where
    F: FnMut(&ControlContext) -> ControlResult<Vec<Command>> + 'static,
{
    fn tick(&mut self, ctx: &ControlContext) -> ControlResult<Vec<Command>> {
        (self.0)(ctx)
    }
}
