//! A no-op controller: elevators never move.

use crate::{Command, ControlContext, ControlLogic, ControlResult};

/// A [`ControlLogic`] that always returns an empty command list.
///
/// Useful as a placeholder in tests, or to watch the call buttons pile up.
pub struct NoopController;

impl ControlLogic for NoopController {
    fn tick(&mut self, _ctx: &ControlContext) -> ControlResult<Vec<Command>> {
        Ok(vec![])
    }
}
