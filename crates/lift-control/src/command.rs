//! Commands: the only way control logic can change the simulation.

use lift_core::ElevatorId;

/// An action requested by control logic during one tick.
///
/// Commands are collected from [`ControlLogic::tick`][crate::ControlLogic::tick]
/// and applied by the engine, in order, after the call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Queue a stop at `floor` for `elevator`.
    ///
    /// `floor` is deliberately wide and signed: out-of-range values are
    /// clamped by the elevator rather than rejected.
    GoToFloor {
        elevator: ElevatorId,
        floor:    i64,
    },
}

impl Command {
    /// The elevator this command targets.
    pub fn elevator(&self) -> ElevatorId {
        match *self {
            Command::GoToFloor { elevator, .. } => elevator,
        }
    }
}
