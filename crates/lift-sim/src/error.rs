use lift_building::BuildingError;
use lift_control::ControlError;
use thiserror::Error;

use crate::ControllerState;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("challenge configuration error: {0}")]
    Config(String),

    #[error("cannot {action} while the controller is {state}")]
    InvalidState {
        action: &'static str,
        state:  ControllerState,
    },

    #[error("floor {floor} is outside a {floor_count}-floor building")]
    UnknownFloor { floor: u32, floor_count: u32 },

    #[error(transparent)]
    Building(#[from] BuildingError),

    #[error("control logic rejected: {0}")]
    Control(#[from] ControlError),
}

pub type SimResult<T> = Result<T, SimError>;
