use lift_core::PassengerId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildingError {
    #[error("passenger origin and destination are both floor {0}")]
    SameFloor(u32),

    #[error("{passenger} cannot {action} while {state}")]
    InvalidTransition {
        passenger: PassengerId,
        action:    &'static str,
        state:     &'static str,
    },
}

pub type BuildingResult<T> = Result<T, BuildingError>;
