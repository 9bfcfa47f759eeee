//! `lift-building`: the entities the simulation engine owns.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`floor`]     | `Floor`: call-button state for one level                    |
//! | [`passenger`] | `Passenger`, `PassengerState`: rider lifecycle              |
//! | [`elevator`]  | `Elevator`: motion state machine and request queue          |
//! | [`error`]     | `BuildingError`, `BuildingResult<T>`                        |
//!
//! None of these types hold policy about *when* things happen: the engine
//! in `lift-sim` decides when to press or clear buttons, when passengers
//! board, and when elevators tick.

pub mod elevator;
pub mod error;
pub mod floor;
pub mod passenger;


pub use elevator::{Elevator, ACCELERATION, DECELERATION, DEFAULT_TOP_SPEED, NOMINAL_RIDER_WEIGHT};
pub use error::{BuildingError, BuildingResult};
pub use floor::Floor;
pub use passenger::{Passenger, PassengerState};
