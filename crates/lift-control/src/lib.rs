//! `lift-control`: the surface externally supplied control logic sees.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`command`]  | `Command` enum (`GoToFloor`)                                      |
//! | [`snapshot`] | `ControlContext`, elevator/floor snapshots, `ControlEvent`        |
//! | [`model`]    | `ControlLogic` trait, `FnControl` closure adapter                 |
//! | [`noop`]     | `NoopController`: placeholder that never issues commands          |
//! | [`error`]    | `ControlError`, `ControlResult<T>`                                |
//!
//! # Design notes
//!
//! Each frame the engine runs in two phases:
//!
//! 1. **Decide**: build an owned [`ControlContext`] and call
//!    `ControlLogic::tick` once.  The logic only ever sees copies, so it can
//!    neither observe nor cause a half-applied state.
//!
//! 2. **Apply**: after the call returns, the engine applies the returned
//!    [`Command`]s in order.  If the logic failed, nothing is applied.
//!
//! Because snapshots are plain values, logic hosted elsewhere (another
//! thread, process, or runtime) can be fed the same context serialized.

pub mod command;
pub mod error;
pub mod model;
pub mod noop;
pub mod snapshot;


pub use command::Command;
pub use error::{ControlError, ControlResult};
pub use model::{from_fn, ControlLogic, FnControl};
pub use noop::NoopController;
pub use snapshot::{ControlContext, ControlEvent, ElevatorSnapshot, FloorSnapshot};
