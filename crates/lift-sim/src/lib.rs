//! `lift-sim`: simulation engine and controller for the liftsim elevator
//! simulator.
//!
//! # Frame loop
//!
//! ```text
//! Controller::frame(real_dt):
//!   scaled = min(real_dt, 3/60) × time_scale
//!   repeat ⌈scaled / (1/60)⌉ times:
//!     Engine::tick(step)
//!       ① clock     : advance simulated time
//!       ② spawn     : new passengers; call buttons lit
//!       ③ elevators : motion, passing-floor events, exit/board on arrival
//!       ④ cleanup   : exited passengers dropped
//!       ⑤ notify    : state; end condition; throttled statistics
//!   Engine::call_user_code(scaled)
//!       snapshot + pending events → ControlLogic::tick → apply commands
//! ```
//!
//! # Modules
//!
//! | Module            | Contents                                           |
//! |-------------------|----------------------------------------------------|
//! | [`config`]        | `ChallengeConfig` and its validation              |
//! | [`builder`]       | `EngineBuilder`                                    |
//! | [`engine`]        | `Engine`: tick loop and control-logic boundary     |
//! | [`controller`]    | `Controller`: lifecycle, pause, time scale         |
//! | [`spawn`]         | Passenger stream (`Spawner`, `LobbyBias`)          |
//! | [`stats`]         | `Statistics`                                       |
//! | [`throttle`]      | `StatsThrottle`                                    |
//! | [`end_condition`] | `EndCondition`, `Goal`, `Outcome`                  |
//! | [`challenge`]     | Built-in `presets()`                               |
//! | [`observer`]      | `SimObserver`, `ObserverSet`, `StateView`          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lift_control::NoopController;
//! use lift_sim::{challenge, Controller};
//!
//! let preset = &challenge::presets()[0];
//! let mut controller = Controller::new();
//! controller.initialize_challenge(preset.config.clone(), preset.goal)?;
//! controller.start(NoopController)?;
//! while !controller.is_challenge_ended() {
//!     controller.frame(1.0 / 60.0);
//! }
//! ```

pub mod builder;
pub mod challenge;
pub mod config;
pub mod controller;
pub mod end_condition;
pub mod engine;
pub mod error;
pub mod observer;
pub mod spawn;
pub mod stats;
pub mod throttle;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;
pub use challenge::{presets, Challenge};
pub use config::ChallengeConfig;
pub use controller::{Controller, ControllerState, MAX_FRAME_DT, MAX_TIME_SCALE, MIN_TIME_SCALE, SUBSTEP_DT};
pub use end_condition::{EndCondition, Goal, Outcome};
pub use engine::Engine;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, ObserverSet, SimObserver, StateView};
pub use spawn::{LobbyBias, Spawner, LOBBY_BIAS};
pub use stats::Statistics;
pub use throttle::{StatsThrottle, MAX_STATS_PER_SEC};
