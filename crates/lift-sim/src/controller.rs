//! Frame-driven controller: challenge lifecycle, pause, and time scale.

use std::fmt;

use lift_control::ControlLogic;
use tracing::{debug, info};

use crate::{ChallengeConfig, EndCondition, Engine, EngineBuilder, ObserverSet, SimError, SimObserver, SimResult};

/// Lower bound for the time-scale factor.
pub const MIN_TIME_SCALE: f64 = 0.1;
/// Upper bound for the time-scale factor.
pub const MAX_TIME_SCALE: f64 = 40.0;
/// Longest real-time frame honoured; longer gaps (a stalled host) are cut to this.
pub const MAX_FRAME_DT: f64 = 3.0 / 60.0;
/// Largest simulated step handed to [`Engine::tick`].
pub const SUBSTEP_DT: f64 = 1.0 / 60.0;

/// Lifecycle of the [`Controller`].
///
/// ```text
/// Uninitialized ──initialize──▶ Ready ──start──▶ Running ──end condition──▶ Ended
///                                 ▲                 │
///                                 └──────stop───────┘ (resume returns to Running)
/// ```
///
/// `initialize_challenge` is accepted in every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Ready,
    Running,
    Ended,
}

impl ControllerState {
    pub fn as_str(self) -> &'static str {
        match self {
            ControllerState::Uninitialized => "uninitialized",
            ControllerState::Ready         => "ready",
            ControllerState::Running       => "running",
            ControllerState::Ended         => "ended",
        }
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the current challenge and drives it from host frames.
///
/// The host calls [`frame`][Controller::frame] with the real time elapsed
/// since its previous frame.  While running, that delta is capped at
/// [`MAX_FRAME_DT`], multiplied by the time scale, and simulated in equal
/// sub-steps of at most [`SUBSTEP_DT`]; the control logic is then called
/// once with the whole scaled delta.
pub struct Controller {
    state:      ControllerState,
    engine:     Option<Engine>,
    logic:      Option<Box<dyn ControlLogic>>,
    time_scale: f64,
    observers:  ObserverSet,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            state:      ControllerState::Uninitialized,
            engine:     None,
            logic:      None,
            time_scale: 1.0,
            observers:  ObserverSet::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Not currently running, for whatever reason.
    pub fn is_paused(&self) -> bool {
        self.state != ControllerState::Running
    }

    pub fn is_challenge_ended(&self) -> bool {
        self.engine.as_ref().is_some_and(Engine::is_challenge_ended)
    }

    /// Register an observer for every notification from now on, including
    /// those of later challenges.
    pub fn subscribe(&mut self, observer: Box<dyn SimObserver>) {
        self.observers.subscribe(observer);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Replace the current challenge with a fresh one.
    ///
    /// Validation happens first: on error nothing changes.  On success any
    /// control logic from the previous challenge is dropped and the
    /// controller is `Ready`.
    pub fn initialize_challenge(
        &mut self,
        config:        ChallengeConfig,
        end_condition: impl EndCondition + 'static,
    ) -> SimResult<()> {
        let engine = EngineBuilder::new(config).end_condition(end_condition).build()?;
        self.engine = Some(engine);
        self.logic = None;
        self.set_state(ControllerState::Ready);
        Ok(())
    }

    /// Run `logic`'s start hook, then begin running.
    ///
    /// If the start hook fails or panics the error is reported to observers
    /// and returned, and the controller stays `Ready`.
    pub fn start<L: ControlLogic>(&mut self, logic: L) -> SimResult<()> {
        if self.state != ControllerState::Ready {
            return Err(self.invalid("start"));
        }
        let Some(engine) = self.engine.as_mut() else {
            return Err(self.invalid("start"));
        };
        let mut logic: Box<dyn ControlLogic> = Box::new(logic);
        if let Err(err) = engine.start_user_code(logic.as_mut()) {
            self.observers.on_user_code_error(&err);
            return Err(err.into());
        }
        self.logic = Some(logic);
        self.set_state(ControllerState::Running);
        info!("challenge started");
        Ok(())
    }

    /// Pause.  A no-op unless running.
    pub fn stop(&mut self) {
        if self.state == ControllerState::Running {
            self.set_state(ControllerState::Ready);
            info!("challenge paused");
        }
    }

    /// Continue after [`stop`][Controller::stop].  Requires a started
    /// challenge that has not ended.
    pub fn resume(&mut self) -> SimResult<()> {
        match self.state {
            ControllerState::Running => Ok(()),
            ControllerState::Ready if self.logic.is_some() => {
                self.set_state(ControllerState::Running);
                info!("challenge resumed");
                Ok(())
            }
            _ => Err(self.invalid("resume")),
        }
    }

    pub fn toggle_pause(&mut self) -> SimResult<()> {
        if self.state == ControllerState::Running {
            self.stop();
            Ok(())
        } else {
            self.resume()
        }
    }

    /// Set the time-scale factor, clamped to
    /// [`MIN_TIME_SCALE`]`..=`[`MAX_TIME_SCALE`].  Non-finite input maps to
    /// the minimum.  Returns the value actually applied.
    pub fn set_time_scale(&mut self, factor: f64) -> f64 {
        self.time_scale = if factor.is_finite() {
            factor.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE)
        } else {
            MIN_TIME_SCALE
        };
        debug!(scale = self.time_scale, "time scale changed");
        self.observers.on_time_scale_changed(self.time_scale, self.is_paused());
        self.time_scale
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    /// Advance by one host frame of `real_dt` seconds.
    ///
    /// Does nothing unless running.  Returns the simulated seconds covered.
    pub fn frame(&mut self, real_dt: f64) -> f64 {
        if self.state != ControllerState::Running || !real_dt.is_finite() || real_dt <= 0.0 {
            return 0.0;
        }
        let (Some(engine), Some(logic)) = (self.engine.as_mut(), self.logic.as_mut()) else {
            return 0.0;
        };

        let scaled = real_dt.min(MAX_FRAME_DT) * self.time_scale;
        // The tolerance keeps an exact multiple of SUBSTEP_DT from rounding up.
        let steps = (scaled / SUBSTEP_DT - 1e-9).ceil().max(1.0) as usize;
        let step = scaled / steps as f64;
        for _ in 0..steps {
            engine.tick(step, &mut self.observers);
            if engine.is_challenge_ended() {
                break;
            }
        }

        if !engine.is_challenge_ended() {
            // Errors are already logged and reported to observers.
            let _ = engine.call_user_code(logic.as_mut(), scaled, &mut self.observers);
            return scaled;
        }
        debug!(outcome = ?engine.outcome(), "controller ended");
        self.set_state(ControllerState::Ended);
        scaled
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn set_state(&mut self, state: ControllerState) {
        let was_paused = self.is_paused();
        self.state = state;
        if was_paused != self.is_paused() {
            self.observers.on_time_scale_changed(self.time_scale, self.is_paused());
        }
    }

    fn invalid(&self, action: &'static str) -> SimError {
        SimError::InvalidState { action, state: self.state }
    }
}
