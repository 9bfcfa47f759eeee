//! Collective dispatcher: riders first, then the nearest unserved call.

use std::collections::BTreeSet;

use lift_control::{Command, ControlContext, ControlEvent, ControlLogic, ControlResult, ElevatorSnapshot};
use tracing::debug;

/// Sends each idle elevator to its nearest rider destination, or failing
/// that to the nearest call no other elevator is already heading for.
/// Moving elevators pick up stops they are about to pass when they have room.
pub struct Collective;

fn nearest(e: &ElevatorSnapshot, floors: impl Iterator<Item = u32>) -> Option<u32> {
    floors.min_by_key(|&f| f.abs_diff(e.current_floor))
}

impl ControlLogic for Collective {
    fn start(&mut self, ctx: &ControlContext) -> ControlResult<()> {
        debug!(elevators = ctx.elevators.len(), floors = ctx.floors.len(), "collective dispatcher ready");
        Ok(())
    }

    fn tick(&mut self, ctx: &ControlContext) -> ControlResult<Vec<Command>> {
        let mut commands = Vec::new();

        // Stops about to be passed.
        for event in &ctx.events {
            if let ControlEvent::PassingFloor { elevator, floor, .. } = *event {
                let Some(e) = ctx.elevators.get(elevator.index()) else {
                    continue;
                };
                if e.pressed_floors.contains(&floor) || !e.is_full() {
                    commands.push(e.go_to_floor(floor as i64));
                }
            }
        }

        let mut claimed: BTreeSet<u32> = ctx
            .elevators
            .iter()
            .filter_map(|e| e.destination)
            .chain(ctx.elevators.iter().flat_map(|e| e.queue.iter().copied()))
            .collect();

        for e in ctx.elevators.iter().filter(|e| e.is_idle()) {
            let target = nearest(e, e.pressed_floors.iter().copied()).or_else(|| {
                nearest(e, ctx.calls().map(|f| f.level).filter(|f| !claimed.contains(f)))
            });
            if let Some(floor) = target {
                claimed.insert(floor);
                commands.push(e.go_to_floor(floor as i64));
            }
        }

        Ok(commands)
    }
}
