#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that turns directional input into placement commands.

use tileworld_core::{CellCoord, Command, Delta, Direction, Event, GridSize, TerrainContext};
use tracing::trace;

/// Resolves a single move of the character.
///
/// A destination holding an obstacle rejects the move and the position is
/// returned unchanged. Otherwise each axis is clamped into the grid
/// independently. The clamped cell is checked against obstacles as well, so
/// the result is never blocked unless `position` itself is.
#[must_use]
pub fn resolve_move<F>(
    position: CellCoord,
    delta: Delta,
    size: GridSize,
    is_blocked: F,
) -> CellCoord
where
    F: Fn(CellCoord) -> bool,
{
    let (row, column) = position.offset(delta);
    let Some(clamped) = size.clamp(row, column) else {
        return position;
    };
    if is_blocked(clamped) {
        return position;
    }
    clamped
}

/// Result of feeding one input through the movement system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A placement command toward the contained cell was emitted.
    Moved(CellCoord),
    /// The input was resolved but left the character where it stood.
    Blocked,
    /// No input arrived or the session does not accept movement yet.
    Idle,
}

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    ready: bool,
}

impl Movement {
    /// Consumes world events and the current input to emit movement commands.
    ///
    /// Readiness follows the session lifecycle: terrain regeneration pauses
    /// movement and [`Event::SessionReady`] resumes it.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: Option<Direction>,
        terrain: Option<&TerrainContext>,
        character: Option<CellCoord>,
        out: &mut Vec<Command>,
    ) -> MoveOutcome {
        for event in events {
            match event {
                Event::TerrainGenerated { .. } => self.ready = false,
                Event::SessionReady => self.ready = true,
                _ => {}
            }
        }

        if !self.ready {
            return MoveOutcome::Idle;
        }
        let (Some(direction), Some(terrain), Some(position)) = (input, terrain, character) else {
            return MoveOutcome::Idle;
        };

        let destination = resolve_move(position, direction.delta(), terrain.size(), |cell| {
            terrain.is_obstacle(cell)
        });
        if destination == position {
            trace!(%position, direction = direction.abbreviation(), "move had no effect");
            return MoveOutcome::Blocked;
        }

        out.push(Command::PlaceCharacter { cell: destination });
        MoveOutcome::Moved(destination)
    }

    /// Reports whether the system currently accepts input.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}
