#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Tileworld.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tileworld_core::{
    CellCoord, Command, Event, MoveRejection, SessionConfig, SessionState, TerrainContext,
    WELCOME_BANNER,
};
use tileworld_system_generation::{GenerationTuning, TerrainGenerator};
use tracing::{debug, info, warn};

/// Represents the authoritative Tileworld session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    state: SessionState,
    generator: TerrainGenerator,
    config: Option<SessionConfig>,
    terrain: Option<TerrainContext>,
    character: Option<CellCoord>,
}

impl World {
    /// Creates an uninitialized world that generates terrain with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(GenerationTuning::default())
    }

    /// Creates an uninitialized world that generates terrain with the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: GenerationTuning) -> Self {
        Self {
            banner: WELCOME_BANNER,
            state: SessionState::Uninitialized,
            generator: TerrainGenerator::new(tuning),
            config: None,
            terrain: None,
            character: None,
        }
    }

    fn reset(&mut self) {
        self.state = SessionState::Uninitialized;
        self.config = None;
        self.terrain = None;
        self.character = None;
    }

    fn start_session(&mut self, config: SessionConfig, out_events: &mut Vec<Event>) {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let generated = self
            .generator
            .generate(config.size, config.river, &mut rng);
        let report = *generated.report();
        self.state = SessionState::TerrainGenerated;
        out_events.push(Event::TerrainGenerated { report });

        let terrain = generated.furnish(config.obstacle_count, config.start, &mut rng);
        let summary = *terrain.report();
        out_events.push(Event::ObstaclesPlaced {
            requested: summary.obstacles_requested,
            placed: summary.obstacles_placed,
        });

        self.character = Some(config.start);
        out_events.push(Event::CharacterPlaced { cell: config.start });

        self.terrain = Some(terrain);
        self.config = Some(config);
        self.state = SessionState::Ready;
        out_events.push(Event::SessionReady);

        info!(
            seed = config.seed,
            rows = config.size.rows(),
            columns = config.size.columns(),
            start = %config.start,
            complete = summary.is_complete(),
            "session ready"
        );
    }

    fn placement_rejection(&self, cell: CellCoord) -> Option<MoveRejection> {
        if self.state != SessionState::Ready {
            return Some(MoveRejection::NotReady);
        }
        let Some(terrain) = self.terrain.as_ref() else {
            return Some(MoveRejection::NotReady);
        };
        if !terrain.size().contains(cell) {
            return Some(MoveRejection::OutOfBounds);
        }
        if terrain.is_obstacle(cell) {
            return Some(MoveRejection::Blocked);
        }
        None
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartSession { config } => {
            if let Err(reason) = config.validate() {
                warn!(%reason, "session config rejected");
                out_events.push(Event::SessionRejected { reason });
                return;
            }

            world.reset();
            world.start_session(config, out_events);
        }
        Command::PlaceCharacter { cell } => {
            let from = world.character;
            let rejection = world.placement_rejection(cell);
            match (from, rejection) {
                (Some(from), None) => {
                    world.character = Some(cell);
                    debug!(%from, to = %cell, "character moved");
                    out_events.push(Event::CharacterMoved { from, to: cell });
                }
                (from, reason) => {
                    let reason = reason.unwrap_or(MoveRejection::NotReady);
                    debug!(to = %cell, ?reason, "character placement rejected");
                    out_events.push(Event::CharacterMoveRejected {
                        from,
                        to: cell,
                        reason,
                    });
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tileworld_core::{CellCoord, SessionConfig, SessionState, TerrainContext};
    use tileworld_system_generation::GenerationTuning;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports the current lifecycle state of the session.
    #[must_use]
    pub fn state(world: &World) -> SessionState {
        world.state
    }

    /// Provides read-only access to the terrain of the active session.
    #[must_use]
    pub fn terrain(world: &World) -> Option<&TerrainContext> {
        world.terrain.as_ref()
    }

    /// Cell currently occupied by the character, if a session is running.
    #[must_use]
    pub fn character(world: &World) -> Option<CellCoord> {
        world.character
    }

    /// Configuration that started the active session.
    #[must_use]
    pub fn config(world: &World) -> Option<&SessionConfig> {
        world.config.as_ref()
    }

    /// Tuning the world generates terrain with.
    #[must_use]
    pub fn tuning(world: &World) -> &GenerationTuning {
        world.generator.tuning()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_core::{ConfigError, GridSize, Orientation};

    fn config(seed: u64) -> SessionConfig {
        SessionConfig {
            size: GridSize::new(16, 16),
            obstacle_count: 10,
            start: CellCoord::new(0, 0),
            seed,
            river: None,
        }
    }

    fn started(seed: u64) -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartSession {
                config: config(seed),
            },
            &mut events,
        );
        (world, events)
    }

    #[test]
    fn new_world_is_uninitialized() {
        let world = World::new();
        assert_eq!(query::state(&world), SessionState::Uninitialized);
        assert!(query::terrain(&world).is_none());
        assert!(query::character(&world).is_none());
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn start_session_emits_lifecycle_in_order() {
        let (world, events) = started(7);

        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], Event::TerrainGenerated { .. }));
        assert!(matches!(
            events[1],
            Event::ObstaclesPlaced { requested: 10, .. }
        ));
        assert_eq!(
            events[2],
            Event::CharacterPlaced {
                cell: CellCoord::new(0, 0)
            }
        );
        assert_eq!(events[3], Event::SessionReady);

        assert_eq!(query::state(&world), SessionState::Ready);
        assert_eq!(query::character(&world), Some(CellCoord::new(0, 0)));
        let terrain = query::terrain(&world).expect("terrain exists once ready");
        assert!(!terrain.is_obstacle(CellCoord::new(0, 0)));
    }

    #[test]
    fn invalid_config_is_rejected_without_state_change() {
        let (mut world, _) = started(3);
        let before = query::terrain(&world).cloned();
        let mut events = Vec::new();
        let mut invalid = config(4);
        invalid.start = CellCoord::new(16, 0);

        apply(
            &mut world,
            Command::StartSession { config: invalid },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::SessionRejected {
                reason: ConfigError::StartOutOfBounds {
                    row: 16,
                    column: 0,
                    rows: 16,
                    columns: 16,
                },
            }]
        );
        assert_eq!(query::state(&world), SessionState::Ready);
        assert_eq!(query::terrain(&world).cloned(), before);
    }

    #[test]
    fn placement_before_session_is_not_ready() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceCharacter {
                cell: CellCoord::new(1, 1),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::CharacterMoveRejected {
                from: None,
                to: CellCoord::new(1, 1),
                reason: MoveRejection::NotReady,
            }]
        );
    }

    #[test]
    fn placement_rejects_out_of_bounds_and_obstacles() {
        let (mut world, _) = started(11);
        let obstacle = query::terrain(&world)
            .and_then(|terrain| terrain.obstacles().iter().next().copied())
            .expect("obstacles were placed");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceCharacter {
                cell: CellCoord::new(0, 16),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlaceCharacter { cell: obstacle },
            &mut events,
        );

        let origin = Some(CellCoord::new(0, 0));
        assert_eq!(
            events,
            vec![
                Event::CharacterMoveRejected {
                    from: origin,
                    to: CellCoord::new(0, 16),
                    reason: MoveRejection::OutOfBounds,
                },
                Event::CharacterMoveRejected {
                    from: origin,
                    to: obstacle,
                    reason: MoveRejection::Blocked,
                },
            ]
        );
        assert_eq!(query::character(&world), origin);
    }

    #[test]
    fn placement_moves_character_to_open_cell() {
        let (mut world, _) = started(5);
        let destination = query::terrain(&world)
            .and_then(|terrain| {
                terrain
                    .size()
                    .cells()
                    .find(|cell| *cell != CellCoord::new(0, 0) && !terrain.is_obstacle(*cell))
            })
            .expect("open cell exists");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceCharacter { cell: destination },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::CharacterMoved {
                from: CellCoord::new(0, 0),
                to: destination,
            }]
        );
        assert_eq!(query::character(&world), Some(destination));
    }

    #[test]
    fn same_seed_replays_identically() {
        let (first_world, first_events) = started(42);
        let (second_world, second_events) = started(42);

        assert_eq!(first_events, second_events);
        assert_eq!(query::terrain(&first_world), query::terrain(&second_world));
    }

    #[test]
    fn restarting_replaces_terrain_and_character() {
        let (mut world, _) = started(1);
        let mut events = Vec::new();
        let mut next = config(2);
        next.start = CellCoord::new(3, 3);
        next.river = Some(Orientation::Vertical);

        apply(&mut world, Command::StartSession { config: next }, &mut events);

        assert_eq!(query::character(&world), Some(CellCoord::new(3, 3)));
        assert_eq!(query::config(&world), Some(&next));
        let terrain = query::terrain(&world).expect("terrain exists once ready");
        assert_eq!(
            terrain.report().terrain.river_orientation,
            Orientation::Vertical
        );
    }

    #[test]
    fn custom_tuning_is_exposed() {
        let mut tuning = GenerationTuning::default();
        tuning.obstacles.attempt_cap = 0;
        let mut world = World::with_tuning(tuning.clone());
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::StartSession { config: config(9) },
            &mut events,
        );

        assert_eq!(query::tuning(&world), &tuning);
        assert!(events.contains(&Event::ObstaclesPlaced {
            requested: 10,
            placed: 0,
        }));
    }
}
