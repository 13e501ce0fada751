//! # Engine State Module
//!
//! The core engine module that owns the voxel world and everything that acts
//! on it during a tick.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container, advanced one tick per frame
//! * `voxels` - Blocks, chunks, terrain generation and the world facade
//! * `streaming` - Loads and evicts chunks around the player
//! * `player` - The player's body and its movement physics
//! * `interaction` - Breaking and placing blocks from mouse clicks
//! * `rendering` - The observer boundary towards a renderer
//!
//! ## Tick order
//!
//! 1. Apply the look delta
//! 2. Step player physics against the blocks that currently exist
//! 3. Stream chunks: request, evict, then generate one
//! 4. Apply the click, if any, to the targeted block
//! 5. Rebuild every chunk an edit touched, once
//!
//! Nothing inside a tick suspends or runs in the background, so the work done
//! per frame is bounded by one chunk generation plus the edits of that frame.

use cgmath::{Point3, Rad};
use log::debug;
use web_time::Duration;

use crate::config::EngineConfig;
use interaction::{BlockAction, InteractionOutcome, MouseButton};
use player::physics::{MovementInput, PlayerController};
use player::Player;
use rendering::ChunkObserver;
use streaming::{StreamingController, StreamingReport};
use voxels::block::block_type::BlockKind;
use voxels::world::{RaycastHit, World};

pub mod interaction;
pub mod player;
pub mod rendering;
pub mod streaming;
pub mod voxels;

/// Input gathered for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Walking and jumping intent
    pub movement: MovementInput,
    /// Yaw and pitch change in radians
    pub look: Option<(f32, f32)>,
    /// A click this frame
    pub action: Option<MouseButton>,
}

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Chunk requests, evictions and generation
    pub streaming: StreamingReport,
    /// The block under the crosshair when the click was handled
    pub target: Option<RaycastHit>,
    /// The result of this frame's click
    pub interaction: Option<InteractionOutcome>,
    /// Number of dirty chunks rebuilt
    pub rebuilt: usize,
}

/// The main state container for the voxel engine
///
/// # Examples
///
/// ```
/// use voxel_world::config::EngineConfig;
/// use voxel_world::engine_state::rendering::BatchCache;
/// use voxel_world::engine_state::{EngineState, FrameInput};
/// use web_time::Duration;
///
/// let mut engine = EngineState::new(EngineConfig::default());
/// let mut cache = BatchCache::new();
/// for _ in 0..60 {
///     engine.tick(&FrameInput::default(), Duration::from_millis(16), &mut cache);
/// }
/// assert!(engine.player().grounded);
/// assert_eq!(cache.len(), 25);
/// ```
pub struct EngineState {
    config: EngineConfig,
    world: World,
    streaming: StreamingController,
    player: Player,
    player_controller: PlayerController,
    /// Kind placed by the right button
    held_kind: BlockKind,
    ticks: u64,
}

impl EngineState {
    /// Creates an engine with an empty world and the player at the spawn point.
    pub fn new(config: EngineConfig) -> Self {
        let [x, y, z] = config.spawn;
        EngineState {
            world: World::new(config.generation_method.generator()),
            streaming: StreamingController::new(config.render_distance),
            player: Player::new(Point3::new(x, y, z)),
            player_controller: PlayerController::new(
                config.walk_speed,
                config.jump_velocity,
                config.gravity,
            ),
            held_kind: BlockKind::SURFACE,
            ticks: 0,
            config,
        }
    }

    /// Advances the engine by one frame.
    ///
    /// # Arguments
    /// * `input` - This frame's input
    /// * `dt` - Time since the previous tick
    /// * `observer` - Receives chunk generation, eviction and rebuild events
    ///
    /// # Returns
    /// A report of what the tick changed
    pub fn tick(
        &mut self,
        input: &FrameInput,
        dt: Duration,
        observer: &mut dyn ChunkObserver,
    ) -> TickReport {
        if let Some((yaw, pitch)) = input.look {
            self.player.rotate(Rad(yaw), Rad(pitch));
        }

        self.player_controller
            .step(&mut self.player, &input.movement, dt, &self.world);

        let streaming = self
            .streaming
            .tick(&mut self.world, self.player.position, observer);

        let mut target = None;
        let mut outcome = None;
        if let Some(button) = input.action {
            target = self.target();
            outcome = Some(match target {
                Some(hit) => {
                    let action = BlockAction::from_button(button, self.held_kind);
                    interaction::apply_action(&mut self.world, &self.player, &hit, action)
                }
                None => InteractionOutcome::Ignored,
            });
        }
        if let Some(InteractionOutcome::Broken(block)) = outcome {
            self.held_kind = block.kind;
        }

        let rebuilt = self.world.flush_dirty(observer);
        self.ticks += 1;
        if rebuilt > 0 {
            debug!("tick {}: rebuilt {} chunks", self.ticks, rebuilt);
        }

        TickReport {
            streaming,
            target,
            interaction: outcome,
            rebuilt,
        }
    }

    /// The block under the crosshair within reach.
    pub fn target(&self) -> Option<RaycastHit> {
        interaction::target_block(&self.world, &self.player, self.config.reach)
    }

    /// The voxel world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The voxel world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The player, mutably.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The streaming controller.
    pub fn streaming(&self) -> &StreamingController {
        &self.streaming
    }

    /// The kind the right button places.
    pub fn held_kind(&self) -> BlockKind {
        self.held_kind
    }

    /// The configuration the engine was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
