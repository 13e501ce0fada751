#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunked voxel world for a first-person sandbox: the player walks, jumps,
//! and adds or removes unit cubes in a procedurally generated world that is
//! loaded and evicted in 16 x 16 columns as the player moves.
//!
//! ## Key Modules
//!
//! * `config` - Engine settings loaded from JSON
//! * `core` - Concurrency primitives used to share the engine between threads
//! * `engine_state` - The world, streaming, the player and the tick loop
//!
//! ## Architecture
//!
//! The engine runs one synchronous tick per frame:
//! * The player moves and collides against whatever chunks exist
//! * Streaming requests missing chunks, evicts far ones and generates one
//! * Clicks break or place the targeted block
//! * Chunks changed by edits are rebuilt through a `ChunkObserver`
//!
//! Rendering is outside this crate. A renderer implements `ChunkObserver`
//! and receives whole-chunk rebuilds.
//!
//! ## Usage
//!
//! ```rust
//! use voxel_world::config::EngineConfig;
//!
//! let config = EngineConfig {
//!     demo_ticks: 30,
//!     ..EngineConfig::default()
//! };
//! let summary = voxel_world::run_demo(&config);
//! assert_eq!(summary.ticks, 30);
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunks store occupancy in a bit vector and kinds in a flat byte array
//! * At most one chunk is generated per tick, bounding frame cost
//! * Lookups, raycasts and collision probes only touch nearby chunks

use std::env;
use std::io::ErrorKind;

use cgmath::Point3;
use log::{info, warn};
use web_time::{Duration, Instant};

use config::{ConfigError, EngineConfig};
use engine_state::interaction::{InteractionOutcome, MouseButton};
use engine_state::player::physics::MovementInput;
use engine_state::rendering::BatchCache;
use engine_state::voxels::block::Block;
use engine_state::{EngineState, FrameInput};

pub mod config;
pub mod core;
pub mod engine_state;

/// Simulated frame length of the headless demo.
const DEMO_FRAME: Duration = Duration::from_millis(16);

/// Pitch the demo looks down at before walking, in radians.
const DEMO_PITCH: f32 = -0.6;

/// Installs `env_logger` writing to stdout, filtered by `RUST_LOG`.
///
/// Calling it more than once is harmless.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    let _ = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
}

/// What the headless demo did.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoSummary {
    /// Ticks simulated
    pub ticks: u32,
    /// Chunks loaded at the end
    pub chunks_loaded: usize,
    /// Blocks in loaded chunks at the end
    pub blocks: usize,
    /// Where the player ended up
    pub final_position: Point3<f32>,
    /// The block broken halfway through, if one was in reach
    pub broken: Option<Block>,
    /// The block placed right after, if placement succeeded
    pub placed: Option<Block>,
    /// Batch builds performed by the observer
    pub rebuilds: usize,
}

/// Walks the player forward for `config.demo_ticks` ticks, breaking a block
/// halfway and placing one on the next tick.
pub fn run_demo(config: &EngineConfig) -> DemoSummary {
    let mut engine = EngineState::new(config.clone());
    let mut cache = BatchCache::new();
    let midpoint = config.demo_ticks / 2;
    let mut broken = None;
    let mut placed = None;

    let started = Instant::now();
    for tick in 0..config.demo_ticks {
        let input = FrameInput {
            movement: MovementInput {
                forward: 1.0,
                ..MovementInput::default()
            },
            look: (tick == 0).then_some((0.0, DEMO_PITCH)),
            action: if tick == midpoint {
                Some(MouseButton::Left)
            } else if tick == midpoint + 1 {
                Some(MouseButton::Right)
            } else {
                None
            },
        };

        let report = engine.tick(&input, DEMO_FRAME, &mut cache);
        match report.interaction {
            Some(InteractionOutcome::Broken(block)) => broken = Some(block),
            Some(InteractionOutcome::Placed(block)) => placed = Some(block),
            Some(InteractionOutcome::Refused(position)) => {
                warn!("demo placement at {:?} was refused", position)
            }
            _ => {}
        }
    }

    let summary = DemoSummary {
        ticks: config.demo_ticks,
        chunks_loaded: engine.world().store().len(),
        blocks: engine.world().block_count(),
        final_position: engine.player().position,
        broken,
        placed,
        rebuilds: cache.rebuilds,
    };
    info!(
        "demo: {} ticks in {:?}, {} chunks, {} blocks, player at ({:.2}, {:.2}, {:.2})",
        summary.ticks,
        started.elapsed(),
        summary.chunks_loaded,
        summary.blocks,
        summary.final_position.x,
        summary.final_position.y,
        summary.final_position.z
    );
    info!(
        "demo: broke {:?}, placed {:?}, {} batch builds",
        summary.broken, summary.placed, summary.rebuilds
    );
    summary
}

/// Entry point of the `voxel-world` binary.
///
/// Loads the configuration named by the first argument, or the defaults when
/// there is none, then runs the headless demo.
pub fn run() -> Result<DemoSummary, ConfigError> {
    init_logging();
    info!("Logger initialized");

    let config = match env::args().nth(1) {
        Some(path) => match config::load_config(&path) {
            Ok(config) => {
                info!("loaded configuration from {}", path);
                config
            }
            Err(ConfigError::Io(error)) if error.kind() == ErrorKind::NotFound => {
                warn!("{} not found, using the default configuration", path);
                EngineConfig::default()
            }
            Err(error) => return Err(error),
        },
        None => {
            info!("no configuration given, using defaults");
            EngineConfig::default()
        }
    };

    Ok(run_demo(&config))
}
