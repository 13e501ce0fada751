//! # Chunk Streaming
//!
//! Decides which chunks must exist around the player and drives the chunk
//! store towards that set, one tick at a time.
//!
//! Every tick runs the same fixed sequence:
//! 1. request every desired chunk that is not stored (nearest ring first)
//! 2. evict every stored chunk outside the desired set
//! 3. generate exactly one queued chunk
//!
//! Requests and evictions work from the same desired set, so a chunk requested
//! in a tick can never be evicted in that same tick.

use std::collections::HashSet;

use cgmath::Point3;
use log::debug;

use super::rendering::ChunkObserver;
use super::voxels::chunk::ChunkPosition;
use super::voxels::world::World;

/// Default render distance in chunks.
pub const RENDER_DISTANCE: i32 = 2;

/// What one streaming tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// The player's chunk this tick
    pub center: Option<ChunkPosition>,
    /// Coordinates newly appended to the pending queue
    pub requested: Vec<ChunkPosition>,
    /// Coordinates evicted this tick
    pub evicted: Vec<ChunkPosition>,
    /// The chunk generated this tick, if any
    pub generated: Option<ChunkPosition>,
}

impl StreamingReport {
    /// Whether the tick changed the set of requested or stored chunks, ignoring
    /// generation.
    pub fn changed_desired_state(&self) -> bool {
        !self.requested.is_empty() || !self.evicted.is_empty()
    }
}

/// Keeps the chunks within `render_distance` of the player loaded.
#[derive(Debug, Clone)]
pub struct StreamingController {
    /// Retention radius in chunks (Chebyshev)
    render_distance: i32,
    /// The player's chunk on the previous tick
    current_player_chunk_position: Option<ChunkPosition>,
    /// The desired set computed for `current_player_chunk_position`
    desired: Vec<ChunkPosition>,
}

impl Default for StreamingController {
    fn default() -> Self {
        Self::new(RENDER_DISTANCE)
    }
}

impl StreamingController {
    /// Creates a controller with the given retention radius.
    pub fn new(render_distance: i32) -> Self {
        StreamingController {
            render_distance: render_distance.max(0),
            current_player_chunk_position: None,
            desired: Vec::new(),
        }
    }

    /// The retention radius in chunks.
    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    /// The player's chunk as of the last tick.
    pub fn current_chunk(&self) -> Option<ChunkPosition> {
        self.current_player_chunk_position
    }

    /// The chunks that should be loaded, nearest first.
    pub fn desired_chunks(&self) -> &[ChunkPosition] {
        &self.desired
    }

    /// Runs one streaming tick for a player at `player_position`.
    ///
    /// Evicted and generated chunks are announced to `observer`.
    pub fn tick(
        &mut self,
        world: &mut World,
        player_position: Point3<f32>,
        observer: &mut dyn ChunkObserver,
    ) -> StreamingReport {
        let center = ChunkPosition::from_world(player_position.x, player_position.z);
        if self.current_player_chunk_position != Some(center) {
            debug!("player entered chunk {}", center);
            self.desired = center.square_around(self.render_distance);
            self.current_player_chunk_position = Some(center);
        }

        let store = world.store_mut();
        let mut report = StreamingReport {
            center: Some(center),
            ..StreamingReport::default()
        };

        for &position in &self.desired {
            if !store.is_present(position) && store.request(position) {
                report.requested.push(position);
            }
        }

        let retain: HashSet<ChunkPosition> = self.desired.iter().copied().collect();
        for chunk in store.evict(&retain) {
            observer.on_chunk_evicted(&chunk);
            report.evicted.push(chunk.position);
        }

        if let Some(chunk) = store.materialize_next() {
            observer.on_chunk_generated(chunk);
            report.generated = Some(chunk.position);
        }

        report
    }
}
