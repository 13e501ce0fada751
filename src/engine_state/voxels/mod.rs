//! # Voxel World Core
//!
//! This module contains the chunked voxel world: how blocks are stored, how
//! chunks are generated and retired, and the queries and edits other systems
//! make against the world.
//!
//! ## Architecture
//!
//! * **Block**: The block value type, its material kinds and its faces
//! * **Chunk**: Dense storage for one 16 x 16 column of blocks
//! * **Terrain**: Pure generators that fill a chunk from its coordinate
//! * **ChunkStore**: Generated chunks plus the FIFO queue of wanted chunks
//! * **World**: The query and mutation facade over the chunk store
//! * **Raycast**: Ray and cube intersection with hit face resolution
//!
//! ## Data Flow
//!
//! 1. Streaming requests chunks around the player; the store queues them
//! 2. Once per tick the store generates one queued chunk in a single step
//! 3. The world answers lookups, raycasts and collision probes against
//!    whatever chunks exist
//! 4. Edits mark their chunk dirty; dirty chunks are rebuilt through the
//!    chunk observer
//!
//! ## Threading
//!
//! Everything here runs synchronously inside one tick. Generators are pure and
//! may run anywhere, but the store and the world are mutated from the tick
//! only. A multi-threaded caller must serialize whole ticks, for example with
//! `core::MtResource::exclusive`.

pub mod block;
pub mod chunk;
pub mod chunk_store;
pub mod raycast;
pub mod terrain;
pub mod world;
