//! Benchmarks for chunk generation, raycasting and streaming.
//!
//! Run with: cargo bench --bench world_benchmark

use cgmath::{Point3, Vector3};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxel_world::engine_state::rendering::NullObserver;
use voxel_world::engine_state::streaming::StreamingController;
use voxel_world::engine_state::voxels::chunk::ChunkPosition;
use voxel_world::engine_state::voxels::terrain::{LayeredTerrain, TerrainGenerator};
use voxel_world::engine_state::voxels::world::World;

fn loaded_world(radius: i32) -> World {
    let mut world = World::default();
    for position in ChunkPosition::new(0, 0).square_around(radius) {
        world.store_mut().request(position);
    }
    while world.store_mut().materialize_next().is_some() {}
    world
}

fn benchmark_generation(c: &mut Criterion) {
    let terrain = LayeredTerrain;

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(terrain.generate_chunk(ChunkPosition::new(coord, coord / 2)))
        });
    });

    let mut group = c.benchmark_group("chunk_grid");
    group.throughput(Throughput::Elements(5 * 5));
    group.bench_function("5x5_chunks", |b| {
        b.iter(|| {
            for z in -2..=2 {
                for x in -2..=2 {
                    black_box(terrain.generate_chunk(ChunkPosition::new(x, z)));
                }
            }
        });
    });
    group.finish();
}

fn benchmark_raycast(c: &mut Criterion) {
    let world = loaded_world(2);
    let origin = Point3::new(8.0, 2.1, 8.0);
    let direction = Vector3::new(0.8, -0.6, 0.1);

    c.bench_function("raycast_reach_6", |b| {
        b.iter(|| black_box(world.raycast_block(origin, direction, 6.0)))
    });
    c.bench_function("intersecting_player_box", |b| {
        b.iter(|| {
            black_box(world.intersecting_blocks(
                Point3::new(7.7, 0.4, 7.7),
                Point3::new(8.3, 2.2, 8.3),
            ))
        })
    });
}

fn benchmark_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");
    group.sample_size(20);

    group.bench_function("idle_tick", |b| {
        let mut world = loaded_world(2);
        let mut streaming = StreamingController::default();
        let at = Point3::new(8.0, 1.0, 8.0);
        streaming.tick(&mut world, at, &mut NullObserver);
        b.iter(|| black_box(streaming.tick(&mut world, at, &mut NullObserver)))
    });

    group.bench_function("walking_tick", |b| {
        let mut world = World::default();
        let mut streaming = StreamingController::default();
        let mut x = 0.0f32;
        b.iter(|| {
            x += 0.5;
            black_box(streaming.tick(&mut world, Point3::new(x, 1.0, 8.0), &mut NullObserver))
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_generation,
    benchmark_raycast,
    benchmark_streaming
);
criterion_main!(benches);
