//! Common utilities for benchmarks

use criterion::Criterion;
use dan_core::types::{Biome, BlockPos, BlockProperty, Direction, Half, Selection};
use dan_export::{BlockState, SparseSource};
use std::time::Duration;

/// Criterion settings shared by every bench target
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(10))
        .sample_size(50)
}

/// A square selection `chunks` chunk columns wide and one section tall
pub fn square_selection(chunks: i32) -> Selection {
    let edge = chunks * 16 - 1;
    Selection::new("bench", BlockPos::new(0, 0, 0), BlockPos::new(edge, 15, edge))
}

/// Layered terrain with scattered stairs so sections carry data entries
pub fn terrain_block(x: i32, y: i32, z: i32) -> BlockState {
    let biome = if (x / 16 + z / 16) % 2 == 0 {
        Biome::Plains
    } else {
        Biome::Forest
    };
    match y {
        0 => BlockState::new("bedrock", biome),
        1..=5 => BlockState::new("stone", biome),
        6..=7 => BlockState::new("dirt", biome),
        8 => BlockState::new("grass_block", biome),
        9 if (x * 7 + z * 13) % 31 == 0 => BlockState::new("oak_stairs", biome)
            .with_properties(vec![
                BlockProperty::Facing(Direction::North),
                BlockProperty::Half(Half::Bottom),
            ]),
        _ => BlockState::new("air", biome),
    }
}

/// Sparse source with `count` stone blocks scattered over a selection
pub fn scattered_source(selection: &Selection, count: usize) -> SparseSource {
    let (w, _, d) = selection.block_extent();
    let mut source = SparseSource::new(BlockState::default());
    for i in 0..count {
        let x = selection.min.x + (i * 7919 % w as usize) as i32;
        let z = selection.min.z + (i * 104_729 % d as usize) as i32;
        let y = selection.min.y + (i % 16) as i32;
        source.insert(BlockPos::new(x, y, z), BlockState::new("stone", Biome::Plains));
    }
    source
}

/// JSON block dump in the format `SparseSource::from_json` reads
pub fn block_dump_json(count: usize) -> String {
    let blocks: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "pos": [i as i32 % 256, (i / 256) as i32 % 64, (i / 16384) as i32],
                "material": if i % 3 == 0 { "stone" } else { "dirt" },
                "biome": "plains",
            })
        })
        .collect();
    serde_json::json!({ "default": { "material": "air" }, "blocks": blocks }).to_string()
}
