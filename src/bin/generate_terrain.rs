//! Terrain generator binary: builds and meshes a world, optionally writing
//! the result as a Wavefront OBJ.
//!
//! Usage: cargo run --release --bin generate_terrain -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>        Load settings from a JSON config
//!   --size <CHUNKS>        Chunks along each axis (default: 4)
//!   --width <CUBES>        Chunk width (default: 16)
//!   --height <CUBES>       Chunk height (default: 20)
//!   --surface <DENSITY>    Surface threshold (default: 0.5)
//!   --seed <SEED>          Random seed, 0 for random (default: 0)
//!   --blocky               Use edge midpoints instead of interpolation
//!   --jobs <N>             Worker threads for meshing
//!   --obj <PATH>           Write all chunk meshes to an OBJ file
//!   --write-config <PATH>  Save the effective config (with resolved seed)

use std::path::PathBuf;
use std::time::Instant;

use terramarch::core::logging;
use terramarch::generation::WorldConfig;
use terramarch::mesh::{MeshCollector, ObjExporter};
use terramarch::voxel::WorldGrid;

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> terramarch::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => WorldConfig::load(&PathBuf::from(path))?,
        None => WorldConfig::default(),
    };
    if let Some(size) = parse_u32_arg(&args, "--size") {
        config.world_size_in_chunks = size;
    }
    if let Some(width) = parse_u32_arg(&args, "--width") {
        config.chunk_width = width;
    }
    if let Some(height) = parse_u32_arg(&args, "--height") {
        config.chunk_height = height;
    }
    if let Some(surface) = parse_f32_arg(&args, "--surface") {
        config.terrain_surface = surface;
    }
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.seed = seed;
    }
    if args.iter().any(|a| a == "--blocky") {
        config.smooth_terrain = false;
    }
    if let Some(jobs) = parse_usize_arg(&args, "--jobs") {
        config.jobs = Some(jobs);
    }
    config.validate()?;

    println!("=== Terramarch Terrain Generator ===");
    println!("Size:    {} x {} chunks", config.world_size_in_chunks, config.world_size_in_chunks);
    println!("Chunk:   {} x {} x {}", config.chunk_width, config.chunk_height, config.chunk_width);
    println!("Surface: {} ({})", config.terrain_surface,
        if config.smooth_terrain { "smooth" } else { "blocky" });
    match config.jobs {
        Some(jobs) => println!("Jobs:    {} parallel", jobs),
        None => println!("Jobs:    shared pool"),
    }
    println!();

    let start = Instant::now();
    let mut world = WorldGrid::with_noise_terrain(config)?;
    let mut collector = MeshCollector::new();
    world.generate(&mut collector);
    let elapsed = start.elapsed();

    println!("Seed:      {}", world.config().seed);
    println!("Chunks:    {}", collector.len());
    println!("Vertices:  {}", collector.total_vertices());
    println!("Triangles: {}", collector.total_triangles());
    println!("Time:      {:.2}s", elapsed.as_secs_f64());

    if let Some(path) = parse_str_arg(&args, "--obj") {
        let mut exporter = ObjExporter::new();
        world.finalize_all(&mut exporter);
        exporter.write_to(&PathBuf::from(path))?;
    }

    if let Some(path) = parse_str_arg(&args, "--write-config") {
        let path = PathBuf::from(path);
        world.config().save(&path)?;
        println!("Config:    {}", path.display());
    }

    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
