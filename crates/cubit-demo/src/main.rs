//! Headless walkthrough of the voxel scene sync engine.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p cubit-demo -- --cube 12 --batch-size 150` to watch a
//! bulk edit spread over several frames.

use std::process::ExitCode;

use clap::Parser;
use cubit_config::{CliArgs, Config, default_config_dir};
use cubit_world::{
    Color, FrameLog, HeadlessScene, SceneSync, SyncError, Voxel, VoxelStore, VoxelWorld,
};
use glam::{IVec3, Vec3};
use tracing::{error, info, warn};

const DEFAULT_CUBE_EDGE: i32 = 8;

type DemoWorld = VoxelWorld<HeadlessScene>;

/// Fills an `edge`³ cube and drains the dirty set one frame at a time.
fn demonstrate_bulk_fill(world: &mut DemoWorld, edge: i32) -> Result<usize, SyncError> {
    let mut id = 0;
    for x in 0..edge {
        for y in 0..edge {
            for z in 0..edge {
                world.upsert(Voxel::new(id, [x, y, z], Color::rgb(90, 160, 90)));
                id += 1;
            }
        }
    }
    info!(voxels = id, pending = world.pending_sync(), "cube filled");

    let mut frames = 0;
    loop {
        frames += 1;
        let done = world.refresh()?;
        info!(
            frame = frames,
            objects = world.scene().object_count(),
            pending = world.pending_sync(),
            "frame synced"
        );
        if done {
            break;
        }
    }

    let visible = world.visible_voxels().len();
    info!(
        frames,
        visible,
        enclosed = world.store().len() - visible,
        "bulk fill complete"
    );
    Ok(frames)
}

/// Hollows the cube out, leaving a one-voxel shell.
fn demonstrate_carving(world: &mut DemoWorld, edge: i32) -> Result<(), SyncError> {
    let mut carved = 0;
    for x in 1..edge - 1 {
        for y in 1..edge - 1 {
            for z in 1..edge - 1 {
                if world.remove_at([x, y, z]) {
                    carved += 1;
                }
            }
        }
    }
    let batches = world.refresh_all()?;
    info!(
        carved,
        batches,
        remaining = world.store().len(),
        objects = world.scene().object_count(),
        "interior carved"
    );
    Ok(())
}

/// Recolors one face of the shell and checks handle lookups.
fn demonstrate_recolor(world: &mut DemoWorld, edge: i32) -> Result<(), SyncError> {
    let face: Vec<Voxel> = world
        .store()
        .live_nodes()
        .map(|(_, node)| node.voxel())
        .filter(|voxel| voxel.coord.z == 0)
        .cloned()
        .collect();
    for voxel in &face {
        world.upsert(voxel.with_color(Color::rgb(200, 60, 40)));
    }
    world.refresh_all()?;

    let corner = world
        .store()
        .node_at([0, 0, 0].into())
        .and_then(|node| node.render_handle());
    match corner {
        Some(handle) => info!(
            recolored = face.len(),
            handle = handle.0,
            voxel_id = ?world.lookup_voxel_id(handle),
            "front face recolored"
        ),
        None => warn!(edge, "corner voxel has no scene object"),
    }
    Ok(())
}

/// Previews a move of the whole shape and casts a ray from the moved viewpoint.
fn demonstrate_shifted_preview(world: &mut DemoWorld, edge: i32) {
    let mut frame = FrameLog::new();
    let shift = IVec3::new(edge + 2, 0, 0);
    world.set_shift(shift);
    world.draw_shifted_overlay(&mut frame, Color::WHITE, Color::rgb(255, 200, 0));
    info!(
        ?shift,
        offset = ?world.overlay().offset(),
        draw_calls = frame.entries.len(),
        "shifted overlay drawn"
    );

    let target = Vec3::splat(edge as f32 * world.sync().voxel_size() * 0.5);
    let direction = (target - world.overlay().offset()).normalize_or_zero();
    match world.collision_along_shifted_ray(direction) {
        Some(point) => info!(?point, "shifted ray hit"),
        None => info!("shifted ray missed"),
    }
    world.set_shift(IVec3::ZERO);
}

/// Shows a scene refusing objects: the sync stops, keeps the voxel queued and
/// resumes once the scene has room.
fn demonstrate_scene_rejection(config: &Config) {
    let mut store = VoxelStore::new();
    let mut sync = SceneSync::from_config(&config.world);
    let mut scene = HeadlessScene::new(config.world.voxel_size);
    scene.set_capacity(Some(3));
    for x in 0..5 {
        store.upsert(Voxel::new(x, [x * 2, 0, 0], Color::WHITE));
    }

    if let Err(err) = sync.refresh_batch(&mut store, &mut scene, config.sync.batch_size) {
        info!(%err, pending = store.pending_sync(), "scene full, sync paused");
    }
    scene.set_capacity(None);
    match sync.refresh_all(&mut store, &mut scene, config.sync.batch_size) {
        Ok(batches) => info!(batches, objects = scene.object_count(), "sync resumed"),
        Err(err) => error!(%err, "sync still failing"),
    }
}

fn demonstrate_clear(world: &mut DemoWorld) -> Result<(), SyncError> {
    let removed = world.clear_all();
    world.refresh_all()?;
    info!(
        removed,
        objects = world.scene().object_count(),
        created_total = world.scene().created_total(),
        removed_total = world.scene().removed_total(),
        "world cleared"
    );
    Ok(())
}

fn run(config: &Config, edge: i32) -> Result<(), SyncError> {
    let mut world = VoxelWorld::new(config, HeadlessScene::new(config.world.voxel_size));

    demonstrate_bulk_fill(&mut world, edge)?;
    demonstrate_carving(&mut world, edge)?;
    demonstrate_recolor(&mut world, edge)?;
    demonstrate_shifted_preview(&mut world, edge);
    demonstrate_scene_rejection(config);
    demonstrate_clear(&mut world)
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config
        .debug
        .log_dir
        .clone()
        .or_else(|| cfg!(debug_assertions).then(|| config_dir.join("logs")));
    cubit_log::init_logging(log_dir.as_deref(), config.debug.json_log, Some(&config));

    let edge = args.cube.unwrap_or(DEFAULT_CUBE_EDGE);
    info!(
        edge,
        preset = ?config.world.side_preset,
        culling = config.world.culling,
        batch_size = config.sync.batch_size,
        "starting voxel sync demo"
    );

    match run(&config, edge) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "demo aborted");
            ExitCode::FAILURE
        }
    }
}
