mod simulation;

#[cfg(feature = "ui")]
mod ui;

use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};

use simulation::{CafeConfig, CafeWorld, ItemKind, UpgradeEffects};

#[derive(Parser)]
#[command(name = "coffee_shop")]
#[command(about = "Coffee shop simulation with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "1200")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// RON file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save file to load progress from and write it back to
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            let world = build_world(&cli)?;
            run_with_ui(world, cli.save);
        }
        #[cfg(not(feature = "ui"))]
        {
            anyhow::bail!("UI feature is not enabled. Rebuild with --features ui");
        }
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp(None)
            .init();

        let mut world = build_world(&cli)?;
        run_headless(&mut world, cli.ticks, cli.delta);
        if let Some(path) = &cli.save {
            save_world(&world, path)?;
        }
    }
    Ok(())
}

fn build_world(cli: &Cli) -> Result<CafeWorld> {
    let config = match &cli.config {
        Some(path) => CafeConfig::load(path)?,
        None => CafeConfig::default(),
    };

    let world = match cli.seed {
        Some(seed) => CafeWorld::new_with_seed(config, seed),
        None => CafeWorld::new(config),
    };
    let mut world = CafeWorld::build_test_world(world);

    if let Some(path) = &cli.save {
        world.load_from_path(path)?;
        info!("Loaded progress from {}", path.display());
    }
    Ok(world)
}

fn save_world(world: &CafeWorld, path: &Path) -> Result<()> {
    world.save_to_path(path)?;
    info!("Saved progress to {}", path.display());
    Ok(())
}

/// One decision of the scripted player used in headless runs
///
/// Serves whenever possible, keeps the machine busy, fetches beans otherwise,
/// and buys the cheapest upgrade it can afford.
fn autoplay(world: &mut CafeWorld) {
    let (Some(counter), Some(station), Some(source)) = (
        world.primary_counter(),
        world.primary_station(),
        world.primary_bean_source(),
    ) else {
        return;
    };

    if world.inventory.has(ItemKind::CoffeeUnit, 1) && world.serve_at_counter(counter) {
        return;
    }
    if world.use_station(station) {
        return;
    }
    if world.collect_bean(source) {
        return;
    }

    let cheapest = world
        .upgrades
        .affordable(&world.ledger)
        .into_iter()
        .min_by_key(|upgrade| upgrade.cost)
        .map(|upgrade| upgrade.name.clone());
    if let Some(name) = cheapest {
        world.purchase_upgrade(&name);
    }
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(world: &mut CafeWorld, ticks: u32, delta: f32) {
    println!("Running coffee shop simulation in headless mode...");
    println!("Ticks: {}, Delta: {}s", ticks, delta);

    // Report every 10 seconds of simulated time
    let ticks_per_report = ((10.0 / delta).ceil() as u32).max(1);
    println!();

    println!("Initial state:");
    world.print_summary();
    println!();

    let mut tick = 0;
    while tick < ticks {
        let ticks_to_run = ticks_per_report.min(ticks - tick);

        for _ in 0..ticks_to_run {
            tick += 1;
            world.tick(delta);
            autoplay(world);
            for event in world.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        println!(
            "--- After tick {} ({:.1}s simulated time) ---",
            tick,
            tick as f32 * delta
        );
        world.print_summary();
        println!();
    }

    println!("=== Final State ===");
    world.print_summary();
    println!(
        "Served {} / lost {}, avg wait {:.1}s, longest combo {}, ${:.0}/hour, brew x{:.2}",
        world.statistics.total_customers_served(),
        world.statistics.customers_lost(),
        world.statistics.average_serve_time(),
        world.statistics.longest_combo(),
        world.statistics.earnings_per_hour(),
        world.upgrades.machine_speed_multiplier()
    );
}

#[cfg(feature = "ui")]
fn run_with_ui(world: CafeWorld, save_path: Option<PathBuf>) {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    println!("Starting Coffee Shop UI...");
    println!();
    println!("Controls:");
    println!("  B    - Collect a bean");
    println!("  M    - Use the coffee machine (brew / collect)");
    println!("  E    - Serve coffee at the counter");
    println!("  1-5  - Buy upgrade");
    println!("  ESC  - Save and exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,coffee_shop=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Coffee Shop".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(ui::CafeWorldResource(world))
        .insert_resource(ui::SavePath(save_path))
        .add_plugins(ui::CoffeeShopUIPlugin)
        .run();
}
