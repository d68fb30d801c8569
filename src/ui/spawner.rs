//! Systems for spawning visual entities from simulation state

use bevy::prelude::*;

use super::components::{
    BeanSourceLink, CafeWorldResource, CounterLink, EntityMappings, SimSynced, StationLink,
};
use crate::simulation::{CafeWorld, CustomerState, Position};

/// Colour of the coffee machine when idle
pub const STATION_IDLE_COLOR: Color = Color::srgb(0.35, 0.35, 0.38);
/// Colour of the coffee machine while brewing
pub const STATION_BREWING_COLOR: Color = Color::srgb(0.9, 0.55, 0.1);
/// Colour of the coffee machine with coffee waiting
pub const STATION_READY_COLOR: Color = Color::srgb(0.2, 0.85, 0.3);

/// System to create initial visual entities from simulation state
pub fn spawn_initial_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cafe_world: Res<CafeWorldResource>,
    mut mappings: ResMut<EntityMappings>,
) {
    let world = &cafe_world.0;

    spawn_counters(&mut commands, &mut meshes, &mut materials, world, &mut mappings);
    spawn_stations(&mut commands, &mut meshes, &mut materials, world, &mut mappings);
    spawn_bean_sources(&mut commands, &mut meshes, &mut materials, world, &mut mappings);
}

fn prop_transform(pos: &Position, height: f32) -> Transform {
    Transform::from_translation(Vec3::new(pos.x, pos.y + height / 2.0, pos.z))
}

fn spawn_counters(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    world: &CafeWorld,
    mappings: &mut ResMut<EntityMappings>,
) {
    const COUNTER_HEIGHT: f32 = 1.0;

    for (id, counter) in &world.counters {
        let entity = commands
            .spawn((
                SimSynced,
                CounterLink(*id),
                Mesh3d(meshes.add(Cuboid::new(4.0, COUNTER_HEIGHT, 1.0))),
                MeshMaterial3d(materials.add(Color::srgb(0.45, 0.25, 0.12))),
                prop_transform(&counter.position, COUNTER_HEIGHT),
            ))
            .id();
        mappings.counters.insert(*id, entity);
    }
}

fn spawn_stations(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    world: &CafeWorld,
    mappings: &mut ResMut<EntityMappings>,
) {
    const STATION_HEIGHT: f32 = 1.4;

    for (id, station) in &world.stations {
        let entity = commands
            .spawn((
                SimSynced,
                StationLink(*id),
                Mesh3d(meshes.add(Cuboid::new(1.0, STATION_HEIGHT, 1.0))),
                MeshMaterial3d(materials.add(STATION_IDLE_COLOR)),
                prop_transform(&station.position, STATION_HEIGHT),
            ))
            .id();
        mappings.stations.insert(*id, entity);
    }
}

fn spawn_bean_sources(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    world: &CafeWorld,
    mappings: &mut ResMut<EntityMappings>,
) {
    const BAG_HEIGHT: f32 = 0.8;

    for (id, source) in &world.bean_sources {
        let entity = commands
            .spawn((
                SimSynced,
                BeanSourceLink(*id),
                Mesh3d(meshes.add(Cuboid::new(0.8, BAG_HEIGHT, 0.6))),
                MeshMaterial3d(materials.add(Color::srgb(0.3, 0.18, 0.08))),
                prop_transform(&source.position, BAG_HEIGHT),
            ))
            .id();
        mappings.bean_sources.insert(*id, entity);
    }
}

/// Colour of a customer for its current state
pub fn customer_color(state: CustomerState, patience_fraction: f32) -> Color {
    match state {
        CustomerState::MovingToCounter => Color::srgb(0.3, 0.5, 0.9),
        // Fades from yellow to red as patience runs out
        CustomerState::WaitingForOrder => {
            let patience = patience_fraction.clamp(0.0, 1.0);
            Color::srgb(1.0, 0.2 + 0.7 * patience, 0.1)
        }
        CustomerState::OrderReceived => Color::srgb(0.2, 0.85, 0.3),
        CustomerState::Leaving => Color::srgb(0.6, 0.6, 0.6),
    }
}
