//! Systems for syncing Bevy entities with simulation state

use bevy::prelude::*;
use std::collections::HashSet;

use super::components::{
    CafeWorldResource, CustomerLink, EntityMappings, EventLog, HudText, SimSynced, StationLink,
};
use super::spawner::{
    customer_color, STATION_BREWING_COLOR, STATION_IDLE_COLOR, STATION_READY_COLOR,
};
use crate::simulation::{BrewState, CafeEvent, CafeWorld, CustomerId, ItemKind};

const CUSTOMER_HEIGHT: f32 = 1.6;

/// System to run simulation tick
pub fn tick_simulation(time: Res<Time>, mut cafe_world: ResMut<CafeWorldResource>) {
    cafe_world.0.tick(time.delta_secs());
}

/// System to sync customer visuals from simulation state
pub fn sync_customers(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cafe_world: Res<CafeWorldResource>,
    mut mappings: ResMut<EntityMappings>,
    mut customer_query: Query<(
        Entity,
        &CustomerLink,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let world = &cafe_world.0;

    // Update existing customers and track which ones still exist
    let mut existing: HashSet<CustomerId> = HashSet::new();

    for (entity, link, mut transform, material_handle) in customer_query.iter_mut() {
        if let Some(customer) = world.customers.get(&link.0) {
            existing.insert(link.0);
            let pos = customer.position();
            transform.translation = Vec3::new(pos.x, CUSTOMER_HEIGHT / 2.0, pos.z);
            if let Some(material) = materials.get_mut(&material_handle.0) {
                material.base_color =
                    customer_color(customer.state(), customer.patience_fraction());
            }
        } else {
            // Customer walked out, despawn
            commands.entity(entity).despawn();
            mappings.customers.remove(&link.0);
        }
    }

    for (id, customer) in &world.customers {
        if existing.contains(id) {
            continue;
        }
        let pos = customer.position();
        let entity = commands
            .spawn((
                SimSynced,
                CustomerLink(*id),
                Mesh3d(meshes.add(Cuboid::new(0.6, CUSTOMER_HEIGHT, 0.6))),
                MeshMaterial3d(materials.add(customer_color(
                    customer.state(),
                    customer.patience_fraction(),
                ))),
                Transform::from_translation(Vec3::new(pos.x, CUSTOMER_HEIGHT / 2.0, pos.z)),
            ))
            .id();
        mappings.customers.insert(*id, entity);
    }
}

/// System to colour coffee machines by brew state
pub fn update_station_colors(
    cafe_world: Res<CafeWorldResource>,
    station_query: Query<(&StationLink, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (link, material_handle) in station_query.iter() {
        if let Some(station) = cafe_world.0.stations.get(&link.0) {
            if let Some(material) = materials.get_mut(&material_handle.0) {
                material.base_color = match station.state() {
                    BrewState::Idle => STATION_IDLE_COLOR,
                    BrewState::Processing => STATION_BREWING_COLOR,
                    BrewState::Ready => STATION_READY_COLOR,
                };
            }
        }
    }
}

fn customer_name(world: &CafeWorld, id: CustomerId) -> String {
    world
        .customers
        .get(&id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "Customer".to_string())
}

fn describe_event(world: &CafeWorld, event: &CafeEvent) -> Option<String> {
    let line = match event {
        CafeEvent::CustomerSpawned { name, .. } => format!("{} walked in", name),
        CafeEvent::ShowOrder { customer } => {
            format!("{}: \"One coffee, please!\"", customer_name(world, *customer))
        }
        CafeEvent::ShowThankYou { customer } => {
            format!("{}: \"Thank you!\"", customer_name(world, *customer))
        }
        CafeEvent::PlayImpatientCue { customer } => {
            format!("{} taps their foot", customer_name(world, *customer))
        }
        CafeEvent::CustomerLeft {
            customer,
            satisfied: false,
        } => format!("{} gave up and left", customer_name(world, *customer)),
        CafeEvent::BrewingComplete { units_ready, .. } => {
            format!("Coffee ready ({})", units_ready)
        }
        CafeEvent::CoffeeServed { payment, .. } => format!("Served! +${}", payment),
        CafeEvent::UpgradePurchased { name } => format!("Bought {}", name),
        CafeEvent::AchievementUnlocked { title, .. } => format!("Achievement: {}", title),
        _ => return None,
    };
    Some(line)
}

/// System to drain simulation events into the on-screen log
pub fn collect_events(mut cafe_world: ResMut<CafeWorldResource>, mut event_log: ResMut<EventLog>) {
    let events = cafe_world.0.drain_events();
    for event in &events {
        if let Some(line) = describe_event(&cafe_world.0, event) {
            event_log.push(line);
        }
    }
}

/// System to update the HUD text
pub fn update_hud_text(
    cafe_world: Res<CafeWorldResource>,
    event_log: Res<EventLog>,
    mut text_query: Query<(&HudText, &mut Text)>,
) {
    let world = &cafe_world.0;
    let summary = world.summary();

    for (hud_text, mut text) in text_query.iter_mut() {
        match hud_text {
            HudText::Money => {
                **text = format!("Money: ${}", summary.money);
            }
            HudText::Carrying => {
                let bean_capacity = world.inventory.capacity(ItemKind::Bean).unwrap_or(0);
                let coffee_capacity = world.inventory.capacity(ItemKind::CoffeeUnit).unwrap_or(0);
                **text = format!(
                    "Beans: {}/{}  Coffee: {}/{}",
                    summary.beans, bean_capacity, summary.coffee, coffee_capacity
                );
            }
            HudText::Customers => {
                **text = format!(
                    "Customers: {} waiting, {} in shop, {} served",
                    summary.customers_waiting, summary.customers_in_shop, summary.customers_served
                );
            }
            HudText::Satisfaction => {
                **text = format!(
                    "Satisfaction: {:.0}%  Combo: {}  Achievements: {}",
                    summary.satisfaction_rate, summary.current_combo, summary.achievements_unlocked
                );
            }
            HudText::Machine => {
                **text = world
                    .primary_station()
                    .and_then(|id| world.station_prompt(id))
                    .map(|prompt| format!("[M] {}", prompt))
                    .unwrap_or_default();
            }
            HudText::Counter => {
                **text = world
                    .primary_counter()
                    .and_then(|id| world.counter_prompt(id))
                    .map(|prompt| format!("[E] {}", prompt))
                    .unwrap_or_default();
            }
            HudText::BeanBag => {
                **text = world
                    .primary_bean_source()
                    .and_then(|id| world.bean_source_prompt(id))
                    .map(|prompt| format!("[B] {}", prompt))
                    .unwrap_or_default();
            }
            HudText::Upgrades => {
                let lines: Vec<String> = world
                    .upgrades
                    .upgrades()
                    .iter()
                    .enumerate()
                    .map(|(index, upgrade)| {
                        let status = if upgrade.purchased {
                            "owned".to_string()
                        } else {
                            format!("${}", upgrade.cost)
                        };
                        format!("[{}] {} ({})", index + 1, upgrade.name, status)
                    })
                    .collect();
                **text = lines.join("\n");
            }
            HudText::Events => {
                **text = event_log
                    .lines
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n");
            }
        }
    }
}
