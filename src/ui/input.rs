//! Input handling systems

use bevy::prelude::*;

use super::components::{CafeWorldResource, SavePath};

const UPGRADE_KEYS: [KeyCode; 5] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
];

/// Handle the player's interaction keys
pub fn handle_player_actions(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut cafe_world: ResMut<CafeWorldResource>,
) {
    let world = &mut cafe_world.0;

    if keyboard.just_pressed(KeyCode::KeyB) {
        if let Some(source) = world.primary_bean_source() {
            world.collect_bean(source);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyM) {
        if let Some(station) = world.primary_station() {
            world.use_station(station);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyE) {
        if let Some(counter) = world.primary_counter() {
            world.serve_at_counter(counter);
        }
    }

    for (index, key) in UPGRADE_KEYS.iter().enumerate() {
        if !keyboard.just_pressed(*key) {
            continue;
        }
        let name = world.upgrades.upgrades().get(index).map(|u| u.name.clone());
        if let Some(name) = name {
            world.purchase_upgrade(&name);
        }
    }
}

/// Handle basic keyboard input
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    cafe_world: Res<CafeWorldResource>,
    save_path: Res<SavePath>,
    mut exit: MessageWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        if let Some(path) = &save_path.0 {
            match cafe_world.0.save_to_path(path) {
                Ok(()) => info!("Saved progress to {}", path.display()),
                Err(err) => error!("Could not save progress: {:#}", err),
            }
        }
        exit.write(AppExit::Success);
    }
}
