//! Shop room: floor sized to the layout, lights and the camera

use bevy::prelude::*;

use super::components::{CafeWorldResource, Ground, MainCamera};
use crate::simulation::Position;

/// Room left around the props on every side
const FLOOR_MARGIN: f32 = 6.0;
const FLOOR_COLOR: Color = Color::srgb(0.55, 0.42, 0.3);
const LAMP_COLOR: Color = Color::srgb(1.0, 0.85, 0.65);

fn to_vec3(pos: Position) -> Vec3 {
    Vec3::new(pos.x, pos.y, pos.z)
}

pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cafe_world: Res<CafeWorldResource>,
) {
    let layout = &cafe_world.0.config.layout;
    let props = [
        to_vec3(layout.counter),
        to_vec3(layout.coffee_machine),
        to_vec3(layout.bean_source),
        to_vec3(layout.customer_spawn),
    ];
    let min = props.iter().fold(props[0], |acc, p| acc.min(*p)) - Vec3::splat(FLOOR_MARGIN);
    let max = props.iter().fold(props[0], |acc, p| acc.max(*p)) + Vec3::splat(FLOOR_MARGIN);
    let size = max - min;
    let center = Vec3::new((min.x + max.x) / 2.0, 0.0, (min.z + max.z) / 2.0);

    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size.x, size.z))),
        MeshMaterial3d(materials.add(FLOOR_COLOR)),
        Transform::from_translation(center),
    ));

    // Behind the counter, looking out at the door
    let counter = to_vec3(layout.counter);
    let door = to_vec3(layout.customer_spawn);
    let behind = counter - (door - counter).normalize_or(Vec3::Z) * 14.0;
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Transform::from_xyz(behind.x, 22.0, behind.z).looking_at(center, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 4.0).looking_at(center, Vec3::Y),
    ));

    // Warm lamp over the counter
    commands.spawn((
        PointLight {
            color: LAMP_COLOR,
            intensity: 400_000.0,
            range: 20.0,
            ..default()
        },
        Transform::from_translation(counter + Vec3::Y * 5.0),
    ));
}
