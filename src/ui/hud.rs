//! HUD panels showing money, inventory, prompts, upgrades and recent events

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use super::components::HudText;

/// System to setup the HUD
pub fn setup_hud(mut commands: Commands) {
    // Shop status at top-left of screen
    commands
        .spawn((
            Node {
                width: Val::Auto,
                height: Val::Auto,
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(5.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|parent| {
            spawn_hud_text(parent, HudText::Money, "Money: $0", 18.0, Color::srgb(0.2, 1.0, 0.2));
            spawn_hud_text(parent, HudText::Carrying, "Beans: 0  Coffee: 0", 14.0, Color::WHITE);
            spawn_hud_text(parent, HudText::Customers, "Customers: 0", 14.0, Color::WHITE);
            spawn_hud_text(
                parent,
                HudText::Satisfaction,
                "Satisfaction: 100%",
                14.0,
                Color::srgb(1.0, 1.0, 0.5),
            );
        });

    // Interaction prompts along the bottom
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Auto,
                position_type: PositionType::Absolute,
                bottom: Val::Px(10.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                column_gap: Val::Px(30.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            let prompt_color = Color::srgb(0.9, 0.9, 0.9);
            spawn_hud_text(parent, HudText::BeanBag, "", 16.0, prompt_color);
            spawn_hud_text(parent, HudText::Machine, "", 16.0, prompt_color);
            spawn_hud_text(parent, HudText::Counter, "", 16.0, prompt_color);
        });

    // Upgrade shop and event log on the right
    commands
        .spawn((
            Node {
                width: Val::Px(300.0),
                height: Val::Auto,
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                right: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Upgrades"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            spawn_hud_text(parent, HudText::Upgrades, "", 13.0, Color::srgb(0.7, 0.85, 1.0));
            spawn_hud_text(parent, HudText::Events, "", 13.0, Color::srgb(0.9, 0.8, 0.6));
        });
}

fn spawn_hud_text(
    parent: &mut ChildSpawnerCommands,
    hud_text: HudText,
    text: &str,
    font_size: f32,
    color: Color,
) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
        hud_text,
    ));
}
