use bevy::prelude::*;
use rand::Rng;

use screen_registry::{FillImage, ScreenCommandsExt, ScreenPlugin, SliderFill, UiScreen, ValueSlider};

const BAR_SIZE: Vec2 = Vec2::new(300.0, 16.0);
const HEALTH_COLOR: Color = Color::srgb(0.1, 0.8, 0.2);
const DANGER_COLOR: Color = Color::srgb(0.9, 0.1, 0.1);
const MANA_COLOR: Color = Color::srgb(0.2, 0.3, 0.9);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins((ScreenPlugin, HudPlugin))
        .run();
}

struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Vitals>()
            .add_systems(Startup, spawn_hud)
            .add_systems(Update, (tick_vitals, adjust_volume, toggle_hud));
    }
}

#[derive(Component)]
struct HudScreen;

#[derive(Resource)]
struct Vitals {
    health: f32,
    mana: f32,
    volume: f32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health: 1.0,
            mana: 0.5,
            volume: 0.5,
        }
    }
}

fn bar(name: &'static str, color: Color) -> impl Bundle {
    (
        Name::new(name),
        FillImage::new(BAR_SIZE).with_color(color),
        ImageNode::solid_color(color),
        Node {
            width: Val::Px(BAR_SIZE.x),
            height: Val::Px(BAR_SIZE.y),
            ..default()
        },
    )
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn(Camera2d);

    commands
        .spawn((
            Name::new("Hud"),
            HudScreen,
            UiScreen::default(),
            Node {
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
        ))
        .with_children(|hud| {
            hud.spawn((Name::new("Status"), Text::new("")));
            hud.spawn(bar("HealthBar", HEALTH_COLOR));
            hud.spawn(bar("ManaBar", MANA_COLOR));
            hud.spawn((
                Name::new("Volume"),
                ValueSlider::new(0.0, 1.0).with_value(0.5),
                Node {
                    width: Val::Px(BAR_SIZE.x),
                    height: Val::Px(8.0),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.2, 0.2, 0.2)),
            ))
            .with_children(|slider| {
                slider.spawn((
                    SliderFill,
                    Name::new("VolumeFill"),
                    FillImage::new(Vec2::new(BAR_SIZE.x, 8.0)),
                    ImageNode::solid_color(Color::WHITE),
                    Node::default(),
                ));
            });
            hud.spawn((
                Name::new("MenuButton"),
                Button,
                Node {
                    width: Val::Px(120.0),
                    ..default()
                },
            ))
            .with_children(|button| {
                button.spawn((Name::new("MenuCaption"), Text::new("Menu")));
            });
        });
}

fn tick_vitals(
    time: Res<Time>,
    mut vitals: ResMut<Vitals>,
    hud_query: Query<Entity, With<HudScreen>>,
    mut commands: Commands,
) {
    let Ok(hud) = hud_query.single() else {
        return;
    };
    let mut rng = rand::rng();

    vitals.health -= time.delta_secs() * 0.05;
    if vitals.health <= 0.0 {
        vitals.health = 1.0;
    }
    vitals.mana = (vitals.mana + rng.random_range(-0.01..=0.015)).clamp(0.0, 1.0);

    let health_color = if vitals.health < 0.25 {
        DANGER_COLOR
    } else {
        HEALTH_COLOR
    };

    commands.set_image_fill(hud, "HealthBar", vitals.health);
    commands.set_image_color(hud, "HealthBar", health_color);
    commands.set_image_fill(hud, "ManaBar", vitals.mana);
    commands.set_label_text(
        hud,
        "Status",
        format!(
            "HP {:>3.0}%  MP {:>3.0}%  VOL {:>3.0}%",
            vitals.health * 100.0,
            vitals.mana * 100.0,
            vitals.volume * 100.0
        ),
    );
}

fn adjust_volume(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut vitals: ResMut<Vitals>,
    hud_query: Query<Entity, With<HudScreen>>,
    mut commands: Commands,
) {
    let step = if keyboard_input.just_pressed(KeyCode::ArrowUp) {
        0.1
    } else if keyboard_input.just_pressed(KeyCode::ArrowDown) {
        -0.1
    } else {
        return;
    };
    let Ok(hud) = hud_query.single() else {
        return;
    };

    vitals.volume = (vitals.volume + step).clamp(0.0, 1.0);
    commands.set_slider_value(hud, "Volume", vitals.volume);
}

fn toggle_hud(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    hud_query: Query<(Entity, &Visibility), With<HudScreen>>,
    mut commands: Commands,
) {
    if !keyboard_input.just_pressed(KeyCode::Tab) {
        return;
    }
    let Ok((hud, visibility)) = hud_query.single() else {
        return;
    };

    if *visibility == Visibility::Hidden {
        commands.open_screen(hud);
    } else {
        commands.close_screen(hud);
    }
}
