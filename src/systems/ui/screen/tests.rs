use bevy::prelude::*;

use super::{
    build_screen, close_screen,
    config::{DuplicateNamePolicy, ScreenRegistrySettings},
    host::WidgetKind,
    open_screen, rebuild_screen,
    registry::RegistryError,
    set_image_color, set_image_fill, set_label_text, set_slider_value, ScreenCommandsExt,
    ScreenError, ScreenPlugin, UiScreen,
};
use crate::systems::ui::widgets::{FillImage, SliderFill, ValueSlider};

fn make_screen_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(ScreenPlugin);
    app
}

struct Hud {
    screen: Entity,
    health: Entity,
    mana: Entity,
    volume: Entity,
    hp: Entity,
    score: Entity,
}

fn spawn_hud(world: &mut World, visibility: Visibility) -> Hud {
    let screen = world.spawn((Name::new("Hud"), UiScreen::default(), visibility)).id();
    let bars = world.spawn((Name::new("Bars"), ChildOf(screen))).id();
    let health = world
        .spawn((
            Name::new("HealthBar"),
            FillImage::new(Vec2::new(200.0, 12.0)),
            ChildOf(bars),
        ))
        .id();
    let mana = world
        .spawn((
            Name::new("ManaBar"),
            FillImage::new(Vec2::new(200.0, 12.0)).with_color(Color::srgb(0.0, 0.0, 1.0)),
            ChildOf(bars),
        ))
        .id();
    let volume = world
        .spawn((Name::new("Volume"), ValueSlider::new(0.0, 1.0), ChildOf(screen)))
        .id();
    let hp = world
        .spawn((Name::new("hp"), ValueSlider::new(0.0, 1.0), ChildOf(screen)))
        .id();
    let score = world
        .spawn((Name::new("Score"), Text::new("0"), ChildOf(screen)))
        .id();
    let quit = world
        .spawn((Name::new("QuitButton"), Button, ChildOf(screen)))
        .id();
    world.spawn((Name::new("QuitCaption"), Text::new("Quit"), ChildOf(quit)));

    Hud {
        screen,
        health,
        mana,
        volume,
        hp,
        score,
    }
}

fn screen(app: &App, entity: Entity) -> &UiScreen {
    app.world().get::<UiScreen>(entity).expect("screen exists")
}

#[test]
fn visible_screen_is_built_once_on_first_update() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Visible);

    app.update();
    app.update();

    let screen = screen(&app, hud.screen);
    assert!(screen.is_built());
    assert_eq!(screen.builds(), 1);
    assert_eq!(screen.registry().len(WidgetKind::Label), 1);
    assert_eq!(screen.registry().len(WidgetKind::FillImage), 2);
    assert_eq!(screen.registry().len(WidgetKind::Slider), 2);
}

#[test]
fn hidden_screen_waits_for_open() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);

    app.update();
    assert!(!screen(&app, hud.screen).is_built());

    assert_eq!(open_screen(app.world_mut(), hud.screen), Ok(true));
    assert_eq!(screen(&app, hud.screen).builds(), 1);
    assert_eq!(
        app.world().get::<Visibility>(hud.screen),
        Some(&Visibility::Inherited)
    );

    assert_eq!(open_screen(app.world_mut(), hud.screen), Ok(false));
    app.update();
    assert_eq!(screen(&app, hud.screen).builds(), 1);
}

#[test]
fn close_hides_without_touching_the_indexes() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);
    open_screen(app.world_mut(), hud.screen).expect("hud is a screen");

    close_screen(app.world_mut(), hud.screen).expect("hud is a screen");

    assert_eq!(
        app.world().get::<Visibility>(hud.screen),
        Some(&Visibility::Hidden)
    );
    assert!(screen(&app, hud.screen).is_built());
}

#[test]
fn image_color_reaches_only_the_named_image() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);
    open_screen(app.world_mut(), hud.screen).expect("hud is a screen");

    set_image_color(app.world_mut(), hud.screen, "HealthBar", 1.0, 0.0, 0.0, 1.0)
        .expect("HealthBar is indexed");

    let world = app.world();
    assert_eq!(
        world.get::<FillImage>(hud.health).map(|image| image.color),
        Some(Color::srgba(1.0, 0.0, 0.0, 1.0))
    );
    assert_eq!(
        world.get::<FillImage>(hud.mana).map(|image| image.color),
        Some(Color::srgb(0.0, 0.0, 1.0))
    );
}

#[test]
fn slider_value_reaches_only_the_named_slider() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);
    open_screen(app.world_mut(), hud.screen).expect("hud is a screen");

    set_slider_value(app.world_mut(), hud.screen, "hp", 0.75).expect("hp is indexed");

    let world = app.world();
    assert_eq!(world.get::<ValueSlider>(hud.hp).map(ValueSlider::value), Some(0.75));
    assert_eq!(world.get::<ValueSlider>(hud.volume).map(ValueSlider::value), Some(0.0));
}

#[test]
fn missing_names_are_reported_and_change_nothing() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);
    open_screen(app.world_mut(), hud.screen).expect("hud is a screen");

    let result = set_image_fill(app.world_mut(), hud.screen, "missing", 0.5);

    assert_eq!(
        result,
        Err(ScreenError::Registry(RegistryError::NameNotFound {
            kind: WidgetKind::FillImage,
            name: String::from("missing"),
        }))
    );
    for bar in [hud.health, hud.mana] {
        assert_eq!(
            app.world().get::<FillImage>(bar).map(FillImage::fill_amount),
            Some(1.0)
        );
    }
}

#[test]
fn button_captions_cannot_be_addressed() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);
    open_screen(app.world_mut(), hud.screen).expect("hud is a screen");

    set_label_text(app.world_mut(), hud.screen, "Score", "1200").expect("Score is indexed");
    assert!(set_label_text(app.world_mut(), hud.screen, "QuitCaption", "Exit").is_err());

    assert_eq!(
        app.world().get::<Text>(hud.score).map(|text| text.0.as_str()),
        Some("1200")
    );
}

#[test]
fn mutating_an_unbuilt_screen_reports_name_not_found() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);

    assert!(matches!(
        set_slider_value(app.world_mut(), hud.screen, "hp", 0.5),
        Err(ScreenError::Registry(RegistryError::NameNotFound { .. }))
    ));
}

#[test]
fn operations_on_a_plain_entity_report_not_a_screen() {
    let mut app = make_screen_test_app();
    let plain = app.world_mut().spawn(Name::new("Plain")).id();

    assert_eq!(build_screen(app.world_mut(), plain), Err(ScreenError::NotAScreen(plain)));
    assert_eq!(close_screen(app.world_mut(), plain), Err(ScreenError::NotAScreen(plain)));
}

#[test]
fn rebuild_picks_up_renamed_widgets() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);
    open_screen(app.world_mut(), hud.screen).expect("hud is a screen");

    app.world_mut()
        .entity_mut(hud.health)
        .insert(Name::new("ShieldBar"));

    assert_eq!(build_screen(app.world_mut(), hud.screen), Ok(false));
    assert!(set_image_fill(app.world_mut(), hud.screen, "ShieldBar", 0.5).is_err());

    rebuild_screen(app.world_mut(), hud.screen).expect("names are unique");
    set_image_fill(app.world_mut(), hud.screen, "ShieldBar", 0.5).expect("renamed bar is indexed");

    assert!(set_image_fill(app.world_mut(), hud.screen, "HealthBar", 0.5).is_err());
    assert_eq!(screen(&app, hud.screen).builds(), 2);
}

#[test]
fn duplicate_names_leave_the_screen_unbuilt() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);
    app.world_mut()
        .spawn((Name::new("HealthBar"), FillImage::new(Vec2::ONE), ChildOf(hud.screen)));

    let result = open_screen(app.world_mut(), hud.screen);

    assert_eq!(
        result,
        Err(ScreenError::Registry(RegistryError::DuplicateName {
            kind: WidgetKind::FillImage,
            name: String::from("HealthBar"),
        }))
    );
    assert!(!screen(&app, hud.screen).is_built());
    assert_eq!(screen(&app, hud.screen).builds(), 0);
}

#[test]
fn screen_settings_override_the_resource() {
    let mut app = make_screen_test_app();
    app.insert_resource(ScreenRegistrySettings {
        include_inactive: false,
        duplicate_names: DuplicateNamePolicy::Fail,
    });
    let world = app.world_mut();
    let lenient = world
        .spawn((
            UiScreen::with_settings(ScreenRegistrySettings {
                include_inactive: true,
                duplicate_names: DuplicateNamePolicy::KeepFirst,
            }),
            Visibility::Hidden,
        ))
        .id();
    let strict = world.spawn((UiScreen::default(), Visibility::Hidden)).id();
    for root in [lenient, strict] {
        let popup = world.spawn((Visibility::Hidden, ChildOf(root))).id();
        world.spawn((Name::new("Bar"), FillImage::new(Vec2::ONE), ChildOf(popup)));
        world.spawn((Name::new("Bar"), FillImage::new(Vec2::ONE), ChildOf(popup)));
    }

    open_screen(app.world_mut(), lenient).expect("duplicates are tolerated");
    open_screen(app.world_mut(), strict).expect("hidden duplicates are never seen");

    assert!(screen(&app, lenient).registry().contains(WidgetKind::FillImage, "Bar"));
    assert_eq!(screen(&app, strict).registry().len(WidgetKind::FillImage), 0);
}

#[test]
fn commands_apply_on_the_next_update_and_log_failures() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Hidden);
    let fill = app
        .world_mut()
        .spawn((
            Name::new("VolumeFill"),
            SliderFill,
            FillImage::new(Vec2::new(100.0, 4.0)),
            Sprite::default(),
            ChildOf(hud.volume),
        ))
        .id();

    app.add_systems(Update, move |mut commands: Commands, mut ran: Local<bool>| {
        if *ran {
            return;
        }
        *ran = true;
        commands.open_screen(hud.screen);
        commands.set_slider_value(hud.screen, "Volume", 0.25);
        commands.set_image_fill(hud.screen, "HealthBar", 0.4);
        commands.set_image_color(hud.screen, "ManaBar", Color::WHITE);
        commands.set_label_text(hud.screen, "Score", "7");
        commands.set_image_fill(hud.screen, "NoSuchBar", 0.1);
    });

    app.update();

    let world = app.world();
    assert!(screen(&app, hud.screen).is_built());
    assert_eq!(world.get::<ValueSlider>(hud.volume).map(ValueSlider::value), Some(0.25));
    assert_eq!(world.get::<FillImage>(hud.health).map(FillImage::fill_amount), Some(0.4));
    assert_eq!(
        world.get::<FillImage>(hud.mana).map(|image| image.color.to_srgba()),
        Some(Color::WHITE.to_srgba())
    );
    assert_eq!(world.get::<Text>(hud.score).map(|text| text.0.as_str()), Some("7"));
    assert_eq!(
        world.get::<Sprite>(fill).and_then(|sprite| sprite.custom_size),
        Some(Vec2::new(25.0, 4.0))
    );
}

#[test]
fn visible_screen_is_ready_for_update_systems_on_the_first_frame() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Visible);

    app.add_systems(Update, move |mut commands: Commands| {
        commands.set_image_fill(hud.screen, "HealthBar", 0.3);
    });

    app.update();

    assert_eq!(screen(&app, hud.screen).builds(), 1);
    assert_eq!(
        app.world().get::<FillImage>(hud.health).map(FillImage::fill_amount),
        Some(0.3)
    );
}

#[test]
fn failed_automatic_build_is_not_retried() {
    let mut app = make_screen_test_app();
    let hud = spawn_hud(app.world_mut(), Visibility::Visible);
    let duplicate = app
        .world_mut()
        .spawn((Name::new("ManaBar"), FillImage::new(Vec2::ONE), ChildOf(hud.screen)))
        .id();

    app.update();
    assert!(!screen(&app, hud.screen).is_built());

    app.world_mut().despawn(duplicate);
    app.update();

    let screen = screen(&app, hud.screen);
    assert!(!screen.is_built());
    assert_eq!(screen.builds(), 0);
}
