//! Name-addressable screens.
//!
//! A `UiScreen` entity scans its own subtree once, on first activation, and
//! indexes every label, `FillImage` and `ValueSlider` under it by `Name`.
//! Game code then drives those widgets by name through `ScreenCommandsExt`
//! (or the world functions below) without holding entity ids.
//!
//! Labels parented directly to a `Button` are captions and are not indexed.
pub mod config;
pub mod host;
pub mod registry;
pub mod world_host;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::systems::ui::widgets::{sync_fill_images, sync_slider_fills, WidgetSystems};

use self::{
    config::ScreenRegistrySettings,
    host::{WidgetKind, WidgetTreeMut},
    registry::{RegistryError, ScreenRegistry},
};

pub struct ScreenPlugin;

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScreenRegistrySettings>()
            .configure_sets(
                PostUpdate,
                (WidgetSystems::SyncSliders, WidgetSystems::SyncFillImages).chain(),
            )
            .add_systems(PreUpdate, activate_screens.in_set(ScreenSystems::Activate))
            .add_systems(
                PostUpdate,
                (
                    sync_slider_fills.in_set(WidgetSystems::SyncSliders),
                    sync_fill_images.in_set(WidgetSystems::SyncFillImages),
                ),
            );
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum ScreenSystems {
    Activate,
}

#[derive(Component, Debug, Default)]
#[require(Visibility)]
pub struct UiScreen {
    settings: Option<ScreenRegistrySettings>,
    registry: ScreenRegistry<Entity>,
    activated: bool,
    builds: u32,
}

impl UiScreen {
    /// A screen that ignores the `ScreenRegistrySettings` resource.
    pub fn with_settings(settings: ScreenRegistrySettings) -> Self {
        Self {
            settings: Some(settings),
            registry: ScreenRegistry::new(settings),
            ..default()
        }
    }

    pub fn registry(&self) -> &ScreenRegistry<Entity> {
        &self.registry
    }

    pub fn is_built(&self) -> bool {
        self.registry.is_built()
    }

    /// Completed scans over the lifetime of this screen.
    pub fn builds(&self) -> u32 {
        self.builds
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    NotAScreen(Entity),
    Registry(RegistryError),
}

impl std::fmt::Display for ScreenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAScreen(entity) => write!(f, "{entity:?} has no UiScreen component"),
            Self::Registry(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for ScreenError {}

impl From<RegistryError> for ScreenError {
    fn from(error: RegistryError) -> Self {
        Self::Registry(error)
    }
}

fn screen_ref(world: &World, screen: Entity) -> Result<&UiScreen, ScreenError> {
    world
        .get::<UiScreen>(screen)
        .ok_or(ScreenError::NotAScreen(screen))
}

fn screen_mut(world: &mut World, screen: Entity) -> Result<Mut<'_, UiScreen>, ScreenError> {
    world
        .get_mut::<UiScreen>(screen)
        .ok_or(ScreenError::NotAScreen(screen))
}

fn resolve_settings(world: &World, screen: Entity) -> Result<ScreenRegistrySettings, ScreenError> {
    Ok(screen_ref(world, screen)?
        .settings
        .or_else(|| world.get_resource::<ScreenRegistrySettings>().copied())
        .unwrap_or_default())
}

/// Runs `apply` with the screen's registry moved out of the component, so the
/// registry can scan or mutate the world that owns it.
fn with_registry<R>(
    world: &mut World,
    screen: Entity,
    apply: impl FnOnce(&mut ScreenRegistry<Entity>, &mut World) -> Result<R, RegistryError>,
) -> Result<R, ScreenError> {
    let mut registry = std::mem::take(&mut screen_mut(world, screen)?.registry);
    let result = apply(&mut registry, world);
    screen_mut(world, screen)?.registry = registry;
    Ok(result?)
}

/// Scans through `scan` with freshly resolved settings and counts the build
/// when a scan completed.
fn scan_screen(
    world: &mut World,
    screen: Entity,
    scan: impl FnOnce(&mut ScreenRegistry<Entity>, &World) -> Result<bool, RegistryError>,
) -> Result<bool, ScreenError> {
    let settings = resolve_settings(world, screen)?;
    let scanned = with_registry(world, screen, |registry, world| {
        registry.set_settings(settings);
        scan(registry, &*world)
    })?;
    if !scanned {
        return Ok(false);
    }

    let mut component = screen_mut(world, screen)?;
    component.builds += 1;
    debug!(
        "indexed screen {screen:?}: {} labels, {} fill images, {} sliders",
        component.registry.len(WidgetKind::Label),
        component.registry.len(WidgetKind::FillImage),
        component.registry.len(WidgetKind::Slider),
    );
    Ok(true)
}

/// Scans the screen unless it is already built. Returns whether a scan ran.
pub fn build_screen(world: &mut World, screen: Entity) -> Result<bool, ScreenError> {
    scan_screen(world, screen, |registry, world| registry.build(world, screen))
}

/// Drops the screen's indexes and rescans its subtree.
pub fn rebuild_screen(world: &mut World, screen: Entity) -> Result<(), ScreenError> {
    scan_screen(world, screen, |registry, world| {
        registry.rebuild(world, screen).map(|()| true)
    })
    .map(drop)
}

/// Shows the screen, building its indexes if this is their first use.
/// Returns whether a scan ran.
pub fn open_screen(world: &mut World, screen: Entity) -> Result<bool, ScreenError> {
    screen_mut(world, screen)?.activated = true;
    world.set_active(screen, true);
    build_screen(world, screen)
}

pub fn close_screen(world: &mut World, screen: Entity) -> Result<(), ScreenError> {
    screen_ref(world, screen)?;
    world.set_active(screen, false);
    Ok(())
}

pub fn set_image_fill(world: &mut World, screen: Entity, name: &str, value: f32) -> Result<(), ScreenError> {
    with_registry(world, screen, |registry, world| {
        registry.set_image_fill(world, name, value)
    })
}

pub fn set_image_color(
    world: &mut World,
    screen: Entity,
    name: &str,
    red: f32,
    green: f32,
    blue: f32,
    alpha: f32,
) -> Result<(), ScreenError> {
    with_registry(world, screen, |registry, world| {
        registry.set_image_color(world, name, red, green, blue, alpha)
    })
}

pub fn set_slider_value(world: &mut World, screen: Entity, name: &str, value: f32) -> Result<(), ScreenError> {
    with_registry(world, screen, |registry, world| {
        registry.set_slider_value(world, name, value)
    })
}

pub fn set_label_text(world: &mut World, screen: Entity, name: &str, text: &str) -> Result<(), ScreenError> {
    with_registry(world, screen, |registry, world| {
        registry.set_label_text(world, name, text)
    })
}

/// Builds every screen that became visible without being opened explicitly.
/// Each screen gets one automatic attempt; a failed scan is logged, not retried.
pub fn activate_screens(world: &mut World) {
    let mut query = world.query::<(Entity, &UiScreen, &Visibility)>();
    let pending: Vec<Entity> = query
        .iter(world)
        .filter(|(_, screen, visibility)| !screen.activated && **visibility != Visibility::Hidden)
        .map(|(entity, ..)| entity)
        .collect();

    for screen in pending {
        if let Ok(mut component) = screen_mut(world, screen) {
            component.activated = true;
        }
        report(build_screen(world, screen));
    }
}

fn report<T>(result: Result<T, ScreenError>) {
    if let Err(error) = result {
        error!("{error}");
    }
}

/// Deferred screen operations. Failures are logged and never panic.
pub trait ScreenCommandsExt {
    fn open_screen(&mut self, screen: Entity);
    fn close_screen(&mut self, screen: Entity);
    fn rebuild_screen(&mut self, screen: Entity);
    fn set_image_fill(&mut self, screen: Entity, name: impl Into<String>, value: f32);
    fn set_image_color(&mut self, screen: Entity, name: impl Into<String>, color: Color);
    fn set_slider_value(&mut self, screen: Entity, name: impl Into<String>, value: f32);
    fn set_label_text(&mut self, screen: Entity, name: impl Into<String>, text: impl Into<String>);
}

impl ScreenCommandsExt for Commands<'_, '_> {
    fn open_screen(&mut self, screen: Entity) {
        self.queue(move |world: &mut World| report(open_screen(world, screen)));
    }

    fn close_screen(&mut self, screen: Entity) {
        self.queue(move |world: &mut World| report(close_screen(world, screen)));
    }

    fn rebuild_screen(&mut self, screen: Entity) {
        self.queue(move |world: &mut World| report(rebuild_screen(world, screen)));
    }

    fn set_image_fill(&mut self, screen: Entity, name: impl Into<String>, value: f32) {
        let name = name.into();
        self.queue(move |world: &mut World| report(set_image_fill(world, screen, &name, value)));
    }

    fn set_image_color(&mut self, screen: Entity, name: impl Into<String>, color: Color) {
        let name = name.into();
        let Srgba {
            red,
            green,
            blue,
            alpha,
        } = color.to_srgba();
        self.queue(move |world: &mut World| {
            report(set_image_color(world, screen, &name, red, green, blue, alpha))
        });
    }

    fn set_slider_value(&mut self, screen: Entity, name: impl Into<String>, value: f32) {
        let name = name.into();
        self.queue(move |world: &mut World| report(set_slider_value(world, screen, &name, value)));
    }

    fn set_label_text(&mut self, screen: Entity, name: impl Into<String>, text: impl Into<String>) {
        let name = name.into();
        let text = text.into();
        self.queue(move |world: &mut World| report(set_label_text(world, screen, &name, &text)));
    }
}
