use std::collections::{hash_map::Entry, HashMap};

use bevy::prelude::*;
use enum_map::EnumMap;

use super::{
    config::{DuplicateNamePolicy, ScreenRegistrySettings},
    host::{WidgetKind, WidgetTree, WidgetTreeMut},
};

pub type WidgetIndex<H> = HashMap<String, H>;
pub type WidgetIndexes<H> = EnumMap<WidgetKind, WidgetIndex<H>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No widget of `kind` is registered under `name`. Also reported for
    /// registries that have not been built yet.
    NameNotFound { kind: WidgetKind, name: String },
    DuplicateName { kind: WidgetKind, name: String },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameNotFound { kind, name } => write!(f, "no {kind} named `{name}` on this screen"),
            Self::DuplicateName { kind, name } => {
                write!(f, "more than one {kind} is named `{name}` on this screen")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Scans `root` once per widget kind and indexes every hit by display name.
///
/// Labels whose direct parent behaves like a button are button captions and
/// are left out of the label index. Widgets without a name cannot be
/// addressed and are skipped.
pub fn scan_indexes<T: WidgetTree>(
    tree: &T,
    root: T::Handle,
    settings: &ScreenRegistrySettings,
) -> Result<WidgetIndexes<T::Handle>, RegistryError> {
    let mut indexes = WidgetIndexes::default();

    for kind in WidgetKind::ALL {
        let index = &mut indexes[kind];
        for handle in tree.descendants_of_kind(root, kind, settings.include_inactive) {
            if kind == WidgetKind::Label && is_button_caption(tree, handle) {
                continue;
            }
            let Some(name) = tree.name(handle) else {
                debug!("skipping unnamed {kind} {handle:?}");
                continue;
            };
            insert_widget(index, kind, name, handle, settings.duplicate_names)?;
        }
    }

    Ok(indexes)
}

fn is_button_caption<T: WidgetTree>(tree: &T, label: T::Handle) -> bool {
    tree.parent(label)
        .is_some_and(|parent| tree.has_button_behavior(parent))
}

fn insert_widget<H: Copy + std::fmt::Debug>(
    index: &mut WidgetIndex<H>,
    kind: WidgetKind,
    name: &str,
    handle: H,
    policy: DuplicateNamePolicy,
) -> Result<(), RegistryError> {
    match index.entry(name.to_owned()) {
        Entry::Vacant(slot) => {
            slot.insert(handle);
        }
        Entry::Occupied(mut slot) => match policy {
            DuplicateNamePolicy::Fail => {
                return Err(RegistryError::DuplicateName {
                    kind,
                    name: name.to_owned(),
                });
            }
            DuplicateNamePolicy::KeepFirst => {
                warn!("duplicate {kind} name `{name}`; keeping {:?}, ignoring {handle:?}", slot.get());
            }
            DuplicateNamePolicy::Overwrite => {
                warn!("duplicate {kind} name `{name}`; {handle:?} replaces {:?}", slot.get());
                slot.insert(handle);
            }
        },
    }
    Ok(())
}

/// Name-keyed indexes of the labels, fill images and sliders under one screen.
///
/// The registry is either unbuilt or holds all three indexes; a failed scan
/// never leaves a partial registry behind.
#[derive(Debug, Clone)]
pub struct ScreenRegistry<H> {
    indexes: Option<WidgetIndexes<H>>,
    settings: ScreenRegistrySettings,
}

impl<H> Default for ScreenRegistry<H> {
    fn default() -> Self {
        Self::new(ScreenRegistrySettings::default())
    }
}

impl<H> ScreenRegistry<H> {
    pub fn new(settings: ScreenRegistrySettings) -> Self {
        Self {
            indexes: None,
            settings,
        }
    }

    pub fn settings(&self) -> &ScreenRegistrySettings {
        &self.settings
    }

    /// Takes effect on the next scan; existing indexes are kept.
    pub fn set_settings(&mut self, settings: ScreenRegistrySettings) {
        self.settings = settings;
    }

    pub fn is_built(&self) -> bool {
        self.indexes.is_some()
    }

    pub fn clear(&mut self) {
        self.indexes = None;
    }

    fn install(&mut self, indexes: WidgetIndexes<H>) {
        self.indexes = Some(indexes);
    }

    pub fn len(&self, kind: WidgetKind) -> usize {
        self.indexes.as_ref().map_or(0, |indexes| indexes[kind].len())
    }

    pub fn contains(&self, kind: WidgetKind, name: &str) -> bool {
        self.indexes
            .as_ref()
            .is_some_and(|indexes| indexes[kind].contains_key(name))
    }

    /// Registered names of `kind`, sorted.
    pub fn names(&self, kind: WidgetKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .indexes
            .iter()
            .flat_map(|indexes| indexes[kind].keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names
    }
}

impl<H: Copy + Eq + std::hash::Hash + std::fmt::Debug> ScreenRegistry<H> {
    /// Builds the indexes unless they already exist. Returns whether a scan ran.
    pub fn build<T>(&mut self, tree: &T, root: H) -> Result<bool, RegistryError>
    where
        T: WidgetTree<Handle = H>,
    {
        if self.is_built() {
            return Ok(false);
        }
        self.rebuild(tree, root)?;
        Ok(true)
    }

    /// Drops the current indexes and rescans `root` unconditionally.
    pub fn rebuild<T>(&mut self, tree: &T, root: H) -> Result<(), RegistryError>
    where
        T: WidgetTree<Handle = H>,
    {
        self.clear();
        let indexes = scan_indexes(tree, root, &self.settings)?;
        self.install(indexes);
        Ok(())
    }

    pub fn get(&self, kind: WidgetKind, name: &str) -> Result<H, RegistryError> {
        self.indexes
            .as_ref()
            .and_then(|indexes| indexes[kind].get(name).copied())
            .ok_or_else(|| RegistryError::NameNotFound {
                kind,
                name: name.to_owned(),
            })
    }

    pub fn set_image_fill<T>(&self, tree: &mut T, name: &str, value: f32) -> Result<(), RegistryError>
    where
        T: WidgetTreeMut<Handle = H>,
    {
        let image = self.get(WidgetKind::FillImage, name)?;
        tree.set_fill_amount(image, value);
        Ok(())
    }

    pub fn set_image_color<T>(
        &self,
        tree: &mut T,
        name: &str,
        red: f32,
        green: f32,
        blue: f32,
        alpha: f32,
    ) -> Result<(), RegistryError>
    where
        T: WidgetTreeMut<Handle = H>,
    {
        let image = self.get(WidgetKind::FillImage, name)?;
        tree.set_color(image, Color::srgba(red, green, blue, alpha));
        Ok(())
    }

    pub fn set_slider_value<T>(&self, tree: &mut T, name: &str, value: f32) -> Result<(), RegistryError>
    where
        T: WidgetTreeMut<Handle = H>,
    {
        let slider = self.get(WidgetKind::Slider, name)?;
        tree.set_slider_value(slider, value);
        Ok(())
    }

    pub fn set_label_text<T>(&self, tree: &mut T, name: &str, text: &str) -> Result<(), RegistryError>
    where
        T: WidgetTreeMut<Handle = H>,
    {
        let label = self.get(WidgetKind::Label, name)?;
        tree.set_label_text(label, text);
        Ok(())
    }
}
