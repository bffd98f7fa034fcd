//! Capabilities a screen registry needs from whatever owns the widgets.
//!
//! The registry never walks a hierarchy itself. It asks a [`WidgetTree`] for
//! the descendants of a root that carry a given [`WidgetKind`], and it routes
//! every mutation through [`WidgetTreeMut`]. The Bevy `World` implements both
//! (see `world_host`); tests substitute an in-memory tree.
use std::{fmt, hash::Hash};

use bevy::color::Color;
use enum_map::Enum;

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Label,
    FillImage,
    Slider,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 3] = [Self::Label, Self::FillImage, Self::Slider];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::FillImage => "fill image",
            Self::Slider => "slider",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait WidgetTree {
    /// Non-owning reference to a host node. Stale handles are the host's
    /// problem; the registry only stores and returns them.
    type Handle: Copy + Eq + Hash + fmt::Debug;

    /// Every node of `kind` under `root` (root included), depth-first in
    /// hierarchy order. Hidden subtrees are skipped unless `include_inactive`.
    fn descendants_of_kind(
        &self,
        root: Self::Handle,
        kind: WidgetKind,
        include_inactive: bool,
    ) -> Vec<Self::Handle>;

    fn name(&self, handle: Self::Handle) -> Option<&str>;

    fn parent(&self, handle: Self::Handle) -> Option<Self::Handle>;

    fn has_button_behavior(&self, node: Self::Handle) -> bool;
}

pub trait WidgetTreeMut: WidgetTree {
    fn set_fill_amount(&mut self, handle: Self::Handle, value: f32);

    fn set_color(&mut self, handle: Self::Handle, color: Color);

    fn set_slider_value(&mut self, handle: Self::Handle, value: f32);

    fn set_label_text(&mut self, handle: Self::Handle, text: &str);

    fn set_active(&mut self, root: Self::Handle, active: bool);
}
