use bevy::{ecs::world::EntityRef, prelude::*};
use smallvec::{smallvec, SmallVec};

use super::host::{WidgetKind, WidgetTree, WidgetTreeMut};
use crate::systems::ui::widgets::{FillImage, ValueSlider};

fn is_kind(node: &EntityRef, kind: WidgetKind) -> bool {
    match kind {
        WidgetKind::Label => node.contains::<Text>() || node.contains::<Text2d>(),
        WidgetKind::FillImage => node.contains::<FillImage>(),
        WidgetKind::Slider => node.contains::<ValueSlider>(),
    }
}

impl WidgetTree for World {
    type Handle = Entity;

    fn descendants_of_kind(&self, root: Entity, kind: WidgetKind, include_inactive: bool) -> Vec<Entity> {
        let mut found = Vec::new();
        let mut stack: SmallVec<[Entity; 16]> = smallvec![root];

        while let Some(entity) = stack.pop() {
            let Ok(node) = self.get_entity(entity) else {
                continue;
            };
            if !include_inactive && node.get::<Visibility>() == Some(&Visibility::Hidden) {
                continue;
            }
            if is_kind(&node, kind) {
                found.push(entity);
            }
            if let Some(children) = node.get::<Children>() {
                stack.extend(children.iter().rev());
            }
        }

        found
    }

    fn name(&self, handle: Entity) -> Option<&str> {
        self.get::<Name>(handle).map(Name::as_str)
    }

    fn parent(&self, handle: Entity) -> Option<Entity> {
        self.get::<ChildOf>(handle).map(ChildOf::parent)
    }

    fn has_button_behavior(&self, node: Entity) -> bool {
        self.get::<Button>(node).is_some()
    }
}

impl WidgetTreeMut for World {
    fn set_fill_amount(&mut self, handle: Entity, value: f32) {
        match self.get_mut::<FillImage>(handle) {
            Some(mut image) => image.set_fill_amount(value),
            None => warn!("{handle:?} is no longer a FillImage; fill ignored"),
        }
    }

    fn set_color(&mut self, handle: Entity, color: Color) {
        match self.get_mut::<FillImage>(handle) {
            Some(mut image) => image.color = color,
            None => warn!("{handle:?} is no longer a FillImage; color ignored"),
        }
    }

    fn set_slider_value(&mut self, handle: Entity, value: f32) {
        match self.get_mut::<ValueSlider>(handle) {
            Some(mut slider) => slider.set_value(value),
            None => warn!("{handle:?} is no longer a ValueSlider; value ignored"),
        }
    }

    fn set_label_text(&mut self, handle: Entity, text: &str) {
        if let Some(mut label) = self.get_mut::<Text>(handle) {
            label.0 = text.to_owned();
            return;
        }
        if let Some(mut label) = self.get_mut::<Text2d>(handle) {
            label.0 = text.to_owned();
            return;
        }
        warn!("{handle:?} is no longer a label; text ignored");
    }

    fn set_active(&mut self, root: Entity, active: bool) {
        let visibility = if active {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        match self.get_entity_mut(root) {
            Ok(mut entity) => {
                entity.insert(visibility);
            }
            Err(error) => warn!("cannot toggle screen {root:?}: {error}"),
        }
    }
}
