//! Widget components a `UiScreen` can address by name.
//!
//! Labels are plain `Text`/`Text2d` entities and need nothing extra. Fill
//! images and sliders carry their own value here and clamp it themselves;
//! sync systems push that value onto whatever visual the entity has.
use bevy::prelude::*;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
#[require(Visibility)]
pub struct FillImage {
    fill_amount: f32,
    pub color: Color,
    pub full_size: Vec2,
}

impl FillImage {
    pub fn new(full_size: Vec2) -> Self {
        Self {
            fill_amount: 1.0,
            color: Color::WHITE,
            full_size: full_size.max(Vec2::ZERO),
        }
    }

    pub fn with_fill_amount(mut self, fill_amount: f32) -> Self {
        self.set_fill_amount(fill_amount);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn fill_amount(&self) -> f32 {
        self.fill_amount
    }

    /// Clamped to `[0, 1]`; NaN empties the image.
    pub fn set_fill_amount(&mut self, fill_amount: f32) {
        self.fill_amount = if fill_amount.is_nan() {
            0.0
        } else {
            fill_amount.clamp(0.0, 1.0)
        };
    }

    pub fn filled_size(&self) -> Vec2 {
        Vec2::new(self.full_size.x * self.fill_amount, self.full_size.y)
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
#[require(Visibility)]
pub struct ValueSlider {
    value: f32,
    min: f32,
    max: f32,
    whole_numbers: bool,
}

impl ValueSlider {
    pub fn new(min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: min,
            min,
            max,
            whole_numbers: false,
        }
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_whole_numbers(mut self, whole_numbers: bool) -> Self {
        self.whole_numbers = whole_numbers;
        self.set_value(self.value);
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    pub fn set_value(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        let value = if self.whole_numbers { value.round() } else { value };
        self.value = value.clamp(self.min, self.max);
    }

    /// Position of the value within the range, `0` for an empty range.
    pub fn normalized(&self) -> f32 {
        let span = self.max - self.min;
        if span <= f32::EPSILON {
            0.0
        } else {
            (self.value - self.min) / span
        }
    }
}

/// Marks the child `FillImage` that visualizes its parent slider.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct SliderFill;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum WidgetSystems {
    SyncSliders,
    SyncFillImages,
}

pub fn sync_slider_fills(
    slider_query: Query<(&ValueSlider, &Children), Changed<ValueSlider>>,
    mut fill_query: Query<&mut FillImage, With<SliderFill>>,
) {
    for (slider, children) in slider_query.iter() {
        for child in children.iter() {
            if let Ok(mut fill) = fill_query.get_mut(child) {
                fill.set_fill_amount(slider.normalized());
            }
        }
    }
}

pub fn sync_fill_images(
    mut image_query: Query<
        (&FillImage, Option<&mut Sprite>, Option<&mut ImageNode>, Option<&mut Node>),
        Changed<FillImage>,
    >,
) {
    for (image, sprite, image_node, node) in image_query.iter_mut() {
        if let Some(mut sprite) = sprite {
            sprite.custom_size = Some(image.filled_size());
            sprite.color = image.color;
        }
        if let Some(mut image_node) = image_node {
            image_node.color = image.color;
        }
        if let Some(mut node) = node {
            node.width = Val::Px(image.filled_size().x);
        }
    }
}
