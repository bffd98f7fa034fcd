//! Name-keyed widget registries for Bevy UI screens.
pub mod systems;

pub use systems::ui::{
    screen::{ScreenCommandsExt, ScreenPlugin, UiScreen},
    widgets::{FillImage, SliderFill, ValueSlider},
};
