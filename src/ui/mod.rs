mod comparison_view;
mod panels;
mod plot_layers;
mod plot_view;
mod single_view;
mod styles;
mod ui_config;
mod ui_render;
mod ui_text;
mod utils;

pub(crate) use ui_config::{UI_CONFIG, UI_TEXT};
pub(crate) use ui_text::describe_error;

pub use utils::{format_price, format_ratio};
