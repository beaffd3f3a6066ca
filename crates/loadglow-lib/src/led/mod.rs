//! Backlight colors — HSV/RGB conversion, load mapping, zone dispatch.

mod color;
mod load;
mod ops;

pub use color::{HsvColor, RgbColor, format_color, hsv_to_rgb};
pub use load::{DEFAULT_HUE, load_to_hsv, saturation_for_ratio};
pub use ops::{dispatch_color, dispatch_hsv};
