pub mod canvas;
pub mod display;
pub mod hud;
pub mod scene;
#[cfg(feature = "desktop")]
pub mod window;

pub use canvas::Canvas;
pub use display::{Display, Input};
pub use hud::Hud;
pub use scene::draw_scene;
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;
