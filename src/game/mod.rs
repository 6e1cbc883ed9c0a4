pub mod controller;
pub mod countdown;
pub mod geometry;
pub mod motion;
pub mod session;

pub use controller::{FrameOutcome, GameController};
pub use countdown::{Countdown, CountdownTick};
pub use geometry::Rect;
pub use motion::MotionExtractor;
pub use session::{GameEvent, GamePhase, GameSession};
