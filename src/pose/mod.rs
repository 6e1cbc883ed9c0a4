#[cfg(feature = "desktop")]
pub mod detector;
pub mod keypoint;
pub mod poller;
#[cfg(feature = "desktop")]
pub mod preprocess;
pub mod source;

#[cfg(feature = "desktop")]
pub use detector::{MoveNetSource, PoseDetector};
pub use keypoint::{Keypoint, KeypointIndex, Pose};
pub use poller::PosePoller;
#[cfg(feature = "desktop")]
pub use preprocess::preprocess_for_movenet;
pub use source::{PoseSource, ScriptedSource};
