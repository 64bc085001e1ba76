pub mod backend;
pub mod encode;
pub mod mock;

pub use backend::{CaptureBackend, Helper, HelperBackend, ScreenBackend, SystemBackend, crop_to_region};
pub use encode::{encode_jpeg, prepare_for_jpeg, save_jpeg};
pub use mock::MockScreen;
