pub mod client;
pub mod http_error;
pub mod kernel;
pub mod playback;
pub mod plugins;

pub use crate::kernel::*;
