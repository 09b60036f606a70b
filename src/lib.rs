pub mod config;
pub mod dsp;
pub mod engine; // Clock, scheduler and transport control
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod pattern; // Beat-indexed musical decisions
pub mod synth;
pub mod voices; // Drum, bass and chord voices

pub use config::{CompressorSettings, RetroConfig};
pub use engine::transport::Transport;
pub use error::{Result, RetroError};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Frames rendered per pass inside the mixer. Block-rate modulation updates at this rate.
pub const RENDER_QUANTUM: usize = 128;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
