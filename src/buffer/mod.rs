// ============================================================================
// Buffer Module
// Growable and rolling storage for decimal values
// ============================================================================

mod config;
mod rolling;

pub use config::{BufferConfig, ExpansionMode};
pub use rolling::RollingDecimalBuffer;
