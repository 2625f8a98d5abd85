//! CLI Command Implementations
//!
//! - [`serve`]: HTTP form serving
//! - [`predict`]: offline single prediction

mod predict;
mod serve;

pub use predict::PredictCommand;
pub use serve::ServeCommand;
