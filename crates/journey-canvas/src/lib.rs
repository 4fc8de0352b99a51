//! Journey Canvas
//!
//! The interactive core of the journey builder: owns the live campaign graph,
//! the single node selection, the active channel content tab and the node
//! palette menu, and exposes every mutation the editing surface performs.
//!
//! The graph is mutated exclusively through [`CanvasState`]. Other components
//! (the audience estimator, the simulation engine) read snapshots and write
//! back only to clearly delimited derived fields.

mod error;
mod palette;
mod state;

pub use error::CanvasError;
pub use palette::{PALETTE_CLOSE_GRACE, PaletteMenu, PaletteStatus};
pub use state::{CanvasState, ConfigPatch};
