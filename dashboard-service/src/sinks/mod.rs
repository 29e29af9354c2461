pub mod display;

pub use display::{DisplaySlot, PanelState};
