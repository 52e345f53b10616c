mod engine;
mod input;

pub use engine::simulate;
pub use input::{normalize_initial_state, InitialInventory};
