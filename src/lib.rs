pub mod error;
pub mod growth;
pub mod io;
pub mod models;
pub mod simulation;
pub mod stand;
pub mod tree;
pub mod visualization;

pub use error::StandError;
pub use models::{
    HeightMethod, MerchantableLimits, SimulationParams, SpeciesModel, StandState, Thinning,
    TreePlot, TreeRecord,
};
pub use simulation::{normalize_initial_state, simulate, InitialInventory};
