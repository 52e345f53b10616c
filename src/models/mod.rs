mod coefficients;
mod params;
mod state;
mod tree;

pub use coefficients::{
    BasalAreaModel, DensityIndexModel, MerchantableCoefficients, MerchantableModel,
    MortalityModel, ParametricHeightModel, SiteCurve, SpeciesModel, VolumeCoefficients,
    VolumeModel,
};
pub use params::{HeightMethod, MerchantableLimits, SimulationParams, Thinning};
pub use state::{MerchantablePair, StandState, VolumePair};
pub use tree::{TreePlot, TreeRecord};
