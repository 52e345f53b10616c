mod aggregate;
mod height;
mod prepare;

pub use aggregate::{aggregate_stand, dominant_height, weighted_dominant_height};
pub use height::{impute_heights, HeightFit, HeightModelSpec, ImputedHeights};
pub use prepare::{prepare_tree_plot, PlotSummary, MIN_MEASURED_HEIGHTS};
