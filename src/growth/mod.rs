mod basal_area;
mod mortality;
mod volume;

pub use basal_area::{
    predict_basal_area, predict_basal_area_with, project_basal_area, project_basal_area_with,
};
pub use mortality::{project_tree_count, project_tree_count_with};
pub use volume::{
    merchantable_volume, merchantable_volume_with, total_volume, total_volume_with,
};
