mod algebra;
mod site;

pub use algebra::{
    relative_density_index, relative_density_index_with, solve_stand_triple, StandTriple,
    StandVariable, Var,
};
pub use site::{
    dominant_height_at, site_index_at, solve_site_triple, solve_site_triple_with, SiteTriple,
    SiteVariable,
};
