mod csv_io;
mod json_io;

pub use csv_io::{read_tree_csv, read_tree_csv_from_bytes, write_trajectory_csv};
pub use json_io::{read_plots_json, write_trajectory_json};
