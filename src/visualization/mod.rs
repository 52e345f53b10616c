mod tables;

pub use tables::{
    format_plot_summary, format_stand_state, format_trajectory_table, print_plot_summary,
    print_stand_state, print_trajectory_table,
};
