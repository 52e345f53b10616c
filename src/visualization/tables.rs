use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table,
};

use crate::models::StandState;
use crate::tree::PlotSummary;

fn optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

/// Format a single stand state as a summary card.
pub fn format_stand_state(state: &StandState) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!("Stand State at Age {:.0}", state.age).bold().green()
    ));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Variable", "Value", "Unit"]);

    table.add_row(vec![
        Cell::new("Density (N)"),
        Cell::new(format!("{:.0}", state.n)),
        Cell::new("trees/ha"),
    ]);
    table.add_row(vec![
        Cell::new("Basal Area (BA)"),
        Cell::new(format!("{:.1}", state.ba)),
        Cell::new("m²/ha"),
    ]);
    table.add_row(vec![
        Cell::new("Quadratic Diameter (QD)"),
        Cell::new(format!("{:.1}", state.qd)),
        Cell::new("cm"),
    ]);
    table.add_row(vec![
        Cell::new("Dominant Height (HDOM)"),
        Cell::new(format!("{:.1}", state.hdom)),
        Cell::new("m"),
    ]);
    table.add_row(vec![
        Cell::new("Site Index (SI)"),
        Cell::new(format!("{:.1}", state.si)),
        Cell::new("m"),
    ]);
    table.add_row(vec![
        Cell::new("Relative Density (SDIR)"),
        Cell::new(format!("{:.1}", state.sdir)),
        Cell::new("%"),
    ]);
    table.add_row(vec![
        Cell::new("Volume (outside bark)"),
        Cell::new(format!("{:.1}", state.volume.outside_bark)),
        Cell::new("m³/ha"),
    ]);
    table.add_row(vec![
        Cell::new("Volume (inside bark)"),
        Cell::new(format!("{:.1}", state.volume.inside_bark)),
        Cell::new("m³/ha"),
    ]);
    table.add_row(vec![
        Cell::new("Merch. volume (outside bark)"),
        Cell::new(optional(state.merchantable.outside_bark)),
        Cell::new("m³/ha"),
    ]);
    table.add_row(vec![
        Cell::new("Merch. volume (inside bark)"),
        Cell::new(optional(state.merchantable.inside_bark)),
        Cell::new("m³/ha"),
    ]);

    output.push_str(&format!("{table}"));
    output
}

/// Print a single stand state summary card.
pub fn print_stand_state(state: &StandState) {
    print!("{}", format_stand_state(state));
}

/// Format a simulation trajectory, one row per simulated year.
pub fn format_trajectory_table(states: &[StandState]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Stand Development".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Age", "N", "BA", "QD", "HDOM", "SDIR %", "Vol OB", "Vol IB", "Merch OB", "Merch IB",
        ]);

    for state in states {
        let age = if state.thinned {
            format!("{:.0} (thinned)", state.age)
        } else {
            format!("{:.0}", state.age)
        };
        table.add_row(vec![
            Cell::new(age),
            Cell::new(format!("{:.0}", state.n)),
            Cell::new(format!("{:.1}", state.ba)),
            Cell::new(format!("{:.1}", state.qd)),
            Cell::new(format!("{:.1}", state.hdom)),
            Cell::new(format!("{:.1}", state.sdir)),
            Cell::new(format!("{:.1}", state.volume.outside_bark)),
            Cell::new(format!("{:.1}", state.volume.inside_bark)),
            Cell::new(optional(state.merchantable.outside_bark)),
            Cell::new(optional(state.merchantable.inside_bark)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the trajectory table.
pub fn print_trajectory_table(states: &[StandState]) {
    print!("{}", format_trajectory_table(states));
}

/// Format a prepared plot summary.
pub fn format_plot_summary(plot_id: u32, summary: &PlotSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n",
        format!("Plot {plot_id} Summary").bold().green()
    ));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Variable", "Value", "Unit"]);

    table.add_row(vec![
        Cell::new("Trees measured"),
        Cell::new(format!("{}", summary.trees.len())),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Density (N)"),
        Cell::new(format!("{:.0}", summary.n)),
        Cell::new("trees/ha"),
    ]);
    table.add_row(vec![
        Cell::new("Basal Area (BA)"),
        Cell::new(format!("{:.1}", summary.ba)),
        Cell::new("m²/ha"),
    ]);
    table.add_row(vec![
        Cell::new("Quadratic Diameter (QD)"),
        Cell::new(format!("{:.1}", summary.qd)),
        Cell::new("cm"),
    ]);
    table.add_row(vec![
        Cell::new("Dominant Height (HDOM)"),
        Cell::new(format!("{:.1}", summary.hdom)),
        Cell::new("m"),
    ]);
    if let Some(fit) = summary.height_fit {
        table.add_row(vec![
            Cell::new("Height fit r²"),
            Cell::new(format!("{:.3}", fit.r_squared)),
            Cell::new(""),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print a prepared plot summary.
pub fn print_plot_summary(plot_id: u32, summary: &PlotSummary) {
    print!("{}", format_plot_summary(plot_id, summary));
}
