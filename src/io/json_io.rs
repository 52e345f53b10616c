use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::StandError;
use crate::models::{StandState, TreePlot};

/// Read tree-level plots from a JSON file.
pub fn read_plots_json(path: impl AsRef<Path>) -> Result<Vec<TreePlot>, StandError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let plots: Vec<TreePlot> = serde_json::from_reader(reader)?;
    for plot in &plots {
        for tree in &plot.trees {
            tree.validate()?;
        }
    }
    Ok(plots)
}

/// Write a simulation trajectory to a JSON file.
pub fn write_trajectory_json(
    states: &[StandState],
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), StandError> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(writer, states)?;
    } else {
        serde_json::to_writer(writer, states)?;
    }
    Ok(())
}
