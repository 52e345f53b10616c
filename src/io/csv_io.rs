use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::error::StandError;
use crate::models::{StandState, TreePlot, TreeRecord};

/// CSV row structure for tree-level inventory data.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct TreeRow {
    plot_id: u32,
    tree_id: u32,
    dbh_cm: f64,
    height_m: Option<f64>,
    area_m2: f64,
    age: Option<f64>,
    observation: Option<String>,
}

fn parse_csv_records<R: Read>(
    rdr: &mut csv::Reader<R>,
) -> Result<Vec<TreePlot>, StandError> {
    let mut plots: BTreeMap<u32, TreePlot> = BTreeMap::new();

    for result in rdr.deserialize() {
        let row: TreeRow = result?;

        let tree = TreeRecord {
            id: row.tree_id,
            dbh: row.dbh_cm,
            height: row.height_m,
            observation: row.observation,
        };
        tree.validate()?;

        let plot = plots.entry(row.plot_id).or_insert_with(|| TreePlot {
            plot_id: row.plot_id,
            area_m2: row.area_m2,
            age: row.age,
            trees: Vec::new(),
        });
        plot.trees.push(tree);
    }

    Ok(plots.into_values().collect())
}

/// Read tree-level inventory data from a CSV file, grouped by plot.
pub fn read_tree_csv(path: impl AsRef<Path>) -> Result<Vec<TreePlot>, StandError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    parse_csv_records(&mut rdr)
}

/// Read tree-level inventory data from CSV bytes.
pub fn read_tree_csv_from_bytes(data: &[u8]) -> Result<Vec<TreePlot>, StandError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);
    parse_csv_records(&mut rdr)
}

/// CSV row structure for one simulated year.
#[derive(Debug, serde::Serialize)]
struct TrajectoryRow {
    age: f64,
    n: f64,
    ba: f64,
    qd: f64,
    hdom: f64,
    si: f64,
    sdir: f64,
    vol_ob: f64,
    vol_ib: f64,
    vol_merch_ob: Option<f64>,
    vol_merch_ib: Option<f64>,
    thinned: bool,
}

/// Write a simulation trajectory to a CSV file, one row per year.
pub fn write_trajectory_csv(
    states: &[StandState],
    path: impl AsRef<Path>,
) -> Result<(), StandError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for state in states {
        wtr.serialize(TrajectoryRow {
            age: state.age,
            n: state.n,
            ba: state.ba,
            qd: state.qd,
            hdom: state.hdom,
            si: state.si,
            sdir: state.sdir,
            vol_ob: state.volume.outside_bark,
            vol_ib: state.volume.inside_bark,
            vol_merch_ob: state.merchantable.outside_bark,
            vol_merch_ib: state.merchantable.inside_bark,
            thinned: state.thinned,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
