use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use pine_stand_simulator::{
    io,
    models::{HeightMethod, MerchantableLimits, SimulationParams, Thinning},
    simulation::{normalize_initial_state, simulate, InitialInventory},
    stand::{solve_site_triple, solve_stand_triple, Var},
    tree::prepare_tree_plot,
    visualization::{print_plot_summary, print_trajectory_table},
};

#[derive(Parser)]
#[command(
    name = "pine-sim",
    about = "Pine Stand Simulator - growth and yield projection for even-aged plantations",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate stand development from tree-level or stand-level input
    Simulate {
        /// Path to tree-level inventory file (CSV or JSON); omit for stand-level flags
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Plot id to simulate when the input file holds several plots
        #[arg(long)]
        plot: Option<u32>,

        /// Initial tree density (trees/ha), stand-level mode
        #[arg(short, long)]
        n: Option<f64>,

        /// Initial basal area (m²/ha); predicted from N and HDOM if omitted
        #[arg(short, long)]
        ba: Option<f64>,

        /// Initial dominant height (m)
        #[arg(long)]
        hdom: Option<f64>,

        /// Site index at age 50 (m)
        #[arg(short, long)]
        si: Option<f64>,

        /// Initial stand age (years)
        #[arg(short, long)]
        age: Option<f64>,

        /// Final stand age, inclusive (years)
        #[arg(short, long, default_value = "30.0")]
        final_age: f64,

        /// Age of the thinning event (years); omit to disable thinning
        #[arg(long)]
        thin_age: Option<f64>,

        /// Fraction of basal area removed by the thinning, 0-1
        #[arg(long, default_value = "0.3")]
        thin_fraction: f64,

        /// Minimum merchantable DBH (cm)
        #[arg(long, default_value = "10.0")]
        min_dbh: f64,

        /// Small-end top diameter limit (cm)
        #[arg(long, default_value = "8.0")]
        top_diameter: f64,

        /// Height imputation method: parametric or regression
        #[arg(short, long, default_value = "regression")]
        method: String,

        /// Write the trajectory to this file (.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Prepare tree-level plots: validate, impute heights, summarize
    Prepare {
        /// Path to tree-level inventory file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Height imputation method: parametric or regression
        #[arg(short, long, default_value = "regression")]
        method: String,
    },

    /// Complete the missing one of a linked variable triple
    #[command(subcommand)]
    Solve(SolveCommands),
}

#[derive(Subcommand)]
enum SolveCommands {
    /// Complete {BA, N, QD}: give exactly two
    Stand {
        /// Basal area (m²/ha)
        #[arg(long)]
        ba: Option<f64>,

        /// Tree density (trees/ha)
        #[arg(long)]
        n: Option<f64>,

        /// Quadratic mean diameter (cm)
        #[arg(long)]
        qd: Option<f64>,
    },

    /// Complete {HDOM, SI, AGE}: give exactly two
    Site {
        /// Dominant height (m)
        #[arg(long)]
        hdom: Option<f64>,

        /// Site index at age 50 (m)
        #[arg(long)]
        si: Option<f64>,

        /// Stand age (years)
        #[arg(long)]
        age: Option<f64>,
    },
}

fn load_plots(path: &PathBuf) -> Result<Vec<pine_stand_simulator::TreePlot>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => Ok(io::read_tree_csv(path)?),
        "json" => Ok(io::read_plots_json(path)?),
        _ => anyhow::bail!("Unsupported file format: .{ext}. Use .csv or .json"),
    }
}

fn write_trajectory(
    states: &[pine_stand_simulator::StandState],
    path: &PathBuf,
    pretty: bool,
) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => io::write_trajectory_csv(states, path)?,
        "json" => io::write_trajectory_json(states, path, pretty)?,
        _ => anyhow::bail!("Unsupported output format: .{ext}. Use .csv or .json"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_simulate(
    input: Option<PathBuf>,
    plot: Option<u32>,
    n: Option<f64>,
    ba: Option<f64>,
    hdom: Option<f64>,
    si: Option<f64>,
    age: Option<f64>,
    params: SimulationParams,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    let inventory = match input {
        Some(path) => {
            let plots = load_plots(&path)?;
            let selected = match plot {
                Some(id) => plots
                    .into_iter()
                    .find(|p| p.plot_id == id)
                    .ok_or_else(|| anyhow::anyhow!("plot {id} not found in input"))?,
                None => plots
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("input file holds no plots"))?,
            };
            println!(
                "  Loaded plot {} with {} trees",
                selected.plot_id,
                selected.trees.len()
            );
            InitialInventory::TreeLevel {
                ids: selected.trees.iter().map(|t| t.id).collect(),
                dbh: selected.trees.iter().map(|t| t.dbh).collect(),
                heights: selected.trees.iter().map(|t| t.height).collect(),
                area_m2: selected.area_m2,
                age: age.or(selected.age),
                si,
            }
        }
        None => {
            let n = n.ok_or_else(|| {
                anyhow::anyhow!("stand-level simulation needs --n (trees/ha)")
            })?;
            InitialInventory::StandLevel {
                n,
                ba,
                hdom,
                si,
                age,
            }
        }
    };

    let initial = normalize_initial_state(&inventory, &params)?;
    println!(
        "\n{}",
        format!(
            "Simulation: age {:.0} to {:.0} (SI {:.1} m)",
            initial.age, params.final_age, initial.si
        )
        .bold()
        .cyan()
    );

    let trajectory = simulate(&initial, &params)?;
    print_trajectory_table(&trajectory);

    if let Some(path) = output {
        write_trajectory(&trajectory, &path, pretty)?;
        println!(
            "\n{} Trajectory written to {}",
            "Success:".green().bold(),
            path.display()
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            input,
            plot,
            n,
            ba,
            hdom,
            si,
            age,
            final_age,
            thin_age,
            thin_fraction,
            min_dbh,
            top_diameter,
            method,
            output,
            pretty,
        } => {
            let thinning = thin_age
                .map(|age| Thinning::new(age, thin_fraction))
                .transpose()?;
            let params = SimulationParams {
                final_age,
                thinning,
                merchantable: MerchantableLimits {
                    min_dbh_cm: min_dbh,
                    top_diameter_cm: top_diameter,
                },
                height_method: method.parse::<HeightMethod>()?,
            };
            run_simulate(input, plot, n, ba, hdom, si, age, params, output, pretty)?;
        }

        Commands::Prepare { input, method } => {
            let method = method.parse::<HeightMethod>()?;
            let plots = load_plots(&input)?;
            println!(
                "\n{}",
                format!("Plot Preparation: {}", input.display()).bold().cyan()
            );

            for plot in &plots {
                let ids: Vec<u32> = plot.trees.iter().map(|t| t.id).collect();
                let dbh: Vec<f64> = plot.trees.iter().map(|t| t.dbh).collect();
                let heights: Vec<Option<f64>> = plot.trees.iter().map(|t| t.height).collect();
                match prepare_tree_plot(&ids, &dbh, &heights, plot.area_m2, plot.age, method) {
                    Ok(summary) => print_plot_summary(plot.plot_id, &summary),
                    Err(e) => eprintln!("{}: plot {}: {e}", "Warning".yellow(), plot.plot_id),
                }
            }
        }

        Commands::Solve(SolveCommands::Stand { ba, n, qd }) => {
            let triple = solve_stand_triple(Var::from(ba), Var::from(n), Var::from(qd))?;
            println!("\n{}", "Stand Triple".bold().cyan());
            println!("  BA: {:.4} m²/ha", triple.ba);
            println!("  N:  {:.1} trees/ha", triple.n);
            println!("  QD: {:.2} cm", triple.qd);
        }

        Commands::Solve(SolveCommands::Site { hdom, si, age }) => {
            let triple = solve_site_triple(Var::from(hdom), Var::from(si), Var::from(age))?;
            println!("\n{}", "Site Triple".bold().cyan());
            println!("  HDOM: {:.2} m", triple.hdom);
            println!("  SI:   {:.2} m", triple.si);
            println!("  AGE:  {:.2} years", triple.age);
        }
    }

    Ok(())
}
