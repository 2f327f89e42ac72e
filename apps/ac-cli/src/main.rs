use ac_app::{
    AppResult, ExportTable, RunOptions, RunProgressEvent, RunRequest, export_table,
    project_service, run_service,
};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ac-cli")]
#[command(about = "accompare CLI - Atmospheric chemistry model intercomparison", long_about = None)]
struct Cli {
    /// Log wall-clock timing of computation sections (debug level)
    #[arg(long, global = true)]
    timing: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// List comparisons defined in a project
    Comparisons {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// Import a `coord,value` CSV file as a simulation series
    Import {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// Simulation the series belongs to
        simulation_id: String,
        /// Variable name (e.g., O3, NO2, CO)
        variable: String,
        /// CSV file to import
        csv_path: PathBuf,
        /// Unit of the values (e.g., ppbv)
        #[arg(long)]
        unit: String,
    },
    /// List imported series
    Series {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
    },
    /// Run a comparison
    Run {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// Comparison ID to run
        comparison_id: String,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stored reports for a project
    Reports {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// Only list reports of this comparison
        comparison_id: Option<String>,
    },
    /// Export one table of a stored report
    Export {
        /// Path to the project file (YAML or JSON)
        project_path: PathBuf,
        /// Report ID
        report_id: String,
        /// Table to export (summaries, histograms, trends, pairwise, differences, taylor, agreement)
        #[arg(long, default_value = "summaries")]
        table: ExportTable,
        /// Field delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.timing {
        ac_core::timing::enable_timing();
    }

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Comparisons { project_path } => cmd_comparisons(&project_path),
        Commands::Import {
            project_path,
            simulation_id,
            variable,
            csv_path,
            unit,
        } => cmd_import(&project_path, &simulation_id, &variable, &csv_path, &unit),
        Commands::Series { project_path } => cmd_series(&project_path),
        Commands::Run {
            project_path,
            comparison_id,
            no_cache,
            json,
        } => cmd_run(&project_path, &comparison_id, !no_cache, json).await,
        Commands::Reports {
            project_path,
            comparison_id,
        } => cmd_reports(&project_path, comparison_id.as_deref()),
        Commands::Export {
            project_path,
            report_id,
            table,
            delimiter,
            output,
        } => cmd_export(&project_path, &report_id, table, delimiter, output.as_deref()),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_comparisons(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let comparisons = project_service::list_comparisons(&project);

    if comparisons.is_empty() {
        println!("No comparisons found in project");
    } else {
        println!("Comparisons in project:");
        for c in comparisons {
            let reference = c.reference.as_deref().unwrap_or("none");
            println!(
                "  {} - {} (reference: {}, {} participants)",
                c.id, c.variable, reference, c.participant_count
            );
        }
    }
    Ok(())
}

fn cmd_import(
    project_path: &Path,
    simulation_id: &str,
    variable: &str,
    csv_path: &Path,
    unit: &str,
) -> AppResult<()> {
    let csv = std::fs::read_to_string(csv_path)?;
    let count =
        project_service::import_series_csv(project_path, simulation_id, variable, unit, &csv)?;
    println!(
        "✓ Imported {} samples of {} for {} ({})",
        count, variable, simulation_id, unit
    );
    Ok(())
}

fn cmd_series(project_path: &Path) -> AppResult<()> {
    let series = project_service::list_series(project_path)?;

    if series.is_empty() {
        println!("No series imported yet");
    } else {
        println!("Imported series:");
        for (simulation_id, variable) in series {
            println!("  {} / {}", simulation_id, variable);
        }
    }
    Ok(())
}

async fn cmd_run(
    project_path: &Path,
    comparison_id: &str,
    use_cache: bool,
    json: bool,
) -> AppResult<()> {
    if !json {
        println!("Running comparison: {}", comparison_id);
    }

    let request = RunRequest {
        project_path,
        comparison_id,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let mut on_progress = |event: RunProgressEvent| {
        if json {
            return;
        }
        let emit_now = last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
        if emit_now {
            render_cli_progress(&event);
            last_stage = Some(event.stage);
            last_emit = Instant::now();
        }
    };
    let response =
        run_service::ensure_report_with_progress(&request, Some(&mut on_progress)).await?;
    tracing::info!(
        comparison = comparison_id,
        report_id = %response.report_id,
        cached = response.loaded_from_cache,
        elapsed_s = response.elapsed_s,
        "comparison run finished"
    );

    if json {
        let text = serde_json::to_string_pretty(&response.report).map_err(io::Error::from)?;
        println!("{}", text);
        return Ok(());
    }
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.report_id);
    } else {
        println!("✓ Comparison completed: {}", response.report_id);
    }
    println!("  Elapsed: {:.3}s", response.elapsed_s);

    let report = &response.report;
    println!("  Variable: {} [{}]", report.variable, report.unit);
    for sim in &report.simulations {
        let marker = if report.reference.as_ref() == Some(&sim.simulation_id) {
            " (reference)"
        } else {
            ""
        };
        println!(
            "  {}{}: n={} mean={} std={}",
            sim.simulation_id,
            marker,
            sim.summary.count,
            fmt_value(sim.summary.mean),
            fmt_value(sim.summary.std_dev)
        );
        if let Some(m) = report.pairwise_for(&sim.simulation_id)
            && report.reference.as_ref() != Some(&sim.simulation_id)
        {
            let r = if m.correlation_defined {
                format!("{:.4}", m.correlation)
            } else {
                ac_app::export::NOT_AVAILABLE.to_string()
            };
            println!(
                "      r={} rmse={} mbe={} pairs={}",
                r,
                fmt_value(m.rmse),
                fmt_value(m.mbe),
                m.valid_pairs
            );
        }
    }

    Ok(())
}

fn fmt_value(v: f64) -> String {
    if ac_core::is_missing(v) {
        ac_app::export::NOT_AVAILABLE.to_string()
    } else {
        format!("{:.4}", v)
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
    let mut line = format!(
        "\r{} {}  elapsed={:.2}s",
        spinner[spin_idx],
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}

fn cmd_reports(project_path: &Path, comparison_id: Option<&str>) -> AppResult<()> {
    let reports = run_service::list_reports(project_path, comparison_id)?;

    if reports.is_empty() {
        match comparison_id {
            Some(id) => println!("No stored reports found for comparison: {}", id),
            None => println!("No stored reports found"),
        }
    } else {
        println!("Stored reports:");
        for manifest in reports {
            println!(
                "  {} - {} {} [{}] ({})",
                manifest.report_id,
                manifest.comparison_id,
                manifest.variable,
                manifest.participants.join(", "),
                manifest.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_export(
    project_path: &Path,
    report_id: &str,
    table: ExportTable,
    delimiter: char,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, report) = run_service::load_report(project_path, report_id)?;
    let text = export_table(&report, table, delimiter);

    if let Some(path) = output {
        std::fs::write(path, &text)?;
        let rows = text.lines().count().saturating_sub(1);
        println!("✓ Exported {} {} rows to {}", rows, table, path.display());
    } else {
        print!("{}", text);
    }

    Ok(())
}
