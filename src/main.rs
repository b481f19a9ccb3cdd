//! CLI interface for the distance server

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use distance_server::point::parse_point_set;
use distance_server::server::{self, AppState};
use distance_server::{
    encode, ChartSpec, ChartType, DistanceType, EngineConfig, Point, RenderConfig, Style,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "distance-server")]
#[command(about = "Vector distance metrics and chart rendering", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    limits: Limits,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Limits {
    /// Largest point set accepted for batch computation or rendering
    #[arg(long, global = true)]
    max_points: Option<usize>,

    /// Image width in pixels
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Distance below which network chart nodes are connected
    #[arg(long, global = true)]
    network_threshold: Option<f64>,
}

impl Limits {
    fn configs(&self) -> (EngineConfig, RenderConfig) {
        let mut engine = EngineConfig::default();
        let mut render = RenderConfig::default();
        if let Some(max_points) = self.max_points {
            engine.max_points = max_points;
        }
        if let Some(width) = self.width {
            render.width = width;
        }
        if let Some(height) = self.height {
            render.height = height;
        }
        if let Some(threshold) = self.network_threshold {
            render.network_threshold = threshold;
        }
        (engine, render)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Distance between two points
    Distance {
        /// First point as comma-separated values (e.g., "1.0,2.0,3.0")
        a: String,
        /// Second point as comma-separated values
        b: String,
        /// Distance metric
        #[arg(short = 't', long = "type", default_value = "euclidean")]
        metric: String,
    },
    /// Distance matrix over a point set
    Batch {
        /// Points separated by ';' (e.g., "0,0;3,4;6,8")
        points: String,
        /// Distance metric
        #[arg(short = 't', long = "type", default_value = "euclidean")]
        metric: String,
    },
    /// Render a point set to a PNG file
    Render {
        /// Points separated by ';' (e.g., "1,2;3,4")
        points: String,
        #[arg(short, long, default_value = "scatter")]
        chart: String,
        #[arg(short, long, default_value = "default")]
        style: String,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Start the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "0.0.0.0:5001")]
        addr: String,
    },
}

fn run(state: AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Distance { a, b, metric } => {
            let metric: DistanceType = metric.parse()?;
            let (a, b) = (Point::from_str(&a)?, Point::from_str(&b)?);
            let distance = state.engine.compute(&a, &b, metric)?;
            println!("{} distance: {}", metric, distance);
        }
        Commands::Batch { points, metric } => {
            let metric: DistanceType = metric.parse()?;
            let points = parse_point_set(&points)?;
            let matrix = state.engine.compute_batch(&points, metric)?;
            let response = encode::encode_batch(&matrix, metric);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Render {
            points,
            chart,
            style,
            output,
        } => {
            let spec = ChartSpec::new(chart.parse::<ChartType>()?, style.parse::<Style>()?);
            let points = parse_point_set(&points)?;
            let rendered = state.renderer.render(&points, &spec)?;
            rendered
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "Rendered {} chart ({} points, {}x{}) to {}",
                spec.chart_type,
                rendered.point_count,
                rendered.width,
                rendered.height,
                output.display()
            );
        }
        Commands::Serve { .. } => {
            unreachable!("Serve handled separately");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (engine_config, render_config) = cli.limits.configs();
    let state = AppState::new(engine_config, render_config)?;

    // Serve needs the async runtime; everything else is synchronous
    if let Commands::Serve { ref addr } = cli.command {
        return server::start(addr, state).await;
    }

    run(state, cli.command)
}
