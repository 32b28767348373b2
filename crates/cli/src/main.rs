#![deny(unsafe_code)]
//! Command-line front end for the OpenCIP image engine.
//!
//! Subcommands:
//! - `render`: build a context from flags or a JSON file, write a PNG
//! - `list`: print algorithm kinds and palette names

mod error;

use clap::{ArgAction, Parser, Subcommand};
use error::CliError;
use opencip_core::{AlgorithmKind, Palette, VisualContext, VisualContextBuilder};
use opencip_engines::{RenderPath, Renderer};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "opencip", about = "Procedural image generator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render an image and write it as PNG.
    Render {
        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = 512)]
        width: usize,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = 512)]
        height: usize,

        /// JSON context file; flags below are applied on top of it.
        #[arg(long)]
        context: Option<PathBuf>,

        /// Algorithm with optional weight, e.g. `plasma` or `voronoi:0.5`.
        /// Repeatable; weights of a repeated kind add up.
        #[arg(short, long = "algo")]
        algo: Vec<String>,

        /// Palette name or comma-separated hex colors.
        #[arg(short, long)]
        palette: Option<String>,

        #[arg(long)]
        scale: Option<f64>,
        #[arg(long)]
        intensity: Option<f64>,
        #[arg(long)]
        complexity: Option<f64>,
        #[arg(long)]
        saturation: Option<f64>,
        #[arg(long)]
        iterations: Option<u32>,
        #[arg(long)]
        time: Option<f64>,

        #[arg(long)]
        chaos: bool,
        #[arg(long)]
        smooth: bool,
        #[arg(long)]
        dark: bool,
        #[arg(long)]
        retro: bool,
        #[arg(long)]
        symmetric: bool,

        /// PRNG seed for deterministic output.
        #[arg(long)]
        seed: Option<u64>,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Print the resolved context as JSON and exit without rendering.
        #[arg(long)]
        dump_context: bool,
    },
    /// List algorithm kinds and palette names.
    List,
}

/// Parses `kind` or `kind:weight`; a missing weight is 1.
fn parse_algo(spec: &str) -> Result<(AlgorithmKind, f64), CliError> {
    let (name, weight) = match spec.split_once(':') {
        Some((name, w)) => {
            let weight = w
                .trim()
                .parse::<f64>()
                .map_err(|e| CliError::Input(format!("invalid weight in --algo {spec}: {e}")))?;
            (name, weight)
        }
        None => (spec, 1.0),
    };
    Ok((name.parse::<AlgorithmKind>()?, weight))
}

fn load_builder(path: Option<&PathBuf>) -> Result<VisualContextBuilder, CliError> {
    let Some(path) = path else {
        return Ok(VisualContextBuilder::new());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid context {}: {e}", path.display())))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let algorithms: Vec<&str> = AlgorithmKind::ALL.iter().map(|k| k.name()).collect();
            let palettes = Palette::list_names();
            if cli.json {
                let info = serde_json::json!({
                    "algorithms": algorithms,
                    "palettes": palettes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Algorithms:");
                for name in &algorithms {
                    println!("  {name}");
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Render {
            width,
            height,
            context,
            algo,
            palette,
            scale,
            intensity,
            complexity,
            saturation,
            iterations,
            time,
            chaos,
            smooth,
            dark,
            retro,
            symmetric,
            seed,
            output,
            dump_context,
        } => {
            let mut builder = load_builder(context.as_ref())?;
            for spec in &algo {
                let (kind, weight) = parse_algo(spec)?;
                builder.add_algorithm(kind, weight);
            }
            if let Some(spec) = palette {
                builder = builder.palette(&Palette::parse(&spec)?);
            }
            if let Some(v) = scale {
                builder.scale = v;
            }
            if let Some(v) = intensity {
                builder.intensity = v;
            }
            if let Some(v) = complexity {
                builder.complexity = v;
            }
            if let Some(v) = saturation {
                builder.saturation = v;
            }
            if let Some(v) = iterations {
                builder.iterations = v;
            }
            if let Some(v) = time {
                builder.animation_time = v;
            }
            if let Some(v) = seed {
                builder.seed = v;
            }
            builder.chaos |= chaos;
            builder.smooth |= smooth;
            builder.dark |= dark;
            builder.retro |= retro;
            builder.symmetric |= symmetric;
            let ctx: VisualContext = builder.build();

            if dump_context {
                println!("{}", serde_json::to_string_pretty(&ctx)?);
                return Ok(());
            }

            let path = RenderPath::for_context(&ctx);
            let buf = Renderer::new(&ctx).render(width, height)?;
            opencip_engines::snapshot::write_png(&buf, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "path": path.name(),
                    "width": width,
                    "height": height,
                    "seed": ctx.seed(),
                    "algorithms": ctx.algorithms(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({width}x{height}, seed {}) -> {}",
                    path.name(),
                    ctx.seed(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
