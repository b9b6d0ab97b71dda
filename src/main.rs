//! Planetgen CLI - procedural planet synthesis.
//!
//! Generates systems of noise-displaced cube-sphere planets with biome colors
//! and cloud shells, saves their parameters as JSON and exports meshes and maps.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use planetgen::export::{export_body_obj, export_body_png, ObjExportOptions, PngExportOptions};
use planetgen::geometry::CubeProjection;
use planetgen::noise::NoiseBasis;
use planetgen::planet::SynthesisConfig;
use planetgen::system::{GalaxyConfig, InstanceManager, NullHost};

/// Procedural planet generator.
#[derive(Parser)]
#[command(name = "planetgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with `synthesis` and `system` sections.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new randomized system.
    Generate {
        /// Number of planets.
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Master seed for reproducible systems.
        #[arg(short, long)]
        seed: Option<u64>,

        #[command(flatten)]
        synthesis: SynthesisArgs,

        /// Output directory for planet files and exports.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Save each planet as planet_{i}.json.
        #[arg(long)]
        save: bool,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Load a saved system and export it.
    Load {
        /// Directory containing planet_{i}.json files.
        #[arg(short, long, default_value = "./output")]
        dir: PathBuf,

        /// Number of slots to load. Missing slots are randomized.
        #[arg(short = 'n', long)]
        count: Option<usize>,

        #[command(flatten)]
        synthesis: SynthesisArgs,

        /// Output directory for exports (defaults to the load directory).
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Display mesh budget for a tessellation setting.
    Info {
        /// Terrain grid side length per face.
        #[arg(short, long, default_value = "40")]
        resolution: u32,

        /// Cloud grid side length per face.
        #[arg(long, default_value = "60")]
        cloud_resolution: u32,
    },
}

#[derive(clap::Args)]
struct SynthesisArgs {
    /// Terrain grid side length per face (2-256).
    #[arg(short, long)]
    resolution: Option<u32>,

    /// Cloud grid side length per face (2-256).
    #[arg(long)]
    cloud_resolution: Option<u32>,

    /// Noise basis.
    #[arg(long)]
    basis: Option<BasisArg>,

    /// Use analytic spherification instead of normalization.
    #[arg(long)]
    spherify: bool,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Export terrain and cloud meshes as OBJ.
    #[arg(long)]
    obj: bool,

    /// Export per-face height, color and cloud PNGs.
    #[arg(long)]
    png: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum BasisArg {
    /// Averaged 2D Perlin planes.
    Projected,
    /// 3D simplex.
    Simplex,
}

impl From<BasisArg> for NoiseBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::Projected => NoiseBasis::Projected,
            BasisArg::Simplex => NoiseBasis::Simplex,
        }
    }
}

impl SynthesisArgs {
    fn apply(&self, config: &mut SynthesisConfig) {
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(resolution) = self.cloud_resolution {
            config.cloud_resolution = resolution;
        }
        if let Some(basis) = self.basis {
            config.basis = basis.into();
        }
        if self.spherify {
            config.projection = CubeProjection::Spherified;
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => match GalaxyConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => GalaxyConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            count,
            seed,
            synthesis,
            output,
            save,
            export,
        } => {
            synthesis.apply(&mut config.synthesis);
            if let Some(count) = count {
                config.system.planet_count = count;
            }
            if seed.is_some() {
                config.system.master_seed = seed;
            }
            config.system.save_dir = output.clone();
            run_generate(config, &output, save, &export);
        }
        Commands::Load {
            dir,
            count,
            synthesis,
            output,
            export,
        } => {
            synthesis.apply(&mut config.synthesis);
            if let Some(count) = count {
                config.system.planet_count = count;
            }
            config.system.save_dir = dir.clone();
            let output = output.unwrap_or(dir);
            run_load(config, &output, &export);
        }
        Commands::Info {
            resolution,
            cloud_resolution,
        } => {
            config.synthesis.resolution = resolution;
            config.synthesis.cloud_resolution = cloud_resolution;
            run_info(&config.synthesis);
        }
    }
}

fn print_header(config: &GalaxyConfig) {
    let synthesis = config.synthesis.sanitized();
    println!("Planetgen - Procedural Planet Synthesis");
    println!("=======================================");
    println!("Planets: {}", config.system.planet_count);
    println!(
        "Resolution: {}x{} terrain, {}x{} clouds per face",
        synthesis.resolution, synthesis.resolution, synthesis.cloud_resolution, synthesis.cloud_resolution
    );
    println!("Noise basis: {:?}, projection: {:?}", synthesis.basis, synthesis.projection);
    match config.system.master_seed {
        Some(seed) => println!("Master seed: {}", seed),
        None => println!("Master seed: random"),
    }
}

fn run_generate(config: GalaxyConfig, output: &Path, save: bool, export: &ExportArgs) {
    print_header(&config);

    let start = Instant::now();
    let mut manager = InstanceManager::new(config, NullHost::default());
    manager.generate();
    println!("Generated {} planets in {:.2?}", manager.len(), start.elapsed());
    print_summary(&manager);

    if save {
        match manager.save_all() {
            Ok(paths) => println!("  Saved {} planet files to {}", paths.len(), output.display()),
            Err(e) => {
                eprintln!("Error saving planets: {}", e);
                std::process::exit(1);
            }
        }
    }

    run_exports(&manager, output, export);
}

fn run_load(config: GalaxyConfig, output: &Path, export: &ExportArgs) {
    print_header(&config);
    let dir = config.system.save_dir.clone();

    let start = Instant::now();
    let mut manager = InstanceManager::new(config, NullHost::default());
    let loaded = manager.initialize();
    println!(
        "Loaded {} of {} planets from {} in {:.2?}",
        loaded,
        manager.len(),
        dir.display(),
        start.elapsed()
    );
    print_summary(&manager);

    run_exports(&manager, output, export);
}

fn print_summary(manager: &InstanceManager<NullHost>) {
    for (i, body) in manager.bodies().iter().enumerate() {
        let (lo, hi) = body.geometry.elevation_range;
        println!(
            "  [{}] {:<12} seed {:>5}  elevation [{:.4}, {:.4}]  ocean {:>5.1}%  clouds {:>5.1}%",
            i,
            body.name(),
            body.params.seed,
            lo,
            hi,
            body.geometry.ocean_fraction() * 100.0,
            body.geometry.clouds.coverage() * 100.0
        );
    }
}

fn run_exports(manager: &InstanceManager<NullHost>, output: &Path, export: &ExportArgs) {
    if !export.obj && !export.png {
        return;
    }

    println!("\nExporting...");
    let export_start = Instant::now();
    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    }

    for (i, body) in manager.bodies().iter().enumerate() {
        let base = format!("planet_{}", i);

        if export.obj {
            let options = ObjExportOptions {
                scale: body.transform.scale,
                ..Default::default()
            };
            if let Err(e) = export_body_obj(&body.geometry, output, &base, &options) {
                eprintln!("Error exporting OBJ: {}", e);
                std::process::exit(1);
            }
            println!("  Exported {}.obj and {}_clouds.obj", base, base);
        }

        if export.png {
            let options = PngExportOptions::auto_range(&body.geometry);
            match export_body_png(&body.geometry, output, &base, &options) {
                Ok(paths) => println!("  Exported {} PNG files: {}_*.png", paths.len(), base),
                Err(e) => {
                    eprintln!("Error exporting PNG: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nOutput: {}", output.display());
}

fn run_info(config: &SynthesisConfig) {
    let config = config.sanitized();
    let budget = config.mesh_budget();
    let mb = |bytes: usize| bytes as f64 / 1024.0 / 1024.0;

    println!("Planetgen - Mesh Budget");
    println!("=======================");
    println!();
    println!("Terrain: {}x{} per face", config.resolution, config.resolution);
    println!("Clouds:  {}x{} per face", config.cloud_resolution, config.cloud_resolution);
    println!();
    println!("Per planet:");
    println!("  Terrain vertices:  {:>10}", budget.terrain_vertices);
    println!("  Terrain triangles: {:>10}", budget.terrain_triangles);
    println!("  Cloud vertices:    {:>10}", budget.cloud_vertices);
    println!("  Cloud triangles:   {:>10}", budget.cloud_triangles);
    println!();
    println!(
        "Vertex + index buffers: {:>10} bytes ({:.2} MB)",
        budget.buffer_bytes(),
        mb(budget.buffer_bytes())
    );
    println!("Renderables: 12 (6 terrain faces, 6 cloud faces)");
}
