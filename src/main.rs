use clap::Parser;

use realmgen::ascii::{self, AsciiLayer};
use realmgen::config::{GeologicalActivity, WorldConfig, WorldSizeClass};
use realmgen::export;
use realmgen::flora;
use realmgen::rng::WorldRng;
use realmgen::worldmap::WorldMap;

#[derive(Parser, Debug)]
#[command(name = "realmgen")]
#[command(about = "Generate deterministic fantasy-world terrain maps")]
struct Args {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// World size preset: small, medium, large, huge
    #[arg(long, default_value = "medium")]
    size: String,

    /// Explicit width (overrides --size together with --height)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Explicit height (overrides --size together with --width)
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Geological activity: dormant, standard, volatile
    #[arg(short, long, default_value = "standard")]
    activity: String,

    /// Upper bound on traced rivers
    #[arg(long, default_value = "24")]
    rivers: usize,

    /// Layer to print as ASCII: biome, elevation, resources
    #[arg(short, long, default_value = "biome")]
    layer: String,

    /// Skip the ASCII printout
    #[arg(short, long)]
    quiet: bool,

    /// Number of settlement sites to list
    #[arg(long, default_value = "0")]
    sites: usize,

    /// Write settlement sites as JSON to this path
    #[arg(long)]
    sites_json: Option<String>,

    /// Export the elevation layer as PNG
    #[arg(long)]
    export_elevation: Option<String>,

    /// Export the biome layer as PNG
    #[arg(long)]
    export_biomes: Option<String>,

    /// Print flora coverage statistics
    #[arg(long)]
    flora_stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let size = match (args.width, args.height) {
        (Some(width), Some(height)) => WorldSizeClass::Custom { width, height },
        _ => WorldSizeClass::from_str(&args.size)
            .ok_or_else(|| format!("unknown size preset: {}", args.size))?,
    };
    let activity = GeologicalActivity::from_str(&args.activity)
        .ok_or_else(|| format!("unknown activity level: {}", args.activity))?;
    let layer = AsciiLayer::from_str(&args.layer)
        .ok_or_else(|| format!("unknown layer: {}", args.layer))?;

    let config = WorldConfig {
        seed: args.seed,
        size,
        activity,
        desired_rivers: args.rivers,
    };

    let mut world = WorldMap::new(config);
    world.generate();

    if !args.quiet {
        print!("{}", ascii::render(&world, layer));
        println!(
            "seed {} | {}x{} | {} | {} rivers",
            args.seed,
            world.width(),
            world.height(),
            activity,
            world.rivers().len()
        );
    }

    if args.sites > 0 || args.sites_json.is_some() {
        let count = if args.sites > 0 { args.sites } else { 10 };
        let sites = world.find_suitable_settlement_sites(count);

        if args.sites > 0 {
            for (rank, site) in sites.iter().enumerate() {
                println!(
                    "{:>3}. ({:>4}, {:>4})  score {:.2}",
                    rank + 1,
                    site.x,
                    site.y,
                    site.score
                );
            }
        }
        if let Some(path) = &args.sites_json {
            std::fs::write(path, serde_json::to_string_pretty(&sites)?)?;
            println!("wrote {} sites to {path}", sites.len());
        }
    }

    if args.flora_stats {
        let rng = WorldRng::from_seed(args.seed);
        let flora_map = flora::distribute(&world, &rng);
        let populated = flora_map.iter().filter(|(_, _, e)| e.is_some()).count();
        let total = world.width() * world.height();
        println!(
            "flora: {populated}/{total} tiles vegetated ({:.1}%)",
            populated as f64 / total as f64 * 100.0
        );
    }

    if let Some(path) = &args.export_elevation {
        export::export_elevation(&world, path)?;
        println!("wrote {path}");
    }
    if let Some(path) = &args.export_biomes {
        export::export_biomes(&world, path)?;
        println!("wrote {path}");
    }

    Ok(())
}
