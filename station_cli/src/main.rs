use clap::{Parser, Subcommand, ValueEnum};
use rand::Rng;
use station_core::export::{self, ExportFormat};
use station_core::history::read_history;
use station_core::source::load_catalog;
use station_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stalot")]
#[command(about = "Railway station lottery", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the station CSV
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Seed the random draw (same seed, same station)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the trip to the configured start station
    Init,

    /// Draw the next station ahead within the distance band
    #[command(visible_alias = "r")]
    Random {
        /// Show the draw without recording it
        #[arg(long)]
        dry_run: bool,
    },

    /// Go to a station by name (the station suffix is added for you)
    Add {
        name: String,
    },

    /// Export the visited stations for a map viewer
    #[command(visible_alias = "export")]
    Map {
        #[arg(long, value_enum, default_value_t = Format::Geojson)]
        format: Format,

        /// Output file (defaults to history.<ext> in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the visit history
    History,

    /// List distance-eligible stations ahead of the current one
    Candidates,

    /// Interactive prompt (default)
    Shell,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Geojson,
    Csv,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Geojson => ExportFormat::GeoJson,
            Format::Csv => ExportFormat::Csv,
        }
    }
}

/// Everything a command needs, resolved once at startup
struct App {
    config: Config,
    data_dir: PathBuf,
    catalog_path: PathBuf,
}

impl App {
    fn position_path(&self) -> PathBuf {
        self.data_dir.join("data.txt")
    }

    fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.txt")
    }

    fn load_catalog(&self) -> Result<StationCatalog> {
        load_catalog(&self.catalog_path, &self.config.catalog)
    }

    fn open_session<'a>(
        &self,
        catalog: &'a StationCatalog,
    ) -> Result<Session<'a, FilePositionStore, TextHistoryLog>> {
        Session::open(
            catalog,
            &self.config,
            FilePositionStore::new(self.position_path()),
            TextHistoryLog::new(self.history_path()),
        )
    }

    /// A reset must work even when the stored position is unusable
    fn open_session_for_reset<'a>(
        &self,
        catalog: &'a StationCatalog,
    ) -> Result<Session<'a, FilePositionStore, TextHistoryLog>> {
        match self.open_session(catalog) {
            Err(Error::State(reason)) => {
                tracing::warn!("Discarding unreadable position: {}", reason);
                std::fs::remove_file(self.position_path())?;
                self.open_session(catalog)
            }
            Err(Error::UnknownStation { index, .. })
                if index != self.config.route.start_index =>
            {
                tracing::warn!("Discarding stored position {} outside the catalog", index);
                std::fs::remove_file(self.position_path())?;
                self.open_session(catalog)
            }
            other => other,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    station_core::logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog.resolve_path(&data_dir));

    let app = App {
        config,
        data_dir,
        catalog_path,
    };
    let mut rng = seeded_rng(cli.seed);

    match cli.command {
        Some(Commands::Init) => cmd_init(&app),
        Some(Commands::Random { dry_run }) => cmd_random(&app, &mut rng, dry_run),
        Some(Commands::Add { name }) => cmd_add(&app, &name),
        Some(Commands::Map { format, output }) => cmd_map(&app, format.into(), output),
        Some(Commands::History) => cmd_history(&app),
        Some(Commands::Candidates) => cmd_candidates(&app),
        Some(Commands::Shell) | None => cmd_shell(&app, &mut rng, io::stdin().lock()),
    }
}

fn cmd_init(app: &App) -> Result<()> {
    let catalog = app.load_catalog()?;
    let _lock = DataDirLock::acquire(&app.data_dir)?;
    let mut session = app.open_session_for_reset(&catalog)?;

    session.reset()?;

    let origin = catalog.get(session.trip().current())?;
    println!("Initializing... Done!");
    println!("  Starting at {} (station {})", origin.name, origin.index);
    Ok(())
}

fn cmd_random<R: Rng>(app: &App, rng: &mut R, dry_run: bool) -> Result<()> {
    let catalog = app.load_catalog()?;
    let _lock = DataDirLock::acquire(&app.data_dir)?;
    let mut session = app.open_session(&catalog)?;
    let from = catalog.get(session.trip().current())?.name.clone();

    if dry_run {
        let current = session.trip().current();
        let limit = session.selection().proximity_limit;
        match choose_next(&session.candidates()?, current, rng, limit) {
            Some(candidate) => {
                let station = catalog.get(candidate.station_index)?;
                println!(
                    "Would choose: {} within {} km of {}",
                    station.name, candidate.distance_km, from
                );
                println!("\n[Dry run - not recording visit]");
            }
            None => println!("No stations found within the specified distance."),
        }
        return Ok(());
    }

    match session.draw(rng)? {
        Some(draw) => {
            println!(
                "Chosen station: {} within {} km of {}",
                draw.record.name, draw.candidate.distance_km, from
            );
            println!(
                "Station ID: {}, Name: {}",
                draw.record.station_index, draw.record.name
            );
        }
        None => {
            println!("No stations found within the specified distance.");
            println!("No new station chosen within the specified distance.");
        }
    }
    Ok(())
}

fn cmd_add(app: &App, name: &str) -> Result<()> {
    let catalog = app.load_catalog()?;
    let _lock = DataDirLock::acquire(&app.data_dir)?;
    let mut session = app.open_session(&catalog)?;

    let record = session.add(&display_name(name, &app.config.catalog.station_suffix))?;
    println!("{} {} added.", record.station_index, record.name);
    Ok(())
}

fn cmd_map(app: &App, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let visited = read_history(&app.history_path())?;
    let path = output.unwrap_or_else(|| {
        app.data_dir
            .join("history")
            .with_extension(format.extension())
    });

    export::export(&path, &visited, format)?;
    println!("Saving map... Done!");
    println!("  {} visits written to {}", visited.len(), path.display());
    Ok(())
}

fn cmd_history(app: &App) -> Result<()> {
    let visited = read_history(&app.history_path())?;
    if visited.is_empty() {
        println!("No visits yet.");
        return Ok(());
    }

    for (order, record) in visited.iter().enumerate() {
        println!(
            "{:>3}. {} (station {}) {}, {}",
            order + 1,
            record.name,
            record.station_index,
            record.latitude,
            record.longitude
        );
    }
    Ok(())
}

fn cmd_candidates(app: &App) -> Result<()> {
    let catalog = app.load_catalog()?;
    let session = app.open_session(&catalog)?;
    let current = session.trip().current();
    let limit = session.selection().proximity_limit;
    let candidates = session.candidates()?;

    println!(
        "From {} (station {}), {} candidates:",
        catalog.get(current)?.name,
        current,
        candidates.len()
    );
    for candidate in candidates {
        let station = catalog.get(candidate.station_index)?;
        let marker = if candidate.station_index.abs_diff(current) <= limit {
            ""
        } else {
            " (beyond proximity limit)"
        };
        println!(
            "  {:>4} {} {} km{}",
            station.index, station.name, candidate.distance_km, marker
        );
    }
    Ok(())
}

const SHELL_PROMPT: &str = "What do you want to do? (init/random/add/map/exit) ";

fn cmd_shell<R: Rng, I: BufRead>(app: &App, rng: &mut R, mut input: I) -> Result<()> {
    loop {
        let Some(line) = prompt(&mut input, SHELL_PROMPT)? else {
            break;
        };

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("");
        let rest = words.collect::<Vec<_>>().join(" ");

        let outcome = match command {
            "init" => cmd_init(app),
            "random" | "r" => cmd_random(app, rng, false),
            "add" => {
                let name = if rest.is_empty() {
                    prompt(&mut input, "Where do you want to go? ")?.unwrap_or_default()
                } else {
                    rest
                };
                cmd_add(app, &name)
            }
            "map" => cmd_map(app, ExportFormat::GeoJson, None),
            "history" => cmd_history(app),
            "exit" => break,
            _ => {
                println!("Invalid input. Please try again. (init/random/add/map/exit)");
                Ok(())
            }
        };

        match outcome {
            Err(e) if e.is_recoverable() => println!("{}", e),
            other => other?,
        }
    }

    println!("Thank you, have a nice trip.");
    Ok(())
}

/// Print `message` and read one trimmed line; `None` at end of input
fn prompt<I: BufRead>(input: &mut I, message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
