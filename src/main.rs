// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use polyroute::{osm, Config, Event, Network, Point, Route, Router};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct NetworkLoadError(PathBuf, #[source] osm::Error);

#[derive(Debug, thiserror::Error)]
enum SearchError {
    #[error("search exceeded {0} expansions (use --keep-going to continue past the limit)")]
    Overflow(usize),

    #[error("no route between {0:?} and {1:?}")]
    NotFound(Point, Point),

    #[error("search stopped without finishing")]
    Stalled,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileName {
    Car,
    Bicycle,
    Foot,
}

impl ProfileName {
    fn profile(self) -> &'static osm::Profile<'static> {
        match self {
            Self::Car => &osm::CAR_PROFILE,
            Self::Bicycle => &osm::BICYCLE_PROFILE,
            Self::Foot => &osm::FOOT_PROFILE,
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// The path to the OSM file
    osm_file: PathBuf,

    /// Longitude of the start point
    start_x: f64,

    /// Latitude of the start point
    start_y: f64,

    /// Longitude of the end point
    end_x: f64,

    /// Latitude of the end point
    end_y: f64,

    /// Which ways are routable, and how preferred they are
    #[arg(long, value_enum, default_value_t = ProfileName::Car)]
    profile: ProfileName,

    /// Node expansions allowed before the search pauses
    #[arg(long, default_value_t = polyroute::DEFAULT_MAX_ITERATION)]
    max_iteration: usize,

    /// Node expansions performed between progress reports
    #[arg(long, default_value_t = polyroute::DEFAULT_STEP_ITERATION)]
    step_iteration: usize,

    /// Tolerance for considering two positions to be the same node
    #[arg(long, default_value_t = polyroute::DEFAULT_EPSILON)]
    epsilon: f64,

    /// Resume the search whenever it exceeds --max-iteration
    #[arg(long)]
    keep_going: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();
    let profile = cli.profile.profile();

    let n = load_network(&cli.osm_file, profile)?;
    log::info!("loaded {} edges from {}", n.len(), cli.osm_file.display());

    let config = Config {
        max_iteration: cli.max_iteration,
        step_iteration: cli.step_iteration,
        epsilon: cli.epsilon,
    };
    let mut router = Router::with_config(&n, profile, config);
    let (start, end) = router.path(
        Point::new(cli.start_x, cli.start_y),
        Point::new(cli.end_x, cli.end_y),
    )?;

    let route = drive(&mut router, cli.keep_going)?;
    if !route.is_found() {
        return Err(SearchError::NotFound(start, end).into());
    }

    print_route(&route);
    Ok(())
}

fn load_network<P: AsRef<Path>>(
    path: P,
    profile: &osm::Profile<'_>,
) -> Result<Network, NetworkLoadError> {
    let mut n = Network::default();
    let options = osm::Options {
        profile,
        file_format: osm::FileFormat::Unknown,
        bbox: [0.0; 4],
    };
    match osm::add_features_from_file(&mut n, &options, path.as_ref()) {
        Ok(()) => Ok(n),
        Err(e) => Err(NetworkLoadError(PathBuf::from(path.as_ref()), e)),
    }
}

fn drive<'a>(
    router: &mut Router<'a, Network, &osm::Profile<'_>>,
    keep_going: bool,
) -> Result<Route<'a>, SearchError> {
    loop {
        match router.tick() {
            Some(Event::Start { start, end }) => {
                log::info!("searching from {:?} to {:?}", start, end);
            }

            Some(Event::Calculating { expanded }) => {
                log::info!(
                    "expanded {} nodes, best way so far has {} edges",
                    expanded,
                    router.best_way().len()
                );
            }

            Some(Event::Pause { overflow: true }) if keep_going => {
                log::warn!("search exceeded the expansion limit, resuming");
                if !router.resume() {
                    return Err(SearchError::Stalled);
                }
            }

            Some(Event::Pause { .. }) => {
                return Err(SearchError::Overflow(router.config().max_iteration));
            }

            Some(Event::Finish(route)) => return Ok(route),

            None => return Err(SearchError::Stalled),
        }
    }
}

fn print_route(route: &Route<'_>) {
    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"distance\": {},", route.distance);
    println!("  \"weighted_distance\": {},", route.weighted_distance);
    println!("  \"features\": [");

    let mut edges = route.edges.iter().peekable();
    while let Some(edge) = edges.next() {
        println!("    {{");
        println!("      \"type\": \"Feature\",");
        println!("      \"properties\": {{\"id\": {}}},", edge.id);
        println!("      \"geometry\": {{");
        println!("        \"type\": \"LineString\",");
        println!("        \"coordinates\": [");

        let mut points = edge.geometry.iter().peekable();
        while let Some(p) = points.next() {
            let suffix = if points.peek().is_some() { "," } else { "" };
            println!("          [{}, {}]{}", p.x, p.y, suffix);
        }

        println!("        ]");
        println!("      }}");
        let suffix = if edges.peek().is_some() { "," } else { "" };
        println!("    }}{}", suffix);
    }

    println!("  ]");
    println!("}}");
}
