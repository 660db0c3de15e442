use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use gridconvert::{DatumConversion, Error, GridCoordinate, ParseCoord};

/// Convert Ordnance Survey National Grid coordinates to WGS84 latitude/longitude
#[derive(Parser)]
#[command(name = "gridconvert")]
#[command(author, version)]
struct Cli {
    /// Grid references ("TG 51409 13177") or easting,northing pairs
    /// ("651409.903,313177.270"). Read one per line from stdin when omitted.
    #[arg(allow_hyphen_values = true)]
    coords: Vec<String>,

    /// Height in metres above the Airy 1830 ellipsoid
    #[arg(long, default_value_t = 0.0)]
    height: f64,

    /// Number of decimal places to print, shortest round-trip when omitted
    #[arg(short, long)]
    precision: Option<usize>,

    /// Print the WGS84 ellipsoidal height as a third column
    #[arg(long)]
    with_height: bool,
}

fn convert_one(cli: &Cli, input: &str) -> Result<String, Error> {
    let grid = GridCoordinate::parse_coord(input)?;
    let converted = DatumConversion::osgb36_to_wgs84().convert_with_height(&grid, cli.height)?;
    let latlon = converted.latlon();

    let mut line = match cli.precision {
        Some(p) => format!("{:.p$} {:.p$}", latlon.latitude(), latlon.longitude()),
        None => latlon.to_string(),
    };

    if cli.with_height {
        line.push_str(&format!(" {:.3}", converted.height()));
    }

    Ok(line)
}

fn main() -> ExitCode {
    let logger_env = Env::new().filter_or("GRIDCONVERT_LOG", "info");

    env_logger::Builder::from_env(logger_env)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let inputs: Vec<String> = if cli.coords.is_empty() {
        info!("Reading coordinates from stdin");
        match io::stdin().lock().lines().collect::<io::Result<Vec<_>>>() {
            Ok(lines) => lines,
            Err(err) => {
                error!("Failed to read stdin: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        cli.coords.clone()
    };

    let mut failed = false;
    for input in inputs.iter().map(|line| line.trim()).filter(|line| !line.is_empty()) {
        match convert_one(&cli, input) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                error!("Could not convert \"{input}\": {err}");
                failed = true;
            }
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
