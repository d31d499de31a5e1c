use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use log::info;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use mandelbrot::color::to_rgb_bytes;
use mandelbrot::{render_image, Color, ColoringPolicy, Narrowing, Point2D, RenderConfig};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const VIEWPORT: &str = "viewport";
const SCALE: &str = "scale";
const POLICY: &str = "policy";
const DIVISOR: &str = "divisor";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const WRAP: &str = "wrap";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .about("Smooth escape-time Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (binary PPM)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0.75,0.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center"))
                .help("Offset of the view; the image is centered on the negation of this point"),
        )
        .arg(
            Arg::with_name(VIEWPORT)
                .long(VIEWPORT)
                .short("v")
                .takes_value(true)
                .default_value("3.0,2.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse viewport"))
                .help("Width and height of the visible region of the complex plane"),
        )
        .arg(
            Arg::with_name(SCALE)
                .long(SCALE)
                .takes_value(true)
                .default_value("4000")
                .validator(|s| {
                    f64::from_str(&s)
                        .map(|_| ())
                        .map_err(|_| "Could not parse scale".to_string())
                })
                .help("Escape value divisor for the log coloring"),
        )
        .arg(
            Arg::with_name(POLICY)
                .long(POLICY)
                .short("p")
                .takes_value(true)
                .possible_values(&["log", "atan", "linear"])
                .default_value("log")
                .help("How escape values become colors"),
        )
        .arg(
            Arg::with_name(DIVISOR)
                .long(DIVISOR)
                .takes_value(true)
                .default_value("50")
                .validator(|s| {
                    f64::from_str(&s)
                        .map(|_| ())
                        .map_err(|_| "Could not parse divisor".to_string())
                })
                .help("Escape value divisor for the linear coloring"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("300")
                .validator(|s| {
                    validate_range(
                        &s,
                        2,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 2 and 200000",
                    )
                })
                .help("Maximum iterations per point"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in renderer (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(WRAP)
                .long(WRAP)
                .help("Wrap out-of-range channels instead of clamping them, as the legacy renderer did"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches<'_>, name: &str) -> Result<T, Error> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| format_err!("Could not parse --{}", name))
}

fn pair<T: FromStr>(matches: &ArgMatches<'_>, name: &str, separator: char) -> Result<(T, T), Error> {
    matches
        .value_of(name)
        .and_then(|s| parse_pair(s, separator))
        .ok_or_else(|| format_err!("Could not parse --{}", name))
}

fn config_from(matches: &ArgMatches<'_>) -> Result<RenderConfig, Error> {
    let (width, height) = pair::<usize>(matches, SIZE, 'x')?;
    let (cx, cy) = pair::<f64>(matches, CENTER, ',')?;
    let (vx, vy) = pair::<f64>(matches, VIEWPORT, ',')?;
    let policy = match matches.value_of(POLICY) {
        Some("atan") => ColoringPolicy::ArcTangent,
        Some("linear") => ColoringPolicy::Linear {
            divisor: value(matches, DIVISOR)?,
        },
        _ => ColoringPolicy::LogScale,
    };
    let narrowing = if matches.is_present(WRAP) {
        Narrowing::Wrap
    } else {
        Narrowing::Clamp
    };

    Ok(RenderConfig::new(width, height)
        .center(Point2D::new(cx, cy))
        .viewport(Point2D::new(vx, vy))
        .scale(value(matches, SCALE)?)
        .policy(policy)
        .limit(value(matches, ITERATIONS)?)
        .narrowing(narrowing))
}

fn write_image(outfile: &str, pixels: &[Color], bounds: (usize, usize)) -> Result<(), Error> {
    let output = File::create(Path::new(outfile))?;
    let raw = to_rgb_bytes(pixels);
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(&raw[..], bounds.0 as u32, bounds.1 as u32, ColorType::RGB(8))?;
    Ok(())
}

fn run(matches: &ArgMatches<'_>) -> Result<(), Error> {
    let config = config_from(matches)?;
    let threads = match matches.value_of(THREADS) {
        Some(_) => value(matches, THREADS)?,
        None => num_cpus::get(),
    };
    let outfile = matches
        .value_of(OUTPUT)
        .ok_or_else(|| format_err!("No output file given"))?;

    info!(
        "Rendering {}x{} around {:?} (viewport {:?}), {:?}, {} iterations, {} threads",
        config.width,
        config.height,
        config.center,
        config.viewport,
        config.policy,
        config.limit,
        threads
    );
    let pixels = render_image(&config, threads)?;
    write_image(outfile, &pixels, (config.width, config.height))?;
    info!("Wrote {}", outfile);
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        for cause in e.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
