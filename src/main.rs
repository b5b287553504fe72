//! SICLE demo runner
//!
//! This binary exercises the segmentation engine end to end: it reads a
//! binary 8-bit PGM image or synthesises a deterministic test pattern, runs
//! single- or multiscale segmentation, writes the label image(s) as ASCII
//! PGM, and prints a JSON run summary.
//!
//! Run with: cargo run --release -- --pattern noise --n0 300 --nf 20

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sicle::{
    Connectivity, Criterion, Domain, LabelImage, MultibandImage, Sampling, Sicle, SicleOptions,
};

/// Command-line arguments for the SICLE demo runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input image as binary 8-bit PGM; omit to synthesise a pattern
    #[arg(long)]
    input: Option<PathBuf>,

    /// Synthetic pattern when no input file is given
    #[arg(long, value_enum, default_value_t = Pattern::Noise)]
    pattern: Pattern,

    /// Synthetic pattern width
    #[arg(long, default_value_t = 128)]
    width: usize,

    /// Synthetic pattern height
    #[arg(long, default_value_t = 128)]
    height: usize,

    /// Initial number of oversampled seeds
    #[arg(long, default_value_t = 600)]
    n0: usize,

    /// Final number of superspels
    #[arg(long, default_value_t = 40)]
    nf: usize,

    /// Iteration budget for the geometric schedule
    #[arg(long, default_value_t = 5)]
    max_iters: usize,

    /// Disable diagonal (8-/26-) adjacency
    #[arg(long, default_value_t = false)]
    no_diag: bool,

    /// Disable differential recomputation
    #[arg(long, default_value_t = false)]
    no_dift: bool,

    /// Seed oversampling policy
    #[arg(long, value_enum, default_value_t = SamplingArg::Random)]
    sampling: SamplingArg,

    /// Path-cost function
    #[arg(long, value_enum, default_value_t = ConnArg::Fmax)]
    connectivity: ConnArg,

    /// Seed relevance criterion
    #[arg(long, value_enum, default_value_t = CritArg::Minsc)]
    criterion: CritArg,

    /// Stream seed for random oversampling and synthetic noise
    #[arg(long, default_value_t = 42)]
    rng_seed: u64,

    /// Write one label image per iteration instead of only the final one
    #[arg(long, default_value_t = false)]
    multiscale: bool,

    /// Output path; multiscale runs append the scale index
    #[arg(long, default_value = "labels.pgm")]
    output: PathBuf,

    /// Increase output verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Pattern {
    /// Uniform random gray levels
    Noise,
    /// Horizontal gradient
    Gradient,
    /// Dark background with a bright centred square
    Square,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SamplingArg {
    Random,
    Grid,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConnArg {
    Fmax,
    Fsum,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CritArg {
    Size,
    Minsc,
    Maxsc,
    Spread,
}

/// JSON run summary printed on stdout
#[derive(Serialize)]
struct RunSummary {
    width: usize,
    height: usize,
    scales: usize,
    regions: usize,
    smallest_region: usize,
    largest_region: usize,
    elapsed_ms: u128,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("sicle demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let image = match &cli.input {
        Some(path) => read_pgm(path)?,
        None => synthesise(cli),
    };
    let domain = *image.domain();
    info!(
        width = domain.width,
        height = domain.height,
        "input image ready"
    );

    let opts = SicleOptions {
        use_diag: !cli.no_diag,
        use_dift: !cli.no_dift,
        n0: cli.n0,
        nf: cli.nf,
        max_iters: cli.max_iters,
        rng_seed: cli.rng_seed,
        sampling: match cli.sampling {
            SamplingArg::Random => Sampling::Random,
            SamplingArg::Grid => Sampling::Grid,
        },
        connectivity: match cli.connectivity {
            ConnArg::Fmax => Connectivity::Fmax,
            ConnArg::Fsum => Connectivity::Fsum,
        },
        criterion: match cli.criterion {
            CritArg::Size => Criterion::Size,
            CritArg::Minsc => Criterion::MinContrast,
            CritArg::Maxsc => Criterion::MaxContrast,
            CritArg::Spread => Criterion::Spread,
        },
        ..SicleOptions::default()
    };

    let engine = Sicle::new(image, None, None)?;
    let started = Instant::now();
    let scales = if cli.multiscale {
        engine.run_multiscale(&opts)?
    } else {
        vec![engine.run(&opts)?]
    };
    let elapsed = started.elapsed();
    info!(scales = scales.len(), ?elapsed, "segmentation finished");

    for (i, labels) in scales.iter().enumerate() {
        let path = if cli.multiscale {
            scale_path(&cli.output, i)
        } else {
            cli.output.clone()
        };
        write_pgm(&path, labels)?;
        info!(path = %path.display(), regions = labels.num_regions(), "wrote label image");
    }

    let final_labels = scales.last().expect("at least one scale");
    let sizes = region_sizes(final_labels);
    let summary = RunSummary {
        width: domain.width,
        height: domain.height,
        scales: scales.len(),
        regions: final_labels.num_regions(),
        smallest_region: sizes.iter().copied().min().unwrap_or(0),
        largest_region: sizes.iter().copied().max().unwrap_or(0),
        elapsed_ms: elapsed.as_millis(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn synthesise(cli: &Cli) -> MultibandImage {
    let domain = Domain::new(cli.width, cli.height, 1);
    let values: Vec<f32> = match cli.pattern {
        Pattern::Noise => {
            let mut rng = StdRng::seed_from_u64(cli.rng_seed);
            (0..domain.len()).map(|_| rng.gen_range(0.0..255.0)).collect()
        }
        Pattern::Gradient => (0..domain.len())
            .map(|v| (v % cli.width) as f32 / cli.width as f32 * 255.0)
            .collect(),
        Pattern::Square => (0..domain.len())
            .map(|v| {
                let (x, y) = (v % cli.width, v / cli.width);
                let inside = x >= cli.width / 4
                    && x < 3 * cli.width / 4
                    && y >= cli.height / 4
                    && y < 3 * cli.height / 4;
                if inside {
                    220.0
                } else {
                    30.0
                }
            })
            .collect(),
    };
    MultibandImage::grayscale(domain, values).expect("synthetic dimensions are consistent")
}

/// Minimal binary 8-bit PGM (P5) reader.
fn read_pgm(path: &Path) -> Result<MultibandImage, Box<dyn Error>> {
    let bytes = fs::read(path)?;
    let mut fields = Vec::new();
    let mut pos = 0;
    // header: magic, width, height, maxval, each optionally preceded by
    // whitespace or # comments
    while fields.len() < 4 && pos < bytes.len() {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos < bytes.len() && bytes[pos] == b'#' {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }
        let start = pos;
        while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        fields.push(std::str::from_utf8(&bytes[start..pos])?.to_string());
    }
    if fields.len() != 4 || fields[0] != "P5" {
        return Err("expected a binary 8-bit PGM (P5) header".into());
    }
    let width: usize = fields[1].parse()?;
    let height: usize = fields[2].parse()?;
    let maxval: usize = fields[3].parse()?;
    if maxval > 255 {
        return Err("only 8-bit PGM images are supported".into());
    }
    pos += 1; // single whitespace after maxval
    let expected = width * height;
    let raster = bytes
        .get(pos..pos + expected)
        .ok_or("PGM raster is truncated")?;

    let domain = Domain::new(width, height, 1);
    let values = raster.iter().map(|&b| f32::from(b)).collect();
    Ok(MultibandImage::grayscale(domain, values)?)
}

/// ASCII PGM (P2) writer; keeps label values lossless.
fn write_pgm(path: &Path, labels: &LabelImage) -> Result<(), Box<dyn Error>> {
    let domain = labels.domain();
    let maxval = labels.num_regions().max(1);
    let mut out = format!("P2\n{} {}\n{}\n", domain.width, domain.height, maxval);
    for row in labels.labels().chunks(domain.width) {
        let line: Vec<String> = row.iter().map(u32::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

fn scale_path(base: &Path, index: usize) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("labels");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{stem}_{index}.pgm"))
}

fn region_sizes(labels: &LabelImage) -> Vec<usize> {
    let mut sizes = vec![0usize; labels.num_regions()];
    for &l in labels.labels() {
        if l > 0 {
            sizes[(l - 1) as usize] += 1;
        }
    }
    sizes
}
