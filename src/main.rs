use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vera_bitmap::Rgba8;

use veraconv::models::{ConversionMode, ConversionRequest, PaletteFormat};
use veraconv::services::{analyze, ConversionPipeline};

#[derive(Parser)]
#[command(name = "veraconv")]
#[command(about = "Convert PNG images to VERA bitmaps, tiles and sprites for the Commander X16")]
#[command(version)]
struct Cli {
    /// Log debug details of every conversion step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PNG file
    Convert {
        /// PNG file to convert
        file: PathBuf,

        /// What to convert the image into
        #[arg(short, long, value_enum)]
        mode: ConversionMode,

        /// Tile or sprite width
        #[arg(short, long)]
        width: Option<u32>,

        /// Tile or sprite height
        #[arg(long)]
        height: Option<u32>,

        /// Color that gets palette index 0, as $AARRGGBB
        #[arg(short, long)]
        transparent: Option<Rgba8>,

        /// Palette file format (binary when not given, none for BMX)
        #[arg(short, long, value_enum)]
        palette: Option<PaletteFormat>,

        /// Also write a BASIC program that shows the result in the emulator
        #[arg(short, long)]
        demo: bool,

        /// Directory for the output files (default: next to the input)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what an image can be converted to, without writing anything
    Analyze {
        /// PNG file to analyze
        file: PathBuf,

        /// Color that gets palette index 0, as $AARRGGBB
        #[arg(short, long)]
        transparent: Option<Rgba8>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "veraconv=debug,vera_bitmap=debug"
    } else {
        "veraconv=info,vera_bitmap=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Convert {
            file,
            mode,
            width,
            height,
            transparent,
            palette,
            demo,
            out_dir,
            json,
        } => {
            let request = ConversionRequest {
                width,
                height,
                transparent,
                palette,
                demo,
                out_dir,
                ..ConversionRequest::new(file, mode)
            };
            let report = ConversionPipeline::new(request).run()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Commands::Analyze {
            file,
            transparent,
            json,
        } => {
            let report = analyze(&file, transparent)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
    }
    Ok(())
}
