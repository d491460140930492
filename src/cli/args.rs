use crate::models::{MergeOrder, NegativeWindPolicy, OutputFormat, TemperatureUnit};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-wrangler")]
#[command(about = "Split, merge and convert weather CSV datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Configuration file [default: ./weather-wrangler.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Print the run report as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a CSV file into fixed-size chunks and write a manifest
    Split {
        #[arg(short, long, help = "Source CSV file [default: ../weather.csv]")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "Directory for chunk files [default: ../split_data]")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Rows per chunk [default: 500]")]
        chunk_size: Option<usize>,

        #[arg(short, long, help = "Chunk file name prefix [default: weather]")]
        prefix: Option<String>,

        #[arg(long, help = "Prefix rows with their source row number")]
        index_column: bool,

        #[arg(long, conflicts_with = "index_column", help = "Disable the index column")]
        no_index_column: bool,

        #[arg(long, help = "Create the output directory if it does not exist")]
        create_output_dir: bool,

        #[arg(
            long,
            conflicts_with = "create_output_dir",
            help = "Require the output directory to exist"
        )]
        no_create_output_dir: bool,
    },

    /// Concatenate every file whose name contains a pattern
    Merge {
        #[arg(short, long, help = "Directory to scan [default: .]")]
        dir: Option<PathBuf>,

        #[arg(short, long, help = "Substring file names must contain [default: output_weather_]")]
        pattern: Option<String>,

        #[arg(short, long, help = "Merged output file [default: weather_converted.csv]")]
        output: Option<PathBuf>,

        #[arg(long, value_enum, help = "Concatenation order [default: lexical]")]
        order: Option<MergeOrder>,

        #[arg(short, long, value_enum, help = "Output format [default: csv]")]
        format: Option<OutputFormat>,

        #[arg(short, long, help = "Parquet compression [default: snappy]")]
        compression: Option<String>,

        #[arg(long, help = "Prefix rows with their row number within each source file")]
        index_column: bool,

        #[arg(long, conflicts_with = "index_column", help = "Disable the index column")]
        no_index_column: bool,
    },

    /// Derive temp_avg, temp_f and wind_chill columns
    Convert {
        #[arg(help = "CSV file to convert")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output file [default: {stem}_converted.{ext} beside the input]"
        )]
        output: Option<PathBuf>,

        #[arg(long, conflicts_with = "output", help = "Compute the conversion without writing it")]
        no_output: bool,

        #[arg(long, value_enum, help = "Unit of temp_max/temp_min [default: celsius]")]
        input_unit: Option<TemperatureUnit>,

        #[arg(long, value_enum, help = "Negative wind speed handling [default: nan]")]
        negative_wind: Option<NegativeWindPolicy>,

        #[arg(short, long, value_enum, help = "Output format [default: csv]")]
        format: Option<OutputFormat>,

        #[arg(short, long, help = "Parquet compression [default: snappy]")]
        compression: Option<String>,

        #[arg(long, help = "Prefix rows with their row number")]
        index_column: bool,

        #[arg(long, conflicts_with = "index_column", help = "Disable the index column")]
        no_index_column: bool,
    },
}
