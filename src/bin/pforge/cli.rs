use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use poscar_forge::convert::{DEFAULT_PREFIX, Schema};

#[derive(Parser)]
#[command(
    name = "pforge",
    about = "Convert JSON structure exports to POSCAR files and training labels",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write one POSCAR file per structure record
    #[command(visible_alias = "g")]
    Geometry(ConvertArgs),

    /// Write id_prop.csv with one label row per structure record
    #[command(visible_alias = "l")]
    Labels(ConvertArgs),

    /// Check that every label row names a readable geometry file
    Verify(VerifyArgs),
}

impl Command {
    pub fn verbosity(&self) -> Verbosity {
        match self {
            Command::Geometry(args) | Command::Labels(args) => args.verbosity,
            Command::Verify(args) => args.verbosity,
        }
    }
}

#[derive(Args, Clone, Copy, Debug)]
#[command(next_help_heading = "Output Control")]
pub struct Verbosity {
    /// Suppress progress output and log warnings only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every written record
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Layout of the JSON exports
    #[arg(long, value_name = "SCHEMA")]
    pub schema: SchemaArg,

    /// Directory holding the *.json exports
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Output directory (geometry: POSCAR_files, labels: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Prefix for derived geometry filenames
    #[arg(
        short = 'f',
        long = "filename_prefix",
        visible_alias = "prefix",
        value_name = "PREFIX",
        default_value = DEFAULT_PREFIX
    )]
    pub prefix: String,

    #[command(flatten)]
    pub extras: ConvertExtras,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

#[derive(Args)]
#[command(next_help_heading = "Advanced")]
pub struct ConvertExtras {
    /// JSON field names to read instead of the defaults (TOML file)
    #[arg(long, value_name = "FILE")]
    pub fields: Option<PathBuf>,

    /// Leave completed<N>.txt and skipped<N>entries.txt markers in the output directory
    #[arg(long)]
    pub markers: bool,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Label file to check
    #[arg(short, long, value_name = "FILE", default_value = "id_prop.csv")]
    pub labels: PathBuf,

    /// Directory holding the geometry files
    #[arg(short, long, value_name = "DIR", default_value = "POSCAR_files")]
    pub geometry: PathBuf,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaArg {
    /// Grouped relaxation trajectories labeled by energy
    #[value(alias = "2d")]
    Nested,
    /// Flat material entries labeled by band gap
    #[value(alias = "3d")]
    Flat,
}

impl From<SchemaArg> for Schema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Nested => Schema::Nested,
            SchemaArg::Flat => Schema::Flat,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
