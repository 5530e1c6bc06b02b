use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use treediffer_diff::DiffFormat;
use treediffer_types::Preset;

#[derive(Parser)]
#[command(
    name = "treediff",
    about = "Structural diff of two versions of a content tree",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare an old and a new JSON tree
    Diff(DiffArgs),
    /// Print a named preset as TOML
    Preset(PresetArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// The old tree (JSON)
    pub old: PathBuf,
    /// The new tree (JSON)
    pub new: PathBuf,
    /// Configuration file (TOML) applied before the preset
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_parser = parse_preset)]
    pub preset: Option<Preset>,
    #[arg(long, default_value = "simplified", value_parser = parse_format)]
    pub format: DiffFormat,
    /// Keep moves that only changed position among the same siblings
    #[arg(long)]
    pub sort_order_changes: bool,
    /// Compare only these attributes
    #[arg(long, value_delimiter = ',')]
    pub attrs: Option<Vec<String>>,
    /// Never compare these attributes
    #[arg(long = "exclude", value_delimiter = ',')]
    pub exclude_attrs: Vec<String>,
    /// Write the diff here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct PresetArgs {
    #[arg(value_parser = parse_preset)]
    pub name: Preset,
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    s.parse().map_err(|e: treediffer_types::TypeError| e.to_string())
}

fn parse_format(s: &str) -> Result<DiffFormat, String> {
    s.parse().map_err(|e: treediffer_diff::DiffError| e.to_string())
}
