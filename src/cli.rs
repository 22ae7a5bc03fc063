use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input .keymap source files, combined in order
    #[arg(required = true)]
    pub keymaps: Vec<PathBuf>,
    /// Layout-geometry .json describing the physical keys
    #[arg(long)]
    pub layout: PathBuf,
    /// Optional config .json carrying sensor metadata
    #[arg(long)]
    pub base: Option<PathBuf>,
    /// Override the configured layer order
    #[arg(long, value_delimiter = ',')]
    pub layers: Option<Vec<String>>,
    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}
