use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use orogen::{GraphDoc, Node as _, restore_graph};

#[derive(Parser, Debug)]
#[command(name = "orogen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a graph document and write the root's height map as a PNG.
    Render(RenderArgs),
    /// Load and restore a graph document without executing it.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input graph JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input graph JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn read_graph_json(path: &Path) -> anyhow::Result<GraphDoc> {
    let f = File::open(path).with_context(|| format!("open graph '{}'", path.display()))?;
    let r = BufReader::new(f);
    let doc: GraphDoc = serde_json::from_reader(r).with_context(|| "parse graph JSON")?;
    Ok(doc)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let doc = read_graph_json(&args.in_path)?;
    let root = restore_graph(&doc)?;
    let map = root.execute()?;
    orogen::export::save_png(map, &args.out)?;
    println!(
        "wrote {} ({}x{})",
        args.out.display(),
        map.height(),
        map.width()
    );
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let doc = read_graph_json(&args.in_path)?;
    let root = restore_graph(&doc)?;
    println!(
        "{}: {} nodes, root has {} direct dependencies",
        args.in_path.display(),
        doc.nodes.len(),
        root.dependencies().len()
    );
    Ok(())
}
