use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loxvm::bytecode::disasm::disassemble_chunk;
use loxvm::{Chunk, OpCode};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(name = "loxvm", version, about = "Lox bytecode chunk tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a chunk holding a single OP_RETURN and disassemble it
    Demo {
        /// Also write the chunk image here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Disassemble a chunk image
    Disasm {
        path: PathBuf,
        /// Treat the file as raw bytecode instead of an image
        #[arg(long)]
        raw: bool,
    },
    /// Append COUNT bytes and report how storage grew
    Stats {
        #[arg(long, default_value_t = 1024)]
        count: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { out } => run_demo(out)?,
        Commands::Disasm { path, raw } => run_disasm(path, raw)?,
        Commands::Stats { count } => run_stats(count),
    }

    Ok(())
}

fn run_demo(out: Option<PathBuf>) -> Result<()> {
    let mut chunk = Chunk::new();
    chunk.write_op(OpCode::Return);

    print!("{}", disassemble_chunk(&chunk, "demo")?);

    if let Some(path) = out {
        let image = chunk.to_image()?;
        fs::write(&path, &image)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        info!(path = %path.display(), bytes = image.len(), "wrote chunk image");
    }

    Ok(())
}

fn run_disasm(path: PathBuf, raw: bool) -> Result<()> {
    let bytes =
        fs::read(&path).with_context(|| format!("failed to read '{}'", path.display()))?;

    let chunk = if raw {
        Chunk::from_iter(bytes)
    } else {
        Chunk::from_image(&bytes)
            .with_context(|| format!("'{}' is not a chunk image", path.display()))?
    };
    debug!(len = chunk.len(), capacity = chunk.capacity(), "loaded chunk");

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chunk".to_string());
    print!("{}", disassemble_chunk(&chunk, &name)?);

    Ok(())
}

fn run_stats(count: usize) {
    let mut chunk = Chunk::new();
    for _ in 0..count {
        chunk.write_op(OpCode::Return);
    }

    println!("length:        {}", chunk.len());
    println!("capacity:      {}", chunk.capacity());
    println!("growth events: {}", chunk.growth_count());
    println!("bytes copied:  {}", chunk.bytes_copied());
}
