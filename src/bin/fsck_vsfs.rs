use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use vsfs::logging::init_logging;
use vsfs::{run_fsck, write_report, FileBackend};

#[derive(Parser)]
#[command(name = "fsck.vsfs", about = "Revisa y corrige una imagen VSFS")]
struct Cli {
    /// Imagen a revisar
    #[arg(default_value = "vsfs.img")]
    image: PathBuf,

    /// Sin colores en la salida
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;
    if cli.no_color {
        colored::control::set_override(false);
    }

    // 1. Abrir la imagen para lectura y escritura (tiene que existir)
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&cli.image)
        .with_context(|| format!("No se pudo abrir {:?}", cli.image))?;

    // 2. Revisar y corregir
    let mut backend = FileBackend::new(file);
    let rep = run_fsck(&mut backend)
        .with_context(|| format!("fsck.vsfs falló sobre {:?}", cli.image))?;

    // 3. Reporte
    write_report(&mut io::stdout().lock(), &rep).context("No se pudo escribir el reporte")?;
    Ok(())
}
