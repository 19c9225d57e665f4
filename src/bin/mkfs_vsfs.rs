use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use vsfs::logging::init_logging;
use vsfs::{format_image, FileBackend, VSFS_IMAGE_SIZE, VSFS_TOTAL_BLOCKS, VSFS_TOTAL_INODES};

#[derive(Parser)]
#[command(name = "mkfs.vsfs", about = "Crea una imagen VSFS vacía")]
struct Cli {
    /// Archivo de imagen a crear
    #[arg(default_value = "vsfs.img")]
    image: PathBuf,

    /// Sobrescribir la imagen si ya existe
    #[arg(long, short = 'f')]
    force: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    if cli.image.exists() && !cli.force {
        return Err(anyhow!(
            "{:?} ya existe (usar --force para sobrescribirla)",
            cli.image
        ));
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&cli.image)
        .with_context(|| format!("No se pudo crear {:?}", cli.image))?;
    file.set_len(VSFS_IMAGE_SIZE)
        .with_context(|| format!("No se pudo dimensionar {:?}", cli.image))?;

    let mut backend = FileBackend::new(file);
    format_image(&mut backend).context("Error al formatear la imagen")?;

    println!(
        "mkfs.vsfs: imagen {:?} creada con {} bloques y {} inodos.",
        cli.image, VSFS_TOTAL_BLOCKS, VSFS_TOTAL_INODES
    );
    Ok(())
}
