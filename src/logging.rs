use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filtro desde `RUST_LOG`; por defecto sólo avisos, para no mezclar trazas
/// con el reporte en stdout.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logger de los binarios: formato compacto sobre stderr.
pub fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(default_env_filter())
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("no se pudo inicializar el logger: {err}"))
}
