/*EL ARCHIVO PRINCIPAL DE FSCK. Lee las cuatro estructuras de la imagen,
las valida y corrige en memoria en un orden fijo, y las vuelve a escribir.
Hace una sola pasada: no vuelve a validar sus propias correcciones. */

use tracing::{debug, info, info_span};
use zerocopy::{FromBytes, IntoBytes};

use super::{fsck_backend::FsckBackend, fsck_types::*};
use crate::bitmap::{clear_bit, is_bit_set, set_bit};
use crate::fs::*;

const TARGET: &str = "vsfs::fsck";

/// Copia en memoria de las estructuras de metadatos de la imagen.
#[derive(Debug, Clone)]
pub struct ImageState {
    pub superblock: SuperblockDisk,
    pub inode_bitmap: Vec<u8>,
    pub data_bitmap: Vec<u8>,
    pub inodes: Vec<InodeDisk>,
}

// -----------------------------------------------------------------------------
// E/S de regiones
// -----------------------------------------------------------------------------

fn read_region<B: FsckBackend + ?Sized>(
    backend: &mut B,
    region: Region,
    offset: u64,
    buf: &mut [u8],
) -> FsckResult<()> {
    backend
        .read_at(offset, buf)
        .map_err(|source| FsckError::Io { region, offset, source })
}

fn write_region<B: FsckBackend + ?Sized>(
    backend: &mut B,
    region: Region,
    offset: u64,
    data: &[u8],
) -> FsckResult<()> {
    backend
        .write_at(offset, data)
        .map_err(|source| FsckError::Io { region, offset, source })
}

/// Lee superblock, ambos bitmaps y la tabla de inodos. Si algo falla no se
/// ha escrito nada todavía.
pub fn load_image<B: FsckBackend + ?Sized>(backend: &mut B) -> FsckResult<ImageState> {
    let mut block = vec![0u8; VSFS_BLOCK_SIZE];
    read_region(backend, Region::Superblock, block_offset(0), &mut block)?;
    let superblock = SuperblockDisk::read_from_bytes(&block).map_err(|_| FsckError::Layout {
        region: Region::Superblock,
    })?;

    let mut inode_bitmap = vec![0u8; VSFS_BLOCK_SIZE];
    read_region(
        backend,
        Region::InodeBitmap,
        block_offset(VSFS_INODE_BITMAP_BLOCK),
        &mut inode_bitmap,
    )?;

    let mut data_bitmap = vec![0u8; VSFS_BLOCK_SIZE];
    read_region(
        backend,
        Region::DataBitmap,
        block_offset(VSFS_DATA_BITMAP_BLOCK),
        &mut data_bitmap,
    )?;

    let mut table = vec![0u8; VSFS_TOTAL_INODES as usize * VSFS_INODE_SIZE];
    read_region(
        backend,
        Region::InodeTable,
        block_offset(VSFS_INODE_TABLE_BLOCK),
        &mut table,
    )?;
    let inodes = table
        .chunks_exact(VSFS_INODE_SIZE)
        .map(|raw| {
            InodeDisk::read_from_bytes(raw).map_err(|_| FsckError::Layout {
                region: Region::InodeTable,
            })
        })
        .collect::<FsckResult<Vec<_>>>()?;

    Ok(ImageState {
        superblock,
        inode_bitmap,
        data_bitmap,
        inodes,
    })
}

/// Escribe tabla de inodos, bitmap de inodos y bitmap de datos (en ese orden)
/// y sincroniza. Se llama siempre, haya o no correcciones.
pub fn write_image<B: FsckBackend + ?Sized>(backend: &mut B, state: &ImageState) -> FsckResult<()> {
    write_region(
        backend,
        Region::InodeTable,
        block_offset(VSFS_INODE_TABLE_BLOCK),
        state.inodes.as_slice().as_bytes(),
    )?;
    write_region(
        backend,
        Region::InodeBitmap,
        block_offset(VSFS_INODE_BITMAP_BLOCK),
        &state.inode_bitmap,
    )?;
    write_region(
        backend,
        Region::DataBitmap,
        block_offset(VSFS_DATA_BITMAP_BLOCK),
        &state.data_bitmap,
    )?;
    backend.flush().map_err(FsckError::Flush)
}

// -----------------------------------------------------------------------------
// Paso 1: superblock
// -----------------------------------------------------------------------------

/// Compara los nueve campos con su valor canónico y corrige los que difieran.
pub fn check_superblock(sb: &mut SuperblockDisk, report: &mut FsckReport) {
    for field in SuperblockField::ALL {
        let was = field.get(sb);
        if was != field.canonical() {
            field.reset(sb);
            debug!(target: TARGET, field = field.name(), was, "superblock_fix");
            report.superblock.push(Fix::Superblock { field, was });
        }
    }
}

// -----------------------------------------------------------------------------
// Paso 2: inodos <-> bitmap de inodos, y punteros directos <-> bitmap de datos
// -----------------------------------------------------------------------------

/// Una sola pasada por la tabla de inodos.
///
/// El inodo manda sobre el bitmap: el bit se ajusta a lo que dice el inodo,
/// nunca al revés. Para los inodos válidos con bloques, el puntero directo se
/// contabiliza en `usage` si está en la zona de datos, o se pone a 0 si no.
/// Un puntero 0 significa "sin bloque" y no se toca.
pub fn check_inodes_and_bitmaps(
    state: &mut ImageState,
    usage: &mut BlockUsage,
    report: &mut FsckReport,
) {
    let inode_bitmap = &mut state.inode_bitmap;
    let data_bitmap = &mut state.data_bitmap;

    for (idx, inode) in state
        .inodes
        .iter_mut()
        .enumerate()
        .take(VSFS_TOTAL_INODES as usize)
    {
        let ino = idx as u32;
        let bitmap_used = is_bit_set(inode_bitmap, idx);
        let valid = inode.is_valid();

        if bitmap_used && !valid {
            clear_bit(inode_bitmap, idx);
            debug!(target: TARGET, inode = ino, "inode_bitmap_clear");
            report.bitmaps.push(Fix::InodeBitmapCleared { inode: ino });
        } else if !bitmap_used && valid {
            set_bit(inode_bitmap, idx);
            debug!(target: TARGET, inode = ino, "inode_bitmap_set");
            report.bitmaps.push(Fix::InodeBitmapSet { inode: ino });
        }

        if !valid || inode.block_count == 0 {
            continue;
        }

        let block = inode.direct_block;
        if is_data_block(block) {
            usage.record(block);
            if !is_bit_set(data_bitmap, block as usize) {
                set_bit(data_bitmap, block as usize);
                debug!(target: TARGET, inode = ino, block, "data_bitmap_set");
                report.bitmaps.push(Fix::DataBitmapSet { block, inode: ino });
            }
        } else if block != 0 {
            inode.direct_block = 0;
            debug!(target: TARGET, inode = ino, block, "bad_direct_block");
            report.bitmaps.push(Fix::BadDirectBlock { inode: ino, block });
        }
    }
}

// -----------------------------------------------------------------------------
// Paso 3: bloques huérfanos
// -----------------------------------------------------------------------------

/// Libera los bloques marcados en el bitmap de datos que ningún inodo válido
/// referencia. `usage` tiene que estar completo.
pub fn sweep_orphan_blocks(data_bitmap: &mut [u8], usage: &BlockUsage, report: &mut FsckReport) {
    for (block, refs) in usage.data_blocks() {
        if refs == 0 && is_bit_set(data_bitmap, block as usize) {
            clear_bit(data_bitmap, block as usize);
            debug!(target: TARGET, block, "orphan_block_clear");
            report.bitmaps.push(Fix::OrphanBlockCleared { block });
        }
    }
}

// -----------------------------------------------------------------------------
// Paso 4: duplicados (sólo reporte)
// -----------------------------------------------------------------------------

pub fn report_duplicates(usage: &BlockUsage, report: &mut FsckReport) {
    for (block, refs) in usage.data_blocks() {
        if refs > 1 {
            debug!(target: TARGET, block, refs, "duplicate_block");
            report.duplicates.push(DuplicateBlock { block, refs });
        }
    }
}

// -----------------------------------------------------------------------------
// Orquestación
// -----------------------------------------------------------------------------

pub fn run_fsck<B: FsckBackend + ?Sized>(backend: &mut B) -> FsckResult<FsckReport> {
    let span = info_span!(target: TARGET, "fsck");
    let _guard = span.enter();

    let mut report = FsckReport::new();
    let mut state = load_image(backend)?;

    // --- Paso 1: superblock ---
    check_superblock(&mut state.superblock, &mut report);
    if !report.superblock_ok() {
        write_region(
            backend,
            Region::Superblock,
            block_offset(0),
            state.superblock.as_bytes(),
        )?;
    }
    info!(target: TARGET, fixes = report.superblock.len(), "superblock_checked");

    // --- Paso 2: inodos y bitmaps ---
    let mut usage = BlockUsage::new();
    check_inodes_and_bitmaps(&mut state, &mut usage, &mut report);

    // --- Paso 3: bloques huérfanos (necesita `usage` completo) ---
    sweep_orphan_blocks(&mut state.data_bitmap, &usage, &mut report);
    info!(target: TARGET, fixes = report.bitmaps.len(), "bitmaps_checked");

    // --- Paso 4: duplicados ---
    report_duplicates(&usage, &mut report);
    info!(target: TARGET, duplicates = report.duplicates.len(), "duplicates_checked");

    report.usage = usage;
    write_image(backend, &state)?;
    info!(target: TARGET, total_fixes = report.total_fixes(), "fsck_complete");

    Ok(report)
}
