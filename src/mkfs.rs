/*Formateo de una imagen VSFS limpia.
Escribe el superblock canónico y deja a cero los bitmaps, la tabla de inodos
y la zona de datos. No crea archivos ni reserva inodos: el resultado es una
imagen que el fsck acepta sin ninguna corrección. */

use tracing::info;
use zerocopy::IntoBytes;

use crate::fs::*;
use crate::fsck::fsck_backend::FsckBackend;
use crate::fsck::fsck_types::{FsckError, FsckResult, Region};

/// Región de la imagen a la que pertenece `block`.
fn region_of(block: u32) -> Region {
    match block {
        0 => Region::Superblock,
        VSFS_INODE_BITMAP_BLOCK => Region::InodeBitmap,
        VSFS_DATA_BITMAP_BLOCK => Region::DataBitmap,
        b if b < VSFS_FIRST_DATA_BLOCK => Region::InodeTable,
        _ => Region::DataBlocks,
    }
}

pub fn format_image<B: FsckBackend + ?Sized>(backend: &mut B) -> FsckResult<()> {
    let zero_block = vec![0u8; VSFS_BLOCK_SIZE];

    for block in 1..VSFS_TOTAL_BLOCKS {
        let offset = block_offset(block);
        backend
            .write_at(offset, &zero_block)
            .map_err(|source| FsckError::Io {
                region: region_of(block),
                offset,
                source,
            })?;
    }

    let sb = SuperblockDisk::canonical();
    backend
        .write_at(block_offset(0), sb.as_bytes())
        .map_err(|source| FsckError::Io {
            region: Region::Superblock,
            offset: 0,
            source,
        })?;
    backend.flush().map_err(FsckError::Flush)?;

    info!(
        target: "vsfs::mkfs",
        blocks = VSFS_TOTAL_BLOCKS,
        inodes = VSFS_TOTAL_INODES,
        data_blocks = VSFS_LAST_DATA_BLOCK - VSFS_FIRST_DATA_BLOCK + 1,
        "image_formatted"
    );
    Ok(())
}
