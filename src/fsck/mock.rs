/*Backend en memoria. La imagen completa vive en un Vec<u8>.
Se usa en las pruebas para construir imágenes corruptas sin tocar disco.
A diferencia de un Cursor, no crece: escribir fuera de la imagen es un error. */

use std::io;

use zerocopy::IntoBytes;

use super::fsck_backend::FsckBackend;
use crate::bitmap::set_bit;
use crate::fs::*;

#[derive(Debug, Clone)]
pub struct MemBackend {
    pub image: Vec<u8>,
}

impl MemBackend {
    /// Imagen de `VSFS_IMAGE_SIZE` bytes a cero (ni siquiera tiene superblock).
    pub fn zeroed() -> Self {
        Self {
            image: vec![0u8; VSFS_IMAGE_SIZE as usize],
        }
    }

    pub fn from_bytes(image: Vec<u8>) -> Self {
        Self { image }
    }

    fn range(&self, offset: u64, len: usize) -> io::Result<std::ops::Range<usize>> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "offset fuera de la imagen"))?;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.image.len())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "acceso fuera de la imagen")
            })?;
        Ok(start..end)
    }

    // --------- Ayudas para armar escenarios de prueba ---------

    pub fn put_superblock(&mut self, sb: &SuperblockDisk) {
        let off = block_offset(0) as usize;
        self.image[off..off + VSFS_BLOCK_SIZE].copy_from_slice(sb.as_bytes());
    }

    pub fn put_inode(&mut self, ino: u32, inode: &InodeDisk) {
        let off = block_offset(VSFS_INODE_TABLE_BLOCK) as usize + ino as usize * VSFS_INODE_SIZE;
        self.image[off..off + VSFS_INODE_SIZE].copy_from_slice(inode.as_bytes());
    }

    pub fn mark_inode(&mut self, ino: u32) {
        let off = block_offset(VSFS_INODE_BITMAP_BLOCK) as usize;
        set_bit(&mut self.image[off..off + VSFS_BLOCK_SIZE], ino as usize);
    }

    pub fn mark_data_block(&mut self, block: u32) {
        let off = block_offset(VSFS_DATA_BITMAP_BLOCK) as usize;
        set_bit(&mut self.image[off..off + VSFS_BLOCK_SIZE], block as usize);
    }
}

impl FsckBackend for MemBackend {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let r = self.range(offset, buf.len())?;
        buf.copy_from_slice(&self.image[r]);
        Ok(())
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()> {
        let r = self.range(offset, data.len())?;
        self.image[r].copy_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
