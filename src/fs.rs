use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

// -----------------------------------------------------------------------------
// Geometría fija de VSFS
// -----------------------------------------------------------------------------
//
// La imagen tiene siempre la misma forma. Estos valores son el "esquema" de la
// imagen: nunca se leen del superblock en disco, que puede estar corrupto.

pub const VSFS_BLOCK_SIZE: usize = 4096;
pub const VSFS_MAGIC: u16 = 0xD34D;
pub const VSFS_TOTAL_BLOCKS: u32 = 64;
pub const VSFS_INODE_SIZE: usize = 256;

pub const VSFS_INODE_BITMAP_BLOCK: u32 = 1;
pub const VSFS_DATA_BITMAP_BLOCK: u32 = 2;
pub const VSFS_INODE_TABLE_BLOCK: u32 = 3;
pub const VSFS_INODE_TABLE_BLOCKS: u32 = 5;
pub const VSFS_INODES_PER_BLOCK: u32 = (VSFS_BLOCK_SIZE / VSFS_INODE_SIZE) as u32;
pub const VSFS_TOTAL_INODES: u32 = VSFS_INODE_TABLE_BLOCKS * VSFS_INODES_PER_BLOCK;

pub const VSFS_FIRST_DATA_BLOCK: u32 = 8;
pub const VSFS_LAST_DATA_BLOCK: u32 = VSFS_TOTAL_BLOCKS - 1;

pub const VSFS_IMAGE_SIZE: u64 = VSFS_TOTAL_BLOCKS as u64 * VSFS_BLOCK_SIZE as u64;

const SUPERBLOCK_FIELDS_LEN: usize = 2 + 8 * 4;
const INODE_FIELDS_LEN: usize = 14 * 4;

/// Offset absoluto (en bytes) del bloque `block`.
#[inline]
pub const fn block_offset(block: u32) -> u64 {
    block as u64 * VSFS_BLOCK_SIZE as u64
}

/// `true` si `block` cae dentro de la zona de datos `[8, 63]`.
#[inline]
pub const fn is_data_block(block: u32) -> bool {
    block >= VSFS_FIRST_DATA_BLOCK && block <= VSFS_LAST_DATA_BLOCK
}

// -------------------- Estructuras en disco --------------------

/// Superblock de VSFS. Ocupa el bloque 0 completo.
///
/// `magic` es de 16 bits y el resto de 32, sin relleno entre ellos, por eso la
/// estructura es `packed`: para leer un campo hay que copiarlo primero
/// (`let m = sb.magic;`), nunca tomar una referencia.
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C, packed)]
pub struct SuperblockDisk {
    pub magic: u16,
    pub block_size: u32,
    pub total_blocks: u32,
    pub inode_bitmap_block: u32,
    pub data_bitmap_block: u32,
    pub inode_table_block: u32,
    pub first_data_block: u32,
    pub inode_size: u32,
    pub inode_count: u32,
    pub reserved: [u8; VSFS_BLOCK_SIZE - SUPERBLOCK_FIELDS_LEN],
}

impl SuperblockDisk {
    /// Superblock con todos los campos en su valor canónico.
    pub fn canonical() -> Self {
        Self {
            magic: VSFS_MAGIC,
            block_size: VSFS_BLOCK_SIZE as u32,
            total_blocks: VSFS_TOTAL_BLOCKS,
            inode_bitmap_block: VSFS_INODE_BITMAP_BLOCK,
            data_bitmap_block: VSFS_DATA_BITMAP_BLOCK,
            inode_table_block: VSFS_INODE_TABLE_BLOCK,
            first_data_block: VSFS_FIRST_DATA_BLOCK,
            inode_size: VSFS_INODE_SIZE as u32,
            inode_count: VSFS_TOTAL_INODES,
            reserved: [0u8; VSFS_BLOCK_SIZE - SUPERBLOCK_FIELDS_LEN],
        }
    }
}

/// Inodo en disco: 14 campos de 32 bits seguidos de relleno hasta 256 bytes.
///
/// Sólo `direct_block` se usa para contabilizar bloques; los tres punteros
/// indirectos se conservan tal cual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct InodeDisk {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
    pub atime: u32,
    pub ctime: u32,
    pub mtime: u32,
    pub dtime: u32,
    pub link_count: u32,
    pub block_count: u32,
    pub direct_block: u32,
    pub single_indirect: u32,
    pub double_indirect: u32,
    pub triple_indirect: u32,
    pub reserved: [u8; VSFS_INODE_SIZE - INODE_FIELDS_LEN],
}

impl InodeDisk {
    /// Inodo vacío (todo a cero), tal como lo deja `mkfs`.
    pub fn empty() -> Self {
        Self::new_zeroed()
    }

    /// Un inodo está en uso si tiene enlaces y no fue borrado.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.link_count > 0 && self.dtime == 0
    }
}

impl Default for InodeDisk {
    fn default() -> Self {
        Self::empty()
    }
}
