/*Tipos del fsck de VSFS:
campos del superblock, correcciones aplicadas (Fix), bloques duplicados,
contadores de uso de bloques, el reporte final y los errores de E/S. */

use std::fmt;
use std::io;

use thiserror::Error;

use crate::fs::*;

// -------------------- Campos del superblock --------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuperblockField {
    Magic,
    BlockSize,
    TotalBlocks,
    InodeSize,
    InodeBitmapBlock,
    DataBitmapBlock,
    InodeTableBlock,
    FirstDataBlock,
    InodeCount,
}

impl SuperblockField {
    /// Orden en el que se revisan los campos.
    pub const ALL: [SuperblockField; 9] = [
        SuperblockField::Magic,
        SuperblockField::BlockSize,
        SuperblockField::TotalBlocks,
        SuperblockField::InodeSize,
        SuperblockField::InodeBitmapBlock,
        SuperblockField::DataBitmapBlock,
        SuperblockField::InodeTableBlock,
        SuperblockField::FirstDataBlock,
        SuperblockField::InodeCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SuperblockField::Magic => "magic",
            SuperblockField::BlockSize => "block_size",
            SuperblockField::TotalBlocks => "total_blocks",
            SuperblockField::InodeSize => "inode_size",
            SuperblockField::InodeBitmapBlock => "inode_bitmap_block",
            SuperblockField::DataBitmapBlock => "data_bitmap_block",
            SuperblockField::InodeTableBlock => "inode_table_block",
            SuperblockField::FirstDataBlock => "first_data_block",
            SuperblockField::InodeCount => "inode_count",
        }
    }

    pub fn canonical(self) -> u32 {
        match self {
            SuperblockField::Magic => VSFS_MAGIC as u32,
            SuperblockField::BlockSize => VSFS_BLOCK_SIZE as u32,
            SuperblockField::TotalBlocks => VSFS_TOTAL_BLOCKS,
            SuperblockField::InodeSize => VSFS_INODE_SIZE as u32,
            SuperblockField::InodeBitmapBlock => VSFS_INODE_BITMAP_BLOCK,
            SuperblockField::DataBitmapBlock => VSFS_DATA_BITMAP_BLOCK,
            SuperblockField::InodeTableBlock => VSFS_INODE_TABLE_BLOCK,
            SuperblockField::FirstDataBlock => VSFS_FIRST_DATA_BLOCK,
            SuperblockField::InodeCount => VSFS_TOTAL_INODES,
        }
    }

    pub fn get(self, sb: &SuperblockDisk) -> u32 {
        match self {
            SuperblockField::Magic => sb.magic as u32,
            SuperblockField::BlockSize => sb.block_size,
            SuperblockField::TotalBlocks => sb.total_blocks,
            SuperblockField::InodeSize => sb.inode_size,
            SuperblockField::InodeBitmapBlock => sb.inode_bitmap_block,
            SuperblockField::DataBitmapBlock => sb.data_bitmap_block,
            SuperblockField::InodeTableBlock => sb.inode_table_block,
            SuperblockField::FirstDataBlock => sb.first_data_block,
            SuperblockField::InodeCount => sb.inode_count,
        }
    }

    /// Escribe el valor canónico del campo en `sb`.
    pub fn reset(self, sb: &mut SuperblockDisk) {
        let v = self.canonical();
        match self {
            SuperblockField::Magic => sb.magic = VSFS_MAGIC,
            SuperblockField::BlockSize => sb.block_size = v,
            SuperblockField::TotalBlocks => sb.total_blocks = v,
            SuperblockField::InodeSize => sb.inode_size = v,
            SuperblockField::InodeBitmapBlock => sb.inode_bitmap_block = v,
            SuperblockField::DataBitmapBlock => sb.data_bitmap_block = v,
            SuperblockField::InodeTableBlock => sb.inode_table_block = v,
            SuperblockField::FirstDataBlock => sb.first_data_block = v,
            SuperblockField::InodeCount => sb.inode_count = v,
        }
    }
}

impl fmt::Display for SuperblockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -------------------- Correcciones --------------------

/// Una corrección aplicada en memoria. `Display` da la línea del log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fix {
    Superblock { field: SuperblockField, was: u32 },
    InodeBitmapCleared { inode: u32 },
    InodeBitmapSet { inode: u32 },
    DataBitmapSet { block: u32, inode: u32 },
    BadDirectBlock { inode: u32, block: u32 },
    OrphanBlockCleared { block: u32 },
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Fix::Superblock { field: SuperblockField::Magic, was } => {
                write!(f, "Corrigiendo magic: era 0x{was:x}")
            }
            Fix::Superblock { field, was } => write!(f, "Corrigiendo {field}: era {was}"),
            Fix::InodeBitmapCleared { inode } => write!(
                f,
                "Inodo {inode} inválido marcado en el bitmap de inodos, se libera"
            ),
            Fix::InodeBitmapSet { inode } => write!(
                f,
                "Inodo {inode} válido no marcado en el bitmap de inodos, se marca"
            ),
            Fix::DataBitmapSet { block, inode } => write!(
                f,
                "Bloque de datos {block} usado por el inodo {inode} no marcado en el bitmap, se marca"
            ),
            Fix::BadDirectBlock { inode, block } => write!(
                f,
                "Inodo {inode}: bloque directo {block} fuera de rango, se pone a 0"
            ),
            Fix::OrphanBlockCleared { block } => write!(
                f,
                "Bloque de datos {block} marcado en el bitmap pero sin referencias, se libera"
            ),
        }
    }
}

/// Bloque de datos referenciado por más de un inodo válido. Sólo se reporta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateBlock {
    pub block: u32,
    pub refs: u32,
}

impl fmt::Display for DuplicateBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bloque de datos {} referenciado por {} inodos (duplicado)",
            self.block, self.refs
        )
    }
}

// -------------------- Uso de bloques --------------------

/// Cuántos inodos válidos apuntan (por `direct_block`) a cada bloque.
/// Se reconstruye en cada pasada, nunca se lee de disco.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockUsage {
    counts: [u32; VSFS_TOTAL_BLOCKS as usize],
}

impl BlockUsage {
    pub fn new() -> Self {
        Self {
            counts: [0; VSFS_TOTAL_BLOCKS as usize],
        }
    }

    /// Suma una referencia. Sólo acepta bloques de la zona de datos.
    pub fn record(&mut self, block: u32) {
        debug_assert!(is_data_block(block));
        self.counts[block as usize] += 1;
    }

    pub fn count(&self, block: u32) -> u32 {
        self.counts.get(block as usize).copied().unwrap_or(0)
    }

    /// `(bloque, referencias)` para toda la zona de datos.
    pub fn data_blocks(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (VSFS_FIRST_DATA_BLOCK..=VSFS_LAST_DATA_BLOCK).map(move |b| (b, self.counts[b as usize]))
    }
}

impl Default for BlockUsage {
    fn default() -> Self {
        Self::new()
    }
}

// -------------------- Reporte --------------------

#[derive(Debug, Clone, Default)]
pub struct FsckReport {
    pub superblock: Vec<Fix>,
    pub bitmaps: Vec<Fix>,
    pub duplicates: Vec<DuplicateBlock>,
    pub usage: BlockUsage,
}

impl FsckReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn superblock_ok(&self) -> bool {
        self.superblock.is_empty()
    }

    pub fn bitmaps_ok(&self) -> bool {
        self.bitmaps.is_empty()
    }

    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    pub fn total_fixes(&self) -> usize {
        self.superblock.len() + self.bitmaps.len()
    }

    /// Sin correcciones ni duplicados: la imagen ya era consistente.
    pub fn is_clean(&self) -> bool {
        self.total_fixes() == 0 && !self.has_duplicates()
    }
}

// -------------------- Errores --------------------

/// Región de la imagen que se estaba leyendo o escribiendo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Superblock,
    InodeBitmap,
    DataBitmap,
    InodeTable,
    DataBlocks,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Superblock => "superblock",
            Region::InodeBitmap => "bitmap de inodos",
            Region::DataBitmap => "bitmap de datos",
            Region::InodeTable => "tabla de inodos",
            Region::DataBlocks => "bloques de datos",
        })
    }
}

#[derive(Debug, Error)]
pub enum FsckError {
    #[error("error de E/S en {region} (offset {offset})")]
    Io {
        region: Region,
        offset: u64,
        #[source]
        source: io::Error,
    },
    #[error("error de E/S al sincronizar la imagen")]
    Flush(#[source] io::Error),
    #[error("no se pudo decodificar {region}")]
    Layout { region: Region },
}

pub type FsckResult<T> = Result<T, FsckError>;
