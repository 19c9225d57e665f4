pub mod bitmap;
pub mod fs;
pub mod fsck;
pub mod logging;
pub mod mkfs;

pub use crate::fs::{
    InodeDisk,
    SuperblockDisk,
    VSFS_BLOCK_SIZE,
    VSFS_IMAGE_SIZE,
    VSFS_MAGIC,
    VSFS_TOTAL_BLOCKS,
    VSFS_TOTAL_INODES,
};
pub use crate::fsck::fsck_backend::{FileBackend, FsckBackend};
pub use crate::fsck::fsck_types::{FsckError, FsckReport};
pub use crate::fsck::render::write_report;
pub use crate::fsck::run_fsck;
pub use crate::mkfs::format_image;
