pub mod fsck;
pub mod fsck_backend;
pub mod fsck_types;
#[cfg(test)]
pub mod mock;
pub mod render;

pub use fsck::run_fsck;
