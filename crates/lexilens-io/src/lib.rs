pub mod asset_cache;
pub mod stdin;

pub use asset_cache::{AssetCache, AssetError};
