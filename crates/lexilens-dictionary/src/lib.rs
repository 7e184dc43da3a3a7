mod legacy;
mod sources;

pub use legacy::{SplitSummary, split_legacy, write_shards};
pub use sources::{DirShardSource, HttpShardSource, parse_shard, shard_path};
