pub mod nft;
pub mod point;

pub use nft::{validate_batch, ImageSource, NftRecord, RawNftRecord, RecordBatch, RecordError};
pub use point::GeoPoint;
