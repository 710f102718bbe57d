mod transfer;
mod types;

pub use transfer::{BucketTransfer, PART_SIZE};
pub use types::{TransferEvent, UploadError};
