//! Filesystem operations: modularized.

mod archive;
mod duplicate;
pub mod helpers;
pub mod io_copy;
mod listing;
mod ops;
mod transfer;
pub mod tree;

pub use archive::{ExtractSummary, create_zip, extract_zip};
pub use duplicate::{unique_directory_path, unique_file_path};
pub use listing::{Entry, list, list_directory};
pub use ops::{DeleteSummary, create_folder, delete, delete_multiple, read_path, rename, save_text, upload};
pub use transfer::{TransferRequest, TransferSummary, copy_dir, copy_or_move};
