//! Sandboxing: root selection and root-contained path resolution.

pub mod paths;
pub mod root;

pub use paths::{
    combine_relative, entry_path, is_within, leaf_name, normalize_relative, parent_relative, relative_of, same_path,
    to_absolute,
};
pub use root::{RootContext, RootResolver};
