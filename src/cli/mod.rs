//! CLI argument splitting and flag parsing

pub mod args;
pub mod process;
pub mod split;

pub use args::{Args, LogFormat};
pub use process::{merge_default_options, parse_flags, resolve_paths};
pub use split::{split_args, SplitArgs};
