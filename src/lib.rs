pub mod cli;
pub mod config;
pub mod splitter;
pub mod ui;

pub use config::SplitConfig;
pub use splitter::{
    reset_outputs, traverse_and_split, validate_root, Classification, SplitError, Splitter, Stats, Target,
};
