//! Core data types, loading and output writing.

pub mod loaders;
pub mod transforms;
pub mod writers;

pub use loaders::{extract_channels, load_track_rows, LoaderError, TrackChannels};
pub use transforms::SmoothingPlan;
pub use writers::{write_attributed_ply, write_keyframes_csv, write_proxy_cube_ply, WriteError};
