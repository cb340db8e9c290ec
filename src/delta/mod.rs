// Delta computation.
//
// This module provides:
// - Delta entries and the append-with-merge list rule (`list`)
// - The streaming delta builder and `compute_delta` (`builder`)

pub mod builder;
pub mod list;

pub use builder::{DeltaBuilder, compute_delta};
pub use list::{DeltaEntry, DeltaSource, append_delta, output_len};
