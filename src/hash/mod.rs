// Checksums used for basis/update matching.
//
// This module provides:
// - The rolling Adler-32 window with on-demand SHA-256 (`rolling`)
// - Window-size selection for signatures (`config`)

pub mod config;
pub mod rolling;
