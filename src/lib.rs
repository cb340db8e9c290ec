//! Deltasig: rolling-checksum signatures and rsync-style deltas.
//!
//! A receiver holding a *basis* byte sequence can describe a newer *update*
//! as a list of ranges copied from the basis plus literal ranges of the
//! update. The crate provides:
//! - A rolling Adler-32 window with on-demand SHA-256 (`hash`)
//! - Basis signatures: per-chunk weak and strong hashes (`signature`)
//! - Delta computation and the delta entry list (`delta`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use deltasig::{DeltaEntry, compute_delta, compute_signature_with_window_size};
//!
//! let basis = b"AAAABBBBCCCCDDDD";
//! let update = b"AAAAXXXXCCCCDDDD";
//!
//! let signature = compute_signature_with_window_size(basis, 4).unwrap();
//! let delta = compute_delta(&signature, update);
//! assert_eq!(
//!     delta,
//!     vec![
//!         DeltaEntry::basis(0, 4),
//!         DeltaEntry::update(4, 8),
//!         DeltaEntry::basis(8, 16),
//!     ]
//! );
//! ```

pub mod delta;
pub mod hash;
pub mod io;
pub mod signature;

#[cfg(feature = "cli")]
pub mod cli;

pub use delta::{DeltaBuilder, DeltaEntry, DeltaSource, append_delta, compute_delta, output_len};
pub use hash::rolling::{RollingChecksum, WindowSizeError};
pub use signature::{
    ChunkSignature, Signature, compute_signature, compute_signature_with_window_size,
};
