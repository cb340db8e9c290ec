// File-level helpers for signatures and deltas.
//
// The basis is read fully into memory; the update is streamed through a
// `BufReader` into a `DeltaBuilder`, so it never needs to be resident.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::delta::{DeltaBuilder, DeltaEntry, DeltaSource};
use crate::hash::rolling::WindowSizeError;
use crate::signature::{Signature, compute_signature, compute_signature_with_window_size};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Result of `delta_file()`.
#[derive(Debug, Clone)]
pub struct DeltaReport {
    /// Basis file size in bytes.
    pub basis_size: u64,
    /// Update file size in bytes.
    pub update_size: u64,
    /// Window size the basis signature was built with.
    pub window_size: usize,
    /// Bytes covered by basis-sourced entries.
    pub basis_bytes: u64,
    /// Bytes covered by update-sourced entries.
    pub literal_bytes: u64,
    /// The delta itself.
    pub entries: Vec<DeltaEntry>,
}

impl DeltaReport {
    fn new(basis_size: u64, window_size: usize, entries: Vec<DeltaEntry>) -> Self {
        let mut basis_bytes = 0;
        let mut literal_bytes = 0;
        for e in &entries {
            match e.source {
                DeltaSource::Basis => basis_bytes += e.len(),
                DeltaSource::Update => literal_bytes += e.len(),
            }
        }
        Self {
            basis_size,
            update_size: basis_bytes + literal_bytes,
            window_size,
            basis_bytes,
            literal_bytes,
            entries,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file helpers.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// I/O error (file open, read).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Invalid window size.
    #[error("invalid window size: {0}")]
    WindowSize(#[from] WindowSizeError),
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Compute the signature of the file at `basis_path`.
///
/// `window_size` of `None` picks the size from the file length.
pub fn signature_file(basis_path: &Path, window_size: Option<usize>) -> Result<Signature, IoError> {
    let basis = std::fs::read(basis_path)?;
    signature_bytes(&basis, window_size)
}

fn signature_bytes(basis: &[u8], window_size: Option<usize>) -> Result<Signature, IoError> {
    Ok(match window_size {
        Some(size) => compute_signature_with_window_size(basis, size)?,
        None => compute_signature(basis),
    })
}

// ---------------------------------------------------------------------------
// Deltas
// ---------------------------------------------------------------------------

/// Stream `reader` through a delta builder for `signature`.
pub fn delta_from_reader<R: Read>(
    signature: &Signature,
    reader: R,
) -> Result<Vec<DeltaEntry>, IoError> {
    let mut builder = DeltaBuilder::new(signature);
    let mut reader = BufReader::with_capacity(BUF_SIZE, reader);
    io::copy(&mut reader, &mut builder)?;
    Ok(builder.finish())
}

/// Compute the delta of the file at `update_path` against `basis_path`.
pub fn delta_file(
    basis_path: &Path,
    update_path: &Path,
    window_size: Option<usize>,
) -> Result<DeltaReport, IoError> {
    let update = File::open(update_path)?;
    delta_basis_file(basis_path, update, window_size)
}

/// Compute the delta of `update` against the file at `basis_path`.
pub fn delta_basis_file<R: Read>(
    basis_path: &Path,
    update: R,
    window_size: Option<usize>,
) -> Result<DeltaReport, IoError> {
    let basis = std::fs::read(basis_path)?;
    let signature = signature_bytes(&basis, window_size)?;
    let entries = delta_from_reader(&signature, update)?;
    Ok(DeltaReport::new(
        basis.len() as u64,
        signature.window_size(),
        entries,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn delta_file_roundtrip_stats() {
        let dir = tempdir().unwrap();
        let basis_path = dir.path().join("basis.bin");
        let update_path = dir.path().join("update.bin");

        let basis: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let mut update = b"new header".to_vec();
        update.extend_from_slice(&basis[..500]);
        std::fs::write(&basis_path, &basis).unwrap();
        std::fs::write(&update_path, &update).unwrap();

        let report = delta_file(&basis_path, &update_path, Some(100)).unwrap();
        assert_eq!(report.basis_size, 1000);
        assert_eq!(report.update_size, update.len() as u64);
        assert_eq!(report.window_size, 100);
        assert_eq!(
            report.entries,
            vec![DeltaEntry::update(0, 10), DeltaEntry::basis(0, 500)]
        );
        assert_eq!(report.basis_bytes, 500);
        assert_eq!(report.literal_bytes, 10);
    }

    #[test]
    fn basis_file_with_reader_update() {
        let dir = tempdir().unwrap();
        let basis_path = dir.path().join("basis.bin");
        std::fs::write(&basis_path, b"AAAABBBBCCCC").unwrap();

        let report = delta_basis_file(&basis_path, b"BBBBzz".as_slice(), Some(4)).unwrap();
        assert_eq!(
            report.entries,
            vec![DeltaEntry::basis(4, 8), DeltaEntry::update(4, 6)]
        );
        assert_eq!(report.update_size, 6);
    }

    #[test]
    fn signature_file_auto_window() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("basis.bin");
        std::fs::write(&path, vec![1u8; 300]).unwrap();

        let sig = signature_file(&path, None).unwrap();
        assert_eq!(sig.window_size(), 128);
        assert_eq!(sig.chunks().len(), 3);
    }

    #[test]
    fn zero_window_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("basis.bin");
        std::fs::write(&path, b"abc").unwrap();

        let err = signature_file(&path, Some(0)).unwrap_err();
        assert!(matches!(err, IoError::WindowSize(WindowSizeError::Zero)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = signature_file(&dir.path().join("nope"), None).unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }

    #[test]
    fn reader_matches_in_memory_delta() {
        let basis: Vec<u8> = (0..4096u32).map(|i| (i * 13 % 256) as u8).collect();
        let sig = compute_signature_with_window_size(&basis, 128).unwrap();
        let update = [&basis[1000..2000], b"xyz".as_slice(), &basis[..128]].concat();

        let streamed = delta_from_reader(&sig, update.as_slice()).unwrap();
        assert_eq!(streamed, crate::delta::compute_delta(&sig, &update));
    }
}
