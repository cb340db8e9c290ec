// Basis signatures: per-chunk weak and strong hashes.
//
// The basis is split into non-overlapping chunks of `window_size` bytes; the
// final chunk keeps whatever is left and may be shorter. Recording that tail
// chunk is what lets an unchanged file match itself completely.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::hash::config::choose_window_size;
use crate::hash::rolling::{StrongHash, WindowSizeError, adler32, sha256, validate_window_size};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fingerprint of one basis chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkSignature {
    /// Adler-32 of the chunk.
    pub weak_hash: u32,
    /// SHA-256 of the chunk.
    pub strong_hash: StrongHash,
}

impl ChunkSignature {
    /// Fingerprint `data`.
    pub fn new(data: &[u8]) -> Self {
        Self {
            weak_hash: adler32(data),
            strong_hash: sha256(data),
        }
    }
}

/// Chunk fingerprints of a whole basis, in basis order.
///
/// `chunks()[i]` covers basis bytes `[i * window_size, min((i + 1) * window_size, len))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    window_size: NonZeroUsize,
    chunks: Vec<ChunkSignature>,
}

impl Signature {
    /// Reassemble a signature from stored parts.
    pub fn from_parts(
        window_size: usize,
        chunks: Vec<ChunkSignature>,
    ) -> Result<Self, WindowSizeError> {
        Ok(Self {
            window_size: validate_window_size(window_size)?,
            chunks,
        })
    }

    /// Chunk size used to split the basis.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size.get()
    }

    pub(crate) fn window(&self) -> NonZeroUsize {
        self.window_size
    }

    /// Per-chunk fingerprints.
    #[inline]
    pub fn chunks(&self) -> &[ChunkSignature] {
        &self.chunks
    }

    /// Basis offset where chunk `index` starts.
    #[inline]
    pub fn chunk_offset(&self, index: usize) -> u64 {
        index as u64 * self.window_size.get() as u64
    }

    /// Nominal basis range of chunk `index`.
    ///
    /// The tail chunk may end before `range.end`; the signature does not
    /// record the basis length.
    pub fn chunk_range(&self, index: usize) -> Range<u64> {
        let start = self.chunk_offset(index);
        start..start + self.window_size.get() as u64
    }

    /// Whether the basis was empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Compute the signature of `basis` with an automatically chosen window size.
pub fn compute_signature(basis: &[u8]) -> Signature {
    // choose_window_size never returns zero.
    let window = NonZeroUsize::new(choose_window_size(basis.len())).unwrap_or(NonZeroUsize::MIN);
    build(basis, window)
}

/// Compute the signature of `basis` split into `window_size`-byte chunks.
pub fn compute_signature_with_window_size(
    basis: &[u8],
    window_size: usize,
) -> Result<Signature, WindowSizeError> {
    Ok(build(basis, validate_window_size(window_size)?))
}

fn build(basis: &[u8], window: NonZeroUsize) -> Signature {
    let chunks = hash_chunks(basis, window.get());
    log::debug!(
        "signature: basis {} bytes, window {}, {} chunks",
        basis.len(),
        window,
        chunks.len()
    );
    Signature {
        window_size: window,
        chunks,
    }
}

#[cfg(not(feature = "parallel"))]
fn hash_chunks(basis: &[u8], window_size: usize) -> Vec<ChunkSignature> {
    basis.chunks(window_size).map(ChunkSignature::new).collect()
}

#[cfg(feature = "parallel")]
fn hash_chunks(basis: &[u8], window_size: usize) -> Vec<ChunkSignature> {
    basis
        .par_chunks(window_size)
        .map(ChunkSignature::new)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_basis_has_no_chunks() {
        let sig = compute_signature_with_window_size(&[], 128).unwrap();
        assert_eq!(sig, Signature::from_parts(128, Vec::new()).unwrap());
        assert!(sig.is_empty());
        assert_eq!(sig.window_size(), 128);

        let sig = compute_signature(&[]);
        assert!(sig.is_empty());
        assert_eq!(sig.window_size(), 128);
    }

    #[test]
    fn zero_window_rejected() {
        assert_eq!(
            compute_signature_with_window_size(b"abc", 0),
            Err(WindowSizeError::Zero)
        );
        assert_eq!(
            Signature::from_parts(0, Vec::new()),
            Err(WindowSizeError::Zero)
        );
    }

    #[test]
    fn chunks_follow_basis_order_with_short_tail() {
        let basis: Vec<u8> = (0..250u32).map(|i| (i * 7) as u8).collect();
        let sig = compute_signature_with_window_size(&basis, 100).unwrap();

        assert_eq!(sig.chunks().len(), 3);
        assert_eq!(sig.chunks()[0], ChunkSignature::new(&basis[0..100]));
        assert_eq!(sig.chunks()[1], ChunkSignature::new(&basis[100..200]));
        assert_eq!(sig.chunks()[2], ChunkSignature::new(&basis[200..250]));
        assert_eq!(sig.chunk_range(2), 200..300);
    }

    #[test]
    fn exact_multiple_has_no_tail() {
        let basis = vec![3u8; 400];
        let sig = compute_signature_with_window_size(&basis, 100).unwrap();
        assert_eq!(sig.chunks().len(), 4);
        assert!(sig.chunks().iter().all(|c| *c == sig.chunks()[0]));
    }

    #[test]
    fn window_larger_than_basis_gives_single_chunk() {
        let sig = compute_signature_with_window_size(b"hello", 4096).unwrap();
        assert_eq!(sig.chunks(), &[ChunkSignature::new(b"hello")]);
        assert_eq!(sig.chunk_offset(0), 0);
    }

    #[test]
    fn automatic_window_tracks_basis_length() {
        let basis = vec![0u8; 512 * 256];
        let sig = compute_signature(&basis);
        assert_eq!(sig.window_size(), 256);
        assert_eq!(sig.chunks().len(), 512);
    }

    #[test]
    fn chunk_signature_uses_adler_and_sha() {
        let c = ChunkSignature::new(b"Wikipedia");
        assert_eq!(c.weak_hash, 0x11E6_0398);
        assert_eq!(c.strong_hash, sha256(b"Wikipedia"));
    }
}
