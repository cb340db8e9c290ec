// Rolling Adler-32 checksum over a fixed-size window.
//
// The window is a circular buffer with a wrapping write cursor. Every push
// updates the checksum in O(1): once the window is full, the byte about to be
// overwritten is subtracted from both accumulators before the incoming byte
// is added. The strong hash (SHA-256) of the window is computed on demand.
//
// One-shot `adler32()` / `sha256()` helpers compute the same two hashes over a
// plain slice; the signature builder uses them per basis chunk.

use std::num::NonZeroUsize;

use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest prime below 2^16; all Adler-32 arithmetic is modulo this.
pub const MOD_ADLER: u32 = 65521;

/// Strong (cryptographic) hash of a window or chunk.
pub type StrongHash = [u8; 32];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejected window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WindowSizeError {
    /// A zero-capacity window cannot hold any bytes.
    #[error("window size must be positive")]
    Zero,
}

/// Validate a caller-supplied window size.
pub fn validate_window_size(size: usize) -> Result<NonZeroUsize, WindowSizeError> {
    NonZeroUsize::new(size).ok_or(WindowSizeError::Zero)
}

// ---------------------------------------------------------------------------
// One-shot hashes
// ---------------------------------------------------------------------------

/// Adler-32 of `data`.
pub fn adler32(data: &[u8]) -> u32 {
    #[cfg(feature = "adler32")]
    {
        let mut hasher = simd_adler32::Adler32::new();
        hasher.write(data);
        hasher.finish()
    }
    #[cfg(not(feature = "adler32"))]
    {
        let mut a: u32 = 1;
        let mut b: u32 = 0;
        for &byte in data {
            a = (a + u32::from(byte)) % MOD_ADLER;
            b = (b + a) % MOD_ADLER;
        }
        (b << 16) | a
    }
}

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> StrongHash {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

// ---------------------------------------------------------------------------
// Rolling checksum
// ---------------------------------------------------------------------------

/// Adler-32 over the most recent `window_size` pushed bytes.
#[derive(Clone, Debug)]
pub struct RollingChecksum {
    s1: u32,
    s2: u32,
    /// Window contents; `window[pos]` is the oldest byte once `full`.
    window: Box<[u8]>,
    /// Write cursor.
    pos: usize,
    full: bool,
    /// `window.len() % MOD_ADLER`, the weight of the evicted byte in `s2`.
    weight: u32,
}

impl RollingChecksum {
    /// Create an empty engine with room for `window_size` bytes.
    pub fn new(window_size: usize) -> Result<Self, WindowSizeError> {
        validate_window_size(window_size).map(Self::with_window)
    }

    /// Create an empty engine from an already validated window size.
    pub fn with_window(window_size: NonZeroUsize) -> Self {
        let len = window_size.get();
        Self {
            s1: 1,
            s2: 0,
            window: vec![0u8; len].into_boxed_slice(),
            pos: 0,
            full: false,
            weight: (len % MOD_ADLER as usize) as u32,
        }
    }

    /// Capacity of the window.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.window.len()
    }

    /// Push one byte, evicting the oldest one when the window is full.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        if self.full {
            self.evict(self.window[self.pos]);
        }

        self.s1 = (self.s1 + u32::from(byte)) % MOD_ADLER;
        self.s2 = (self.s2 + self.s1) % MOD_ADLER;

        self.window[self.pos] = byte;
        self.pos += 1;
        if self.pos == self.window.len() {
            self.pos = 0;
            self.full = true;
        }
    }

    /// Remove `outgoing` from both accumulators.
    ///
    /// `s2` loses `n * outgoing` plus the `+1` the evicted position carried
    /// from the initial `s1 = 1`.
    #[inline]
    fn evict(&mut self, outgoing: u8) {
        let outgoing = u32::from(outgoing);
        self.s1 = (self.s1 + MOD_ADLER - outgoing) % MOD_ADLER;
        let sub = (self.weight * outgoing + 1) % MOD_ADLER;
        self.s2 = (self.s2 + MOD_ADLER - sub) % MOD_ADLER;
    }

    /// Adler-32 of the current window contents.
    #[inline]
    pub fn checksum(&self) -> u32 {
        (self.s2 << 16) | self.s1
    }

    /// Whether at least `window_size` bytes were pushed since the last reset.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Number of valid bytes held.
    #[inline]
    pub fn size(&self) -> usize {
        if self.full { self.window.len() } else { self.pos }
    }

    /// Whether the window holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Window contents oldest-first, as (older, newer) slices.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        if self.full {
            (&self.window[self.pos..], &self.window[..self.pos])
        } else {
            (&self.window[..self.pos], &[])
        }
    }

    /// SHA-256 of the window contents in stream order.
    pub fn digest(&self) -> StrongHash {
        let (older, newer) = self.as_slices();
        let mut hasher = Sha256::new();
        hasher.update(older);
        hasher.update(newer);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    }

    /// Forget all pushed bytes. The window buffer is kept.
    pub fn reset(&mut self) {
        self.s1 = 1;
        self.s2 = 0;
        self.pos = 0;
        self.full = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
