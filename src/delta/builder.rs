// Streaming delta computation against a basis signature.
//
// Update bytes are pushed one at a time through a `RollingChecksum` sized to
// the signature's window. Once the window is full, its Adler-32 is checked
// against the set of chunk weak hashes; only on a hit is the SHA-256 digest
// computed and looked up. A confirmed match emits any pending literal range
// followed by the basis range of the matched chunk, then resets the window so
// scanning restarts right after the matched bytes.
//
// At end of input one last lookup runs over whatever the window holds, which
// may be shorter than a full window. That is how a short basis tail chunk is
// found.

use std::collections::{HashMap, HashSet};
use std::io;

use crate::hash::rolling::{RollingChecksum, StrongHash};
use crate::signature::Signature;

use super::list::{DeltaEntry, append_delta};

/// Incremental delta computer for one update.
///
/// Feed the update with [`push`](Self::push), [`update`](Self::update) or
/// `io::Write`, then call [`finish`](Self::finish). The result does not depend
/// on how the update was split across calls.
pub struct DeltaBuilder<'a> {
    signature: &'a Signature,
    window: RollingChecksum,
    /// Weak hashes of all chunks.
    weak: HashSet<u32>,
    /// Strong hash to chunk index; the last chunk with a given content wins.
    strong: HashMap<StrongHash, usize>,
    /// Update offset where the undecided run began.
    pending_start: u64,
    /// Update bytes consumed.
    pos: u64,
    entries: Vec<DeltaEntry>,
    matched_bytes: u64,
}

impl<'a> DeltaBuilder<'a> {
    pub fn new(signature: &'a Signature) -> Self {
        let chunks = signature.chunks();
        let mut weak = HashSet::with_capacity(chunks.len());
        let mut strong = HashMap::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            weak.insert(chunk.weak_hash);
            strong.insert(chunk.strong_hash, i);
        }

        Self {
            signature,
            window: RollingChecksum::with_window(signature.window()),
            weak,
            strong,
            pending_start: 0,
            pos: 0,
            entries: Vec::new(),
            matched_bytes: 0,
        }
    }

    /// Update bytes consumed so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Entries decided so far. The undecided tail is not included.
    pub fn entries(&self) -> &[DeltaEntry] {
        &self.entries
    }

    /// Consume one update byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.window.push(byte);
        self.pos += 1;
        if !self.window.is_full() {
            return;
        }
        if let Some(index) = self.find_chunk() {
            self.store_match(index);
        }
    }

    /// Consume a run of update bytes.
    pub fn update(&mut self, data: &[u8]) {
        for &b in data {
            self.push(b);
        }
    }

    /// Run the final match attempt and return the finished entry list.
    pub fn finish(mut self) -> Vec<DeltaEntry> {
        match self.find_chunk() {
            Some(index) => self.store_match(index),
            None => append_delta(
                &mut self.entries,
                DeltaEntry::update(self.pending_start, self.pos),
            ),
        }

        log::debug!(
            "delta: update {} bytes, {} entries, {} bytes matched in basis",
            self.pos,
            self.entries.len(),
            self.matched_bytes
        );
        self.entries
    }

    /// Index of the basis chunk equal to the current window, if any.
    fn find_chunk(&self) -> Option<usize> {
        if self.window.is_empty() || !self.weak.contains(&self.window.checksum()) {
            return None;
        }
        // Weak hit: confirm with the strong hash.
        self.strong.get(&self.window.digest()).copied()
    }

    /// The last `window.size()` update bytes equal basis chunk `index`.
    fn store_match(&mut self, index: usize) {
        let matched = self.window.size() as u64;
        let match_start = self.pos - matched;
        let basis_start = self.signature.chunk_offset(index);

        log::trace!("delta: chunk {index} matches update[{match_start}..{})", self.pos);

        append_delta(
            &mut self.entries,
            DeltaEntry::update(self.pending_start, match_start),
        );
        append_delta(
            &mut self.entries,
            DeltaEntry::basis(basis_start, basis_start + matched),
        );
        self.matched_bytes += matched;

        self.pending_start = self.pos;
        self.window.reset();
    }
}

impl io::Write for DeltaBuilder<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Compute the delta of `updated` against the basis described by `signature`.
pub fn compute_delta(signature: &Signature, updated: &[u8]) -> Vec<DeltaEntry> {
    let mut builder = DeltaBuilder::new(signature);
    builder.update(updated);
    builder.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
