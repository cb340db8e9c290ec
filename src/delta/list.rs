// Delta entries and the append-with-merge rule.
//
// A finished list never contains an empty entry, and two neighbours never
// form one contiguous same-source range: `append_delta` drops the former and
// merges the latter as entries arrive.

use std::fmt;

/// Where the bytes of a [`DeltaEntry`] come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeltaSource {
    /// Copy from the basis; offsets are basis-relative.
    Basis,
    /// Literal bytes of the update; offsets are update-relative.
    Update,
}

/// Half-open byte range `[start, end)` in either the basis or the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeltaEntry {
    pub start: u64,
    pub end: u64,
    pub source: DeltaSource,
}

impl DeltaEntry {
    /// Range copied from the basis.
    pub const fn basis(start: u64, end: u64) -> Self {
        Self {
            start,
            end,
            source: DeltaSource::Basis,
        }
    }

    /// Range taken literally from the update.
    pub const fn update(start: u64, end: u64) -> Self {
        Self {
            start,
            end,
            source: DeltaSource::Update,
        }
    }

    /// Number of bytes covered (zero for empty or inverted ranges).
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Extend `self` by `next` if it continues the same range. Returns `true`
    /// on success.
    fn merge(&mut self, next: &DeltaEntry) -> bool {
        if self.end != next.start || self.source != next.source {
            return false;
        }
        self.end = next.end;
        true
    }
}

impl fmt::Display for DeltaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            DeltaSource::Basis => "basis",
            DeltaSource::Update => "update",
        };
        write!(f, "{source}[{}..{})", self.start, self.end)
    }
}

/// Append `entry` to `list`, skipping it when empty and merging it into the
/// last entry when it continues that entry's range.
pub fn append_delta(list: &mut Vec<DeltaEntry>, entry: DeltaEntry) {
    if entry.is_empty() {
        return;
    }
    if let Some(last) = list.last_mut()
        && last.merge(&entry)
    {
        return;
    }
    list.push(entry);
}

/// Total number of bytes the entries reconstruct.
pub fn output_len(entries: &[DeltaEntry]) -> u64 {
    entries.iter().map(DeltaEntry::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_entries() {
        assert!(DeltaEntry::basis(0, 0).is_empty());
        assert!(DeltaEntry::basis(10, 9).is_empty());
        assert!(DeltaEntry::basis(10, 10).is_empty());
        assert!(!DeltaEntry::basis(10, 11).is_empty());
        assert_eq!(DeltaEntry::update(10, 9).len(), 0);
        assert_eq!(DeltaEntry::update(10, 11).len(), 1);
    }

    #[test]
    fn append_merges_and_drops() {
        let mut lst = Vec::new();
        append_delta(&mut lst, DeltaEntry::basis(10, 10));
        assert!(lst.is_empty());

        append_delta(&mut lst, DeltaEntry::basis(0, 10));
        assert_eq!(lst, vec![DeltaEntry::basis(0, 10)]);

        append_delta(&mut lst, DeltaEntry::basis(10, 20));
        assert_eq!(lst, vec![DeltaEntry::basis(0, 20)]);

        append_delta(&mut lst, DeltaEntry::update(20, 30));
        assert_eq!(
            lst,
            vec![DeltaEntry::basis(0, 20), DeltaEntry::update(20, 30)]
        );
    }

    #[test]
    fn non_contiguous_same_source_stays_separate() {
        let mut lst = Vec::new();
        append_delta(&mut lst, DeltaEntry::basis(500, 600));
        append_delta(&mut lst, DeltaEntry::basis(2000, 2008));
        assert_eq!(lst.len(), 2);
    }

    #[test]
    fn empty_append_never_changes_list() {
        let mut lst = vec![DeltaEntry::update(0, 5)];
        append_delta(&mut lst, DeltaEntry::update(5, 5));
        append_delta(&mut lst, DeltaEntry::basis(7, 3));
        assert_eq!(lst, vec![DeltaEntry::update(0, 5)]);
    }

    #[test]
    fn output_len_sums_entries() {
        let lst = [
            DeltaEntry::update(0, 68),
            DeltaEntry::basis(500, 600),
            DeltaEntry::basis(2000, 2008),
        ];
        assert_eq!(output_len(&lst), 176);
        assert_eq!(output_len(&[]), 0);
    }

    #[test]
    fn display() {
        assert_eq!(DeltaEntry::basis(0, 100).to_string(), "basis[0..100)");
        assert_eq!(DeltaEntry::update(3, 9).to_string(), "update[3..9)");
    }
}
