// Window-size selection for signatures.
//
// Smaller bases get finer chunks; large bases are capped so the chunk count
// stays practical. Sizes are powers of two between the two bounds.

/// Smallest window chosen automatically.
pub const MIN_WINDOW_SIZE: usize = 128;

/// Largest window chosen automatically.
pub const MAX_WINDOW_SIZE: usize = 16384;

/// Chunk count a chosen window size must still reach.
pub const MIN_CHUNK_COUNT: usize = 512;

/// Pick the window size for a basis of `basis_len` bytes.
///
/// Halves from [`MAX_WINDOW_SIZE`] down to [`MIN_WINDOW_SIZE`] and returns the
/// first (largest) size that splits the basis into at least
/// [`MIN_CHUNK_COUNT`] full chunks. Falls back to [`MIN_WINDOW_SIZE`].
pub fn choose_window_size(basis_len: usize) -> usize {
    let mut window_size = MAX_WINDOW_SIZE;
    while window_size >= MIN_WINDOW_SIZE {
        if basis_len / window_size >= MIN_CHUNK_COUNT {
            return window_size;
        }
        window_size /= 2;
    }
    MIN_WINDOW_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_powers_of_two() {
        assert!(MIN_WINDOW_SIZE.is_power_of_two());
        assert!(MAX_WINDOW_SIZE.is_power_of_two());
        assert!(MIN_WINDOW_SIZE <= MAX_WINDOW_SIZE);
    }

    #[test]
    fn small_bases_use_minimum() {
        assert_eq!(choose_window_size(0), MIN_WINDOW_SIZE);
        assert_eq!(choose_window_size(1), MIN_WINDOW_SIZE);
        assert_eq!(
            choose_window_size(MIN_CHUNK_COUNT * MIN_WINDOW_SIZE),
            MIN_WINDOW_SIZE
        );
    }

    #[test]
    fn doubling_thresholds() {
        assert_eq!(
            choose_window_size(MIN_CHUNK_COUNT * 2 * MIN_WINDOW_SIZE - 1),
            MIN_WINDOW_SIZE
        );
        assert_eq!(
            choose_window_size(MIN_CHUNK_COUNT * 2 * MIN_WINDOW_SIZE),
            2 * MIN_WINDOW_SIZE
        );
        assert_eq!(
            choose_window_size(MIN_CHUNK_COUNT * MAX_WINDOW_SIZE - 1),
            MAX_WINDOW_SIZE / 2
        );
        assert_eq!(
            choose_window_size(MIN_CHUNK_COUNT * MAX_WINDOW_SIZE),
            MAX_WINDOW_SIZE
        );
    }

    #[test]
    fn saturates_at_maximum() {
        assert_eq!(
            choose_window_size(8 * MIN_CHUNK_COUNT * MAX_WINDOW_SIZE),
            MAX_WINDOW_SIZE
        );
        assert_eq!(choose_window_size(usize::MAX), MAX_WINDOW_SIZE);
    }
}
