//! Spatial-coherence check for small sets of high-pressure cells.
//!
//! Two cells are adjacent when they touch in any of the 8 directions. The set
//! counts as clustered when the number of adjacent *pairs* reaches half the set
//! size (rounded down). This is a pairwise density heuristic, not connected
//! component labelling: a spread-out chain and a tight blob can score alike,
//! and callers rely on exactly this rule.

use sensore_frames::grid_position;

/// Number of unordered index pairs that are 8-neighbours on the grid
#[must_use]
pub fn adjacent_pairs(indices: &[usize]) -> usize {
    let coords: Vec<(usize, usize)> = indices.iter().map(|&idx| grid_position(idx)).collect();

    let mut pairs = 0;
    for (i, &(row_a, col_a)) in coords.iter().enumerate() {
        for &(row_b, col_b) in &coords[i + 1..] {
            if row_a.abs_diff(row_b) <= 1 && col_a.abs_diff(col_b) <= 1 {
                pairs += 1;
            }
        }
    }
    pairs
}

/// True when the cells look like one pressure region rather than scattered noise.
///
/// Sets with fewer than two cells are never clustered.
#[must_use]
pub fn is_clustered(indices: &[usize]) -> bool {
    if indices.len() < 2 {
        return false;
    }
    adjacent_pairs(indices) >= indices.len() / 2
}
