//! Broad phase: AABB-overlap pair enumeration.

use crate::body::Body;

/// Find all index pairs `(i, j)` with `i < j` whose AABBs overlap.
///
/// Pairs where neither body takes part in integration (both static or
/// sleeping) are dropped. The index ordering makes pairs canonical, so no
/// separate deduplication is needed.
///
/// O(n^2) brute force - sufficient for small scenes; a spatial hash or
/// sweep-and-prune is a drop-in replacement preserving the pair-set
/// contract.
pub fn pairs(bodies: &[Body]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            if !a.should_update() && !b.should_update() {
                continue;
            }
            if a.bounds.overlaps(&b.bounds) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}
