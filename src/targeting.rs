//! Nearest-target selection for enemy turns.

use glam::IVec2;

/// Manhattan ("taxicab") distance between two grid cells: the number of
/// orthogonal steps from `a` to `b`.
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Pick the candidate closest to `from` by Manhattan distance.
///
/// Ties keep whichever candidate came first. Returns `None` for an empty
/// candidate list.
pub fn nearest_target<T, I>(from: IVec2, candidates: I) -> Option<(T, IVec2)>
where
    I: IntoIterator<Item = (T, IVec2)>,
{
    let mut best: Option<(i32, T, IVec2)> = None;
    for (target, pos) in candidates {
        let d = manhattan(from, pos);
        if best.as_ref().is_none_or(|(bd, _, _)| d < *bd) {
            best = Some((d, target, pos));
        }
    }
    best.map(|(_, target, pos)| (target, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_counts_orthogonal_steps() {
        assert_eq!(manhattan(IVec2::ZERO, IVec2::new(3, 4)), 7);
        assert_eq!(manhattan(IVec2::new(-1, -1), IVec2::new(1, 1)), 4);
        assert_eq!(manhattan(IVec2::new(2, 2), IVec2::new(2, 2)), 0);
    }

    #[test]
    fn empty_candidates_yield_none() {
        let none: Vec<(u32, IVec2)> = Vec::new();
        assert!(nearest_target(IVec2::ZERO, none).is_none());
    }
}
