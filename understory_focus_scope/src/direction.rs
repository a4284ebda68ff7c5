// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional (arrow-key) candidate ranking.
//!
//! Given a pivot (usually the focused element) and a set of candidates, rank
//! the candidates that lie strictly in one compass direction by perceived
//! proximity. This is a nearest-neighbor heuristic, not an exact geometric
//! order:
//!
//! - A candidate is considered only if both of its edges along the travel
//!   axis are past the pivot's corresponding edges (for [`Direction::Up`]:
//!   its bottom is above the pivot's bottom and its top above the pivot's top).
//! - Candidates whose perpendicular extent overlaps the pivot's are *aligned*
//!   and score [`ALIGNED_SCORE`] divided by the gap along the travel axis.
//! - Other candidates score their perpendicular size divided by
//!   `gap + cross_distance²`, so they fall off quickly as they drift sideways.
//! - Scores that are not strictly positive are dropped; the rest are sorted
//!   from highest to lowest, keeping input order among equal scores.
//!
//! Coordinates follow [`kurbo::Rect`]: `x0` left, `y0` top, `x1` right,
//! `y1` bottom, with y growing downward.
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_focus_scope::direction::{score, Direction};
//!
//! let pivot = Rect::new(0.0, 0.0, 10.0, 10.0);
//! let above = Rect::new(0.0, -20.0, 10.0, -10.0);
//!
//! assert!(score(pivot, above, Direction::Up).is_some());
//! assert!(score(pivot, above, Direction::Down).is_none());
//! ```

use alloc::vec::Vec;

use kurbo::Rect;

use crate::order::DynTree;

/// Score numerator for candidates aligned with the pivot.
///
/// Tunable. It only needs to be large enough that any aligned candidate
/// outranks any off-axis candidate at realistic UI distances.
pub const ALIGNED_SCORE: f64 = 1e9;

/// Compass direction for spatial navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward smaller y.
    Up,
    /// Toward larger x.
    Right,
    /// Toward larger y.
    Down,
    /// Toward smaller x.
    Left,
}

impl Direction {
    /// All four directions, clockwise from [`Direction::Up`].
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// The direction pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }
}

/// Score `candidate` as a move from `pivot` in `direction`.
///
/// Returns `None` when the candidate does not lie strictly in that direction
/// or its score is not strictly positive.
pub fn score(pivot: Rect, candidate: Rect, direction: Direction) -> Option<f64> {
    let (p, c) = (pivot, candidate);
    // (ahead, major gap, candidate cross extent, pivot cross extent)
    let (ahead, major, (c_lo, c_hi), (p_lo, p_hi)) = match direction {
        Direction::Up => (
            c.y1 < p.y1 && c.y0 < p.y0,
            p.y0 - c.y1,
            (c.x0, c.x1),
            (p.x0, p.x1),
        ),
        Direction::Down => (
            c.y0 > p.y0 && c.y1 > p.y1,
            c.y0 - p.y1,
            (c.x0, c.x1),
            (p.x0, p.x1),
        ),
        Direction::Left => (
            c.x1 < p.x1 && c.x0 < p.x0,
            p.x0 - c.x1,
            (c.y0, c.y1),
            (p.y0, p.y1),
        ),
        Direction::Right => (
            c.x0 > p.x0 && c.x1 > p.x1,
            c.x0 - p.x1,
            (c.y0, c.y1),
            (p.y0, p.y1),
        ),
    };
    if !ahead {
        return None;
    }

    let cross_size = c_hi - c_lo;
    // Touching extents count as overlapping.
    let cross_distance = (p_lo - c_hi).max(c_lo - p_hi).max(0.0);

    let score = if cross_distance <= 0.0 {
        ALIGNED_SCORE / major
    } else {
        cross_size / (major + cross_distance * cross_distance)
    };
    // Also rejects NaN.
    (score > 0.0).then_some(score)
}

/// Rank `candidates` that lie in `direction` from `pivot`, best first.
///
/// The pivot itself and candidates without bounds are skipped. Returns an
/// empty list if the pivot has no bounds.
pub fn rank_in_direction<K: Copy + Eq>(
    tree: &DynTree<'_, K>,
    pivot: K,
    candidates: impl IntoIterator<Item = K>,
    direction: Direction,
) -> Vec<K> {
    let Some(pivot_rect) = tree.bounds(pivot) else {
        return Vec::new();
    };

    let mut scored: Vec<(K, f64)> = candidates
        .into_iter()
        .filter(|&c| c != pivot)
        .filter_map(|c| {
            let rect = tree.bounds(c)?;
            Some((c, score(pivot_rect, rect, direction)?))
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(c, _)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIVOT: Rect = Rect::new(0.0, 0.0, 10.0, 10.0);

    #[test]
    fn strictly_above_is_only_up() {
        let above = Rect::new(0.0, -20.0, 10.0, -10.0);
        assert!(score(PIVOT, above, Direction::Up).is_some());
        assert!(score(PIVOT, above, Direction::Down).is_none());
        assert!(score(PIVOT, above, Direction::Left).is_none());
        assert!(score(PIVOT, above, Direction::Right).is_none());
    }

    #[test]
    fn each_direction_accepts_its_mirror() {
        let right = Rect::new(20.0, 0.0, 30.0, 10.0);
        let below = Rect::new(0.0, 20.0, 10.0, 30.0);
        let left = Rect::new(-30.0, 0.0, -20.0, 10.0);
        assert!(score(PIVOT, right, Direction::Right).is_some());
        assert!(score(PIVOT, below, Direction::Down).is_some());
        assert!(score(PIVOT, left, Direction::Left).is_some());
        for dir in Direction::ALL {
            let only = [right, below, left]
                .into_iter()
                .filter(|r| score(PIVOT, *r, dir).is_some())
                .count();
            let expected = usize::from(dir != Direction::Up);
            assert_eq!(only, expected, "{dir:?}");
        }
    }

    #[test]
    fn aligned_candidate_outranks_closer_off_axis_candidate() {
        // Far away but directly to the right.
        let aligned = Rect::new(500.0, 2.0, 510.0, 8.0);
        // Very close, very wide, slightly below the pivot's vertical span.
        let off_axis = Rect::new(11.0, 11.0, 1000.0, 400.0);
        let a = score(PIVOT, aligned, Direction::Right).unwrap();
        let b = score(PIVOT, off_axis, Direction::Right).unwrap();
        assert!(a > b, "aligned {a} should beat off-axis {b}");
    }

    #[test]
    fn nearer_aligned_candidate_wins() {
        let near = Rect::new(0.0, 15.0, 10.0, 25.0);
        let far = Rect::new(0.0, 40.0, 10.0, 50.0);
        let a = score(PIVOT, near, Direction::Down).unwrap();
        let b = score(PIVOT, far, Direction::Down).unwrap();
        assert!(a > b);
    }

    #[test]
    fn off_axis_penalty_grows_with_cross_distance() {
        let slight = Rect::new(12.0, 20.0, 22.0, 30.0);
        let wide = Rect::new(40.0, 20.0, 50.0, 30.0);
        let a = score(PIVOT, slight, Direction::Down).unwrap();
        let b = score(PIVOT, wide, Direction::Down).unwrap();
        assert!(a > b);
    }

    #[test]
    fn overlapping_candidate_is_rejected() {
        // Starts above the pivot but its bottom edge is inside the pivot: the
        // gap along the travel axis is negative.
        let overlapping = Rect::new(0.0, -5.0, 10.0, 5.0);
        assert!(score(PIVOT, overlapping, Direction::Up).is_none());
    }

    #[test]
    fn touching_neighbor_ranks_first() {
        let touching = Rect::new(10.0, 0.0, 20.0, 10.0);
        let s = score(PIVOT, touching, Direction::Right).unwrap();
        assert!(s.is_infinite());
    }

    #[test]
    fn opposite_round_trips() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }
}
