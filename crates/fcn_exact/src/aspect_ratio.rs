//! Enumeration of candidate layout shapes.

use fcn_layout::AspectRatio;
use std::cmp::Ordering;

/// Largest tile count whose factorizations fit into `u16` sides.
const MAX_AREA: u64 = u16::MAX as u64 * u16::MAX as u64;

/// Walks all aspect ratios in non-decreasing order of their area.
///
/// For each area, every factorization `x * y` is produced with ascending `x`,
/// so both orientations of a non-square shape appear. Areas without a
/// factorization into `u16` sides are skipped. Two iterators started at the
/// same area always yield the same sequence.
///
/// Comparisons against a `u64` compare the area of the current shape, which
/// lets callers write `while it <= bound`. Comparisons between iterators
/// compare their positions in the common sequence.
#[derive(Clone, Debug)]
pub struct AspectRatioIter {
    area: u64,
    factors: Vec<AspectRatio>,
    pos: usize,
}

impl AspectRatioIter {
    /// Starts at the first area `>= start` that has a factorization.
    pub fn new(start: u64) -> Self {
        let mut it = Self {
            area: start.max(1),
            factors: Vec::new(),
            pos: 0,
        };
        it.factors = factorize(it.area);
        if it.factors.is_empty() {
            it.advance_area();
        }
        it
    }

    /// Returns the shape the next call to [`next`](Iterator::next) yields.
    pub fn current(&self) -> Option<AspectRatio> {
        self.factors.get(self.pos).copied()
    }

    /// Returns the area of the current shape, or a value past every valid
    /// area once exhausted.
    pub fn area(&self) -> u64 {
        self.area
    }

    fn advance_area(&mut self) {
        self.pos = 0;
        loop {
            if self.area >= MAX_AREA {
                self.area = MAX_AREA + 1;
                self.factors.clear();
                return;
            }
            self.area += 1;
            self.factors = factorize(self.area);
            if !self.factors.is_empty() {
                return;
            }
        }
    }
}

impl Iterator for AspectRatioIter {
    type Item = AspectRatio;

    fn next(&mut self) -> Option<AspectRatio> {
        let ar = self.current()?;
        self.pos += 1;
        if self.pos == self.factors.len() {
            self.advance_area();
        }
        Some(ar)
    }
}

impl PartialEq<u64> for AspectRatioIter {
    fn eq(&self, area: &u64) -> bool {
        self.area == *area
    }
}

impl PartialOrd<u64> for AspectRatioIter {
    fn partial_cmp(&self, area: &u64) -> Option<Ordering> {
        Some(self.area.cmp(area))
    }
}

impl PartialEq for AspectRatioIter {
    fn eq(&self, other: &Self) -> bool {
        self.area == other.area && self.pos == other.pos
    }
}

impl PartialOrd for AspectRatioIter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some((self.area, self.pos).cmp(&(other.area, other.pos)))
    }
}

/// Returns all `x * y == n` with both sides in `u16`, ordered by `x`.
fn factorize(n: u64) -> Vec<AspectRatio> {
    let mut pairs = Vec::new();
    let mut x = 1u64;
    while x * x <= n {
        if n % x == 0 {
            let y = n / x;
            if let (Ok(a), Ok(b)) = (u16::try_from(x), u16::try_from(y)) {
                pairs.push(AspectRatio::new(a, b));
                if a != b {
                    pairs.push(AspectRatio::new(b, a));
                }
            }
        }
        x += 1;
    }
    pairs.sort_by_key(|ar| ar.width);
    pairs
}
