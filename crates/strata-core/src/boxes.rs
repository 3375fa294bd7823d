//! Inclusive index boxes and box lists.

use std::fmt;

use smallvec::SmallVec;

use crate::index::{Dim, IntVector};

/// A rectangular region of index space with inclusive bounds.
///
/// A box is empty when `upper < lower` on any active axis. Inactive
/// axes are normalized to `[0, 0]` so a 2-D box has exactly one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexBox {
    dim: Dim,
    lower: IntVector,
    upper: IntVector,
}

impl IndexBox {
    /// Create a box from inclusive corners.
    pub fn new(dim: Dim, lower: IntVector, upper: IntVector) -> Self {
        let mut lo = lower;
        let mut hi = upper;
        for a in dim.count()..crate::MAX_DIM {
            lo.0[a] = 0;
            hi.0[a] = 0;
        }
        Self {
            dim,
            lower: lo,
            upper: hi,
        }
    }

    /// Box with the given lower corner and cell counts per axis.
    pub fn from_shape(dim: Dim, lower: IntVector, shape: IntVector) -> Self {
        let mut upper = lower;
        for a in dim.axes() {
            upper.0[a] = lower.0[a] + shape.0[a] - 1;
        }
        Self::new(dim, lower, upper)
    }

    /// A canonical empty box.
    pub fn empty(dim: Dim) -> Self {
        Self::new(dim, IntVector::splat(dim, 0), IntVector::splat(dim, -1))
    }

    /// Spatial dimension.
    pub fn dim(&self) -> Dim {
        self.dim
    }

    /// Inclusive lower corner.
    pub fn lower(&self) -> IntVector {
        self.lower
    }

    /// Inclusive upper corner.
    pub fn upper(&self) -> IntVector {
        self.upper
    }

    /// True when the box holds no cells.
    pub fn is_empty(&self) -> bool {
        self.dim.axes().any(|a| self.upper.0[a] < self.lower.0[a])
    }

    /// Number of indices along `axis` (zero if empty along it).
    pub fn extent(&self, axis: usize) -> usize {
        (self.upper.0[axis] - self.lower.0[axis] + 1).max(0) as usize
    }

    /// Extents along all axes; inactive axes report one.
    pub fn shape(&self) -> [usize; crate::MAX_DIM] {
        [self.extent(0), self.extent(1), self.extent(2)]
    }

    /// Total number of indices.
    pub fn num_cells(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.dim.axes().map(|a| self.extent(a)).product()
    }

    /// True when `p` lies inside the box.
    pub fn contains(&self, p: IntVector) -> bool {
        self.dim
            .axes()
            .all(|a| p.0[a] >= self.lower.0[a] && p.0[a] <= self.upper.0[a])
    }

    /// True when `other` is empty or entirely inside this box.
    pub fn contains_box(&self, other: &IndexBox) -> bool {
        other.is_empty() || (self.contains(other.lower) && self.contains(other.upper))
    }

    /// Intersection of two boxes (possibly empty).
    pub fn intersect(&self, other: &IndexBox) -> IndexBox {
        let mut lo = self.lower;
        let mut hi = self.upper;
        for a in self.dim.axes() {
            lo.0[a] = lo.0[a].max(other.lower.0[a]);
            hi.0[a] = hi.0[a].min(other.upper.0[a]);
        }
        IndexBox::new(self.dim, lo, hi)
    }

    /// True when the boxes share at least one index.
    pub fn intersects(&self, other: &IndexBox) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Grow (or shrink, for negative entries) by `width` on both sides.
    pub fn grow(&self, width: IntVector) -> IndexBox {
        let mut lo = self.lower;
        let mut hi = self.upper;
        for a in self.dim.axes() {
            lo.0[a] -= width.0[a];
            hi.0[a] += width.0[a];
        }
        IndexBox::new(self.dim, lo, hi)
    }

    /// Translate by `offset`.
    pub fn shift(&self, offset: IntVector) -> IndexBox {
        IndexBox::new(self.dim, self.lower + offset, self.upper + offset)
    }

    /// Fine-index box covering exactly the cells of this box refined by `ratio`.
    pub fn refine(&self, ratio: IntVector) -> IndexBox {
        let mut lo = self.lower;
        let mut hi = self.upper;
        for a in self.dim.axes() {
            lo.0[a] *= ratio.0[a];
            hi.0[a] = (hi.0[a] + 1) * ratio.0[a] - 1;
        }
        IndexBox::new(self.dim, lo, hi)
    }

    /// Smallest coarse-index box whose refinement covers this box.
    pub fn coarsen(&self, ratio: IntVector) -> IndexBox {
        IndexBox::new(
            self.dim,
            self.lower.floor_div(ratio, self.dim),
            self.upper.floor_div(ratio, self.dim),
        )
    }

    /// Face-index box for faces normal to `axis` bounding the cells of this box.
    ///
    /// Face `i` along `axis` is the lower face of cell `i`.
    pub fn face_box(&self, axis: usize) -> IndexBox {
        let mut hi = self.upper;
        hi.0[axis] += 1;
        IndexBox::new(self.dim, self.lower, hi)
    }

    /// Cells of this box that are not in `other`, as disjoint boxes.
    pub fn remove(&self, other: &IndexBox) -> BoxList {
        let mut out = BoxList::new();
        let isect = self.intersect(other);
        if isect.is_empty() {
            out.push(*self);
            return out;
        }
        let mut rem = *self;
        for a in self.dim.axes() {
            if rem.lower.0[a] < isect.lower.0[a] {
                let mut piece = rem;
                piece.upper.0[a] = isect.lower.0[a] - 1;
                out.push(piece);
                rem.lower.0[a] = isect.lower.0[a];
            }
            if rem.upper.0[a] > isect.upper.0[a] {
                let mut piece = rem;
                piece.lower.0[a] = isect.upper.0[a] + 1;
                out.push(piece);
                rem.upper.0[a] = isect.upper.0[a];
            }
        }
        out
    }

    /// Iterate over every index in the box, axis 0 fastest.
    pub fn iter(&self) -> BoxIter {
        BoxIter {
            bx: *self,
            next: if self.is_empty() {
                None
            } else {
                Some(self.lower)
            },
        }
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Iterator over the indices of an [`IndexBox`].
pub struct BoxIter {
    bx: IndexBox,
    next: Option<IntVector>,
}

impl Iterator for BoxIter {
    type Item = IntVector;

    fn next(&mut self) -> Option<IntVector> {
        let current = self.next?;
        let mut p = current;
        let mut advanced = false;
        for a in self.bx.dim.axes() {
            if p.0[a] < self.bx.upper.0[a] {
                p.0[a] += 1;
                advanced = true;
                break;
            }
            p.0[a] = self.bx.lower.0[a];
        }
        self.next = advanced.then_some(p);
        Some(current)
    }
}

/// An unordered collection of disjoint boxes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxList(SmallVec<[IndexBox; 8]>);

impl BoxList {
    /// An empty list.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Add a box; empty boxes are dropped.
    pub fn push(&mut self, bx: IndexBox) {
        if !bx.is_empty() {
            self.0.push(bx);
        }
    }

    /// Remove the cells of `other` from every box in the list.
    pub fn remove(&mut self, other: &IndexBox) {
        let mut out = SmallVec::new();
        for bx in &self.0 {
            out.extend(bx.remove(other).0);
        }
        self.0 = out;
    }

    /// True when the list covers no cells.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of boxes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of cells covered.
    pub fn num_cells(&self) -> usize {
        self.0.iter().map(IndexBox::num_cells).sum()
    }

    /// Iterate over the boxes.
    pub fn iter(&self) -> impl Iterator<Item = &IndexBox> {
        self.0.iter()
    }
}

impl From<IndexBox> for BoxList {
    fn from(bx: IndexBox) -> Self {
        let mut out = Self::new();
        out.push(bx);
        out
    }
}
