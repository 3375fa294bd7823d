//! Dense box-indexed storage.
//!
//! [`ArrayData`] holds `depth` components over an [`IndexBox`]. Values
//! are laid out component-major, axis 0 fastest within a component.

use crate::boxes::IndexBox;
use crate::index::IntVector;

/// Dense multi-component array addressed by index-space points.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayData {
    data_box: IndexBox,
    depth: usize,
    strides: [usize; 3],
    data: Vec<f64>,
}

impl ArrayData {
    /// Zero-initialized storage over `data_box`.
    pub fn new(data_box: IndexBox, depth: usize) -> Self {
        let shape = data_box.shape();
        let strides = [1, shape[0], shape[0] * shape[1]];
        Self {
            data_box,
            depth,
            strides,
            data: vec![0.0; data_box.num_cells() * depth],
        }
    }

    /// Region of index space backed by storage.
    pub fn data_box(&self) -> &IndexBox {
        &self.data_box
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn offset(&self, p: IntVector, d: usize) -> usize {
        debug_assert!(
            self.data_box.contains(p),
            "index {p} outside data box {}",
            self.data_box
        );
        debug_assert!(d < self.depth, "component {d} out of range");
        let lo = self.data_box.lower();
        let mut off = d * self.data_box.num_cells();
        for a in self.data_box.dim().axes() {
            off += (p[a] - lo[a]) as usize * self.strides[a];
        }
        off
    }

    /// Value of component `d` at `p`.
    ///
    /// `p` must lie in [`data_box`](Self::data_box).
    pub fn value(&self, p: IntVector, d: usize) -> f64 {
        self.data[self.offset(p, d)]
    }

    /// Value of component `d` at `p`, or `None` outside the data box.
    pub fn try_value(&self, p: IntVector, d: usize) -> Option<f64> {
        self.data_box.contains(p).then(|| self.value(p, d))
    }

    /// Overwrite component `d` at `p`.
    pub fn set_value(&mut self, p: IntVector, d: usize, v: f64) {
        let off = self.offset(p, d);
        self.data[off] = v;
    }

    /// Mutable reference to component `d` at `p`.
    pub fn value_mut(&mut self, p: IntVector, d: usize) -> &mut f64 {
        let off = self.offset(p, d);
        &mut self.data[off]
    }

    /// Set every component at every point.
    pub fn fill(&mut self, v: f64) {
        self.data.fill(v);
    }

    /// Set component `d` on the part of `region` inside the data box.
    pub fn fill_region(&mut self, region: &IndexBox, d: usize, v: f64) {
        let region = region.intersect(&self.data_box);
        for p in region.iter() {
            self.set_value(p, d, v);
        }
    }

    /// Contiguous values of one component.
    pub fn component(&self, d: usize) -> &[f64] {
        let n = self.data_box.num_cells();
        &self.data[d * n..(d + 1) * n]
    }

    /// Raw storage in layout order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy all components from `src` into `region`, reading `src` at
    /// `p - shift` for each destination point `p`.
    ///
    /// The copy is clipped to this array's data box and to the shifted
    /// source data box.
    pub fn copy_from(&mut self, src: &ArrayData, region: &IndexBox, shift: IntVector) {
        let region = region
            .intersect(&self.data_box)
            .intersect(&src.data_box.shift(shift));
        let depth = self.depth.min(src.depth);
        for d in 0..depth {
            for p in region.iter() {
                let v = src.value(p - shift, d);
                self.set_value(p, d, v);
            }
        }
    }

    /// Same as [`copy_from`](Self::copy_from) with this array as its own
    /// source. Values are gathered before any are written.
    pub fn copy_within(&mut self, region: &IndexBox, shift: IntVector) {
        let region = region
            .intersect(&self.data_box)
            .intersect(&self.data_box.shift(shift));
        let mut staged = Vec::with_capacity(region.num_cells() * self.depth);
        for d in 0..self.depth {
            for p in region.iter() {
                staged.push(self.value(p - shift, d));
            }
        }
        let mut values = staged.into_iter();
        for d in 0..self.depth {
            for p in region.iter() {
                if let Some(v) = values.next() {
                    self.set_value(p, d, v);
                }
            }
        }
    }
}
