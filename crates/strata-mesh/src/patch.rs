//! Patches and the data they own.

use strata_core::{ArrayData, Centering, Dim, FieldDef, IndexBox, IntVector, SlotId, MAX_DIM};

/// Cell-centered data over a patch box padded by ghost cells.
#[derive(Clone, Debug, PartialEq)]
pub struct CellData {
    interior: IndexBox,
    ghosts: IntVector,
    array: ArrayData,
}

impl CellData {
    /// Zeroed storage over `interior` grown by `ghosts`.
    pub fn new(interior: IndexBox, ghosts: IntVector, depth: usize) -> Self {
        Self {
            interior,
            ghosts,
            array: ArrayData::new(interior.grow(ghosts), depth),
        }
    }

    /// The patch box the data belongs to.
    pub fn interior(&self) -> &IndexBox {
        &self.interior
    }

    /// Ghost width per axis.
    pub fn ghosts(&self) -> IntVector {
        self.ghosts
    }

    /// Interior plus ghost cells.
    pub fn ghost_box(&self) -> &IndexBox {
        self.array.data_box()
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.array.depth()
    }

    /// True when the ghost width is the same on every axis.
    pub fn has_uniform_ghost_width(&self) -> bool {
        self.ghosts.is_uniform(self.interior.dim())
    }

    /// Backing array.
    pub fn array(&self) -> &ArrayData {
        &self.array
    }

    /// Mutable backing array.
    pub fn array_mut(&mut self) -> &mut ArrayData {
        &mut self.array
    }
}

/// Face-centered data: one array per face orientation.
///
/// The array for `axis` covers `ghost_box.face_box(axis)`; face `i` is
/// the lower face of cell `i` along that axis.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceData {
    interior: IndexBox,
    ghosts: IntVector,
    arrays: Vec<ArrayData>,
}

impl FaceData {
    /// Zeroed storage for every orientation.
    pub fn new(interior: IndexBox, ghosts: IntVector, depth: usize) -> Self {
        let ghost_box = interior.grow(ghosts);
        let arrays = interior
            .dim()
            .axes()
            .map(|a| ArrayData::new(ghost_box.face_box(a), depth))
            .collect();
        Self {
            interior,
            ghosts,
            arrays,
        }
    }

    /// The patch box the data belongs to.
    pub fn interior(&self) -> &IndexBox {
        &self.interior
    }

    /// Ghost width per axis.
    pub fn ghosts(&self) -> IntVector {
        self.ghosts
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.arrays.first().map_or(0, ArrayData::depth)
    }

    /// True when the ghost width is the same on every axis.
    pub fn has_uniform_ghost_width(&self) -> bool {
        self.ghosts.is_uniform(self.interior.dim())
    }

    /// Array of faces normal to `axis`.
    pub fn axis(&self, axis: usize) -> &ArrayData {
        &self.arrays[axis]
    }

    /// Mutable array of faces normal to `axis`.
    pub fn axis_mut(&mut self, axis: usize) -> &mut ArrayData {
        &mut self.arrays[axis]
    }

    /// All orientations, indexed by axis.
    pub fn arrays(&self) -> &[ArrayData] {
        &self.arrays
    }

    /// All orientations, mutable.
    pub fn arrays_mut(&mut self) -> &mut [ArrayData] {
        &mut self.arrays
    }
}

/// Storage for one slot on one patch.
#[derive(Clone, Debug, PartialEq)]
pub enum PatchData {
    /// Cell-centered values.
    Cell(CellData),
    /// Face-centered values.
    Face(FaceData),
}

impl PatchData {
    /// Allocate zeroed storage for `def` on `interior`.
    pub fn allocate(def: &FieldDef, interior: IndexBox, ghosts: IntVector) -> Self {
        match def.centering {
            Centering::Cell => Self::Cell(CellData::new(interior, ghosts, def.depth)),
            Centering::Face => Self::Face(FaceData::new(interior, ghosts, def.depth)),
        }
    }

    /// Centering of the stored values.
    pub fn centering(&self) -> Centering {
        match self {
            Self::Cell(_) => Centering::Cell,
            Self::Face(_) => Centering::Face,
        }
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        match self {
            Self::Cell(c) => c.depth(),
            Self::Face(f) => f.depth(),
        }
    }

    /// Ghost width per axis.
    pub fn ghosts(&self) -> IntVector {
        match self {
            Self::Cell(c) => c.ghosts(),
            Self::Face(f) => f.ghosts(),
        }
    }

    /// Cell view, if cell-centered.
    pub fn as_cell(&self) -> Option<&CellData> {
        match self {
            Self::Cell(c) => Some(c),
            Self::Face(_) => None,
        }
    }

    /// Mutable cell view, if cell-centered.
    pub fn as_cell_mut(&mut self) -> Option<&mut CellData> {
        match self {
            Self::Cell(c) => Some(c),
            Self::Face(_) => None,
        }
    }

    /// Face view, if face-centered.
    pub fn as_face(&self) -> Option<&FaceData> {
        match self {
            Self::Face(f) => Some(f),
            Self::Cell(_) => None,
        }
    }

    /// Mutable face view, if face-centered.
    pub fn as_face_mut(&mut self) -> Option<&mut FaceData> {
        match self {
            Self::Face(f) => Some(f),
            Self::Cell(_) => None,
        }
    }
}

/// Read access to every slot of a patch except one that is mutably
/// borrowed. Returned by [`Patch::split_slot_mut`].
pub struct OtherSlots<'a> {
    before: &'a [Option<PatchData>],
    after: &'a [Option<PatchData>],
    hole: usize,
}

impl<'a> OtherSlots<'a> {
    /// Data in `slot`, or `None` if unallocated or the borrowed slot.
    pub fn get(&self, slot: SlotId) -> Option<&'a PatchData> {
        let idx = slot.index();
        match idx.cmp(&self.hole) {
            std::cmp::Ordering::Less => self.before.get(idx)?.as_ref(),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => self.after.get(idx - self.hole - 1)?.as_ref(),
        }
    }

    /// Cell data in `slot`.
    pub fn cell(&self, slot: SlotId) -> Option<&'a CellData> {
        self.get(slot)?.as_cell()
    }

    /// Face data in `slot`.
    pub fn face(&self, slot: SlotId) -> Option<&'a FaceData> {
        self.get(slot)?.as_face()
    }
}

/// A rectangular block of cells on one level together with its data.
#[derive(Clone, Debug)]
pub struct Patch {
    level: usize,
    index: usize,
    bx: IndexBox,
    dx: [f64; MAX_DIM],
    x_lower: [f64; MAX_DIM],
    data: Vec<Option<PatchData>>,
}

impl Patch {
    /// A patch with no allocated slots.
    ///
    /// `x_lower` is the physical position of the lower corner of `bx`.
    pub fn new(
        level: usize,
        index: usize,
        bx: IndexBox,
        dx: [f64; MAX_DIM],
        x_lower: [f64; MAX_DIM],
    ) -> Self {
        Self {
            level,
            index,
            bx,
            dx,
            x_lower,
            data: Vec::new(),
        }
    }

    /// Level number the patch belongs to.
    pub fn level_number(&self) -> usize {
        self.level
    }

    /// Position of the patch within its level.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Interior cells.
    pub fn index_box(&self) -> &IndexBox {
        &self.bx
    }

    /// Spatial dimension.
    pub fn dim(&self) -> Dim {
        self.bx.dim()
    }

    /// Cell spacing.
    pub fn dx(&self) -> [f64; MAX_DIM] {
        self.dx
    }

    /// Physical lower corner of the interior.
    pub fn x_lower(&self) -> [f64; MAX_DIM] {
        self.x_lower
    }

    /// Physical center of cell `p` (which may be a ghost cell).
    pub fn cell_center(&self, p: IntVector) -> [f64; MAX_DIM] {
        let mut x = [0.0; MAX_DIM];
        for a in self.dim().axes() {
            let offset = f64::from(p[a] - self.bx.lower()[a]) + 0.5;
            x[a] = self.x_lower[a] + offset * self.dx[a];
        }
        x
    }

    /// Physical center of face `p` normal to `axis`.
    pub fn face_center(&self, axis: usize, p: IntVector) -> [f64; MAX_DIM] {
        let mut x = self.cell_center(p);
        x[axis] -= 0.5 * self.dx[axis];
        x
    }

    /// Allocate zeroed storage for `slot`, replacing any existing data.
    pub fn allocate(&mut self, slot: SlotId, def: &FieldDef, ghosts: IntVector) {
        let idx = slot.index();
        if self.data.len() <= idx {
            self.data.resize_with(idx + 1, || None);
        }
        self.data[idx] = Some(PatchData::allocate(def, self.bx, ghosts));
    }

    /// Release storage for `slot`.
    pub fn deallocate(&mut self, slot: SlotId) {
        if let Some(entry) = self.data.get_mut(slot.index()) {
            *entry = None;
        }
    }

    /// True when `slot` has storage on this patch.
    pub fn is_allocated(&self, slot: SlotId) -> bool {
        self.data(slot).is_some()
    }

    /// Data in `slot`.
    pub fn data(&self, slot: SlotId) -> Option<&PatchData> {
        self.data.get(slot.index())?.as_ref()
    }

    /// Mutable data in `slot`.
    pub fn data_mut(&mut self, slot: SlotId) -> Option<&mut PatchData> {
        self.data.get_mut(slot.index())?.as_mut()
    }

    /// Cell data in `slot`.
    pub fn cell(&self, slot: SlotId) -> Option<&CellData> {
        self.data(slot)?.as_cell()
    }

    /// Mutable cell data in `slot`.
    pub fn cell_mut(&mut self, slot: SlotId) -> Option<&mut CellData> {
        self.data_mut(slot)?.as_cell_mut()
    }

    /// Face data in `slot`.
    pub fn face(&self, slot: SlotId) -> Option<&FaceData> {
        self.data(slot)?.as_face()
    }

    /// Mutable face data in `slot`.
    pub fn face_mut(&mut self, slot: SlotId) -> Option<&mut FaceData> {
        self.data_mut(slot)?.as_face_mut()
    }

    /// Borrow `slot` mutably while keeping read access to the others.
    pub fn split_slot_mut(&mut self, slot: SlotId) -> Option<(&mut PatchData, OtherSlots<'_>)> {
        let hole = slot.index();
        if hole >= self.data.len() {
            return None;
        }
        let (before, rest) = self.data.split_at_mut(hole);
        let (target, after) = rest.split_first_mut()?;
        let target = target.as_mut()?;
        Some((
            target,
            OtherSlots {
                before,
                after,
                hole,
            },
        ))
    }
}
