//! The convective operator: ghost fill, boundary treatment, face
//! interpolation, flux synchronization and differencing over a range of
//! hierarchy levels.

use std::ops::RangeInclusive;
use std::sync::Arc;

use strata_core::{
    Centering, ConfigError, Dim, FieldDef, IntVector, NoopTimer, PhaseGuard, PhaseTimer,
    PreconditionViolation, SlotId, MAX_DIM,
};
use strata_kernels::{advect_derivative, advect_flux, ctof_interp, ftoc_div, ftoc_div_add};
use strata_mesh::{FieldRegistry, MeshError, Patch, PatchData, PatchHierarchy, SharedHierarchy, SlotInfo};
use strata_transfer::{
    CartExtrapPhysBdryOp, CoarsenAlgorithm, CoarsenOperator, CoarsenSchedule, ExtrapolationType,
    OperatorRegistry, PhysicalBoundaryStrategy, RefineAlgorithm, RefineOperator, RefineSchedule,
};

use crate::bc::{BcCoefs, InflowBoundary};
use crate::config::{ConvectiveConfig, DifferencingForm};
use crate::error::ConvectiveError;
use crate::vector::HierarchyVector;

const REFINE_OP: &str = "CONSERVATIVE_LINEAR_REFINE";
const COARSEN_OP: &str = "CONSERVATIVE_COARSEN";

/// Schedules and level range captured by
/// [`ConvectiveOperator::initialize_operator_state`].
struct OperatorState {
    hierarchy: SharedHierarchy,
    coarsest: usize,
    finest: usize,
    refine_alg: RefineAlgorithm,
    /// One per level, coarsest first.
    refine_scheds: Vec<RefineSchedule>,
    /// One per fine level `coarsest + 1 ..= finest`, coarsest first.
    coarsen_scheds: Vec<CoarsenSchedule>,
}

impl OperatorState {
    fn levels(&self) -> RangeInclusive<usize> {
        self.coarsest..=self.finest
    }
}

/// Computes `dq/dt = -N(u, q)` for a cell-centered scalar `q` advected by
/// a face-centered velocity `u` on every level of a hierarchy range.
///
/// `N` is `u · grad q` (ADVECTIVE), `div(u q)` (CONSERVATIVE) or their
/// mean (SKEW_SYMMETRIC). Each application:
///
/// 1. fills a one-cell ghost layer of scratch data, coarsest level first,
///    extrapolating at outflow boundaries unless the extrapolation type
///    is NONE;
/// 2. applies the Robin conditions at inflow boundaries (at every
///    boundary when the extrapolation type is NONE);
/// 3. interpolates to faces and, for forms that need them, forms fluxes;
/// 4. replaces coarse face data under finer levels with the average of
///    the coincident fine faces, finest level first;
/// 5. differences into the output.
///
/// The operator is uninitialized after construction.
/// [`initialize_operator_state`](Self::initialize_operator_state) binds
/// it to a hierarchy range and allocates scratch storage;
/// [`deallocate_operator_state`](Self::deallocate_operator_state) (or
/// drop) releases it.
pub struct ConvectiveOperator {
    name: String,
    config: ConvectiveConfig,
    q_def: FieldDef,
    bc_coefs: BcCoefs,
    homogeneous_bc: bool,
    solution_time: f64,
    u_slot: Option<SlotId>,
    scratch: SlotInfo,
    q_extrap: SlotInfo,
    q_flux: SlotInfo,
    refine_op: Arc<dyn RefineOperator>,
    coarsen_op: Arc<dyn CoarsenOperator>,
    timer: Arc<dyn PhaseTimer>,
    state: Option<OperatorState>,
}

impl ConvectiveOperator {
    /// Register scratch storage for `q_field` and resolve the transfer
    /// operators.
    ///
    /// Slots are registered under the context `"<name>::CONTEXT"`: the
    /// cell scratch copy of `q_field` with one ghost cell, and face
    /// fields `"<name>::q_extrap"` and `"<name>::q_flux"` with none.
    /// Registrations that already exist are reused.
    pub fn new(
        name: &str,
        q_field: FieldDef,
        dim: Dim,
        config: ConvectiveConfig,
        registry: &mut FieldRegistry,
        operators: &OperatorRegistry,
    ) -> Result<Self, ConvectiveError> {
        if q_field.centering != Centering::Cell {
            return Err(PreconditionViolation::CenteringMismatch {
                what: format!("transported field `{}`", q_field.name),
                expected: Centering::Cell,
                found: q_field.centering,
            }
            .into());
        }
        let depth = q_field.depth;
        let context = format!("{name}::CONTEXT");
        let scratch = registry.register(q_field.clone(), &context, IntVector::splat(dim, 1))?;
        let q_extrap = registry.register(
            FieldDef::face(format!("{name}::q_extrap"), depth),
            &context,
            IntVector::ZERO,
        )?;
        let q_flux = registry.register(
            FieldDef::face(format!("{name}::q_flux"), depth),
            &context,
            IntVector::ZERO,
        )?;
        let refine_op = operators.lookup_refine(&scratch.def, REFINE_OP)?;
        let coarsen_op = operators.lookup_coarsen(&q_extrap.def, COARSEN_OP)?;
        log::debug!(
            "{name}: {} form, {} outflow extrapolation, scratch slot {}",
            config.difference_form,
            config.outflow_bdry_extrap_type,
            scratch.slot
        );
        Ok(Self {
            name: name.to_string(),
            config,
            q_def: q_field,
            bc_coefs: vec![None; depth],
            homogeneous_bc: false,
            solution_time: 0.0,
            u_slot: None,
            scratch,
            q_extrap,
            q_flux,
            refine_op,
            coarsen_op,
            timer: Arc::new(NoopTimer),
            state: None,
        })
    }

    /// Use one boundary coefficient strategy per component of the
    /// transported field. `None` entries mean homogeneous Neumann.
    pub fn with_bc_coefs(mut self, bc_coefs: BcCoefs) -> Result<Self, ConvectiveError> {
        if bc_coefs.len() != self.q_def.depth {
            return Err(ConvectiveError::BcCoefCount {
                expected: self.q_def.depth,
                found: bc_coefs.len(),
            });
        }
        self.bc_coefs = bc_coefs;
        Ok(self)
    }

    /// Report phases to `timer`.
    pub fn with_timer(mut self, timer: Arc<dyn PhaseTimer>) -> Self {
        self.timer = timer;
        self
    }

    /// Face-centered, depth-one velocity used by every application.
    pub fn set_advection_velocity(&mut self, u_slot: SlotId) {
        self.u_slot = Some(u_slot);
    }

    /// Time at which boundary coefficients are evaluated.
    pub fn set_solution_time(&mut self, time: f64) {
        self.solution_time = time;
    }

    /// When set, boundary conditions use `g = 0`.
    pub fn set_homogeneous_bc(&mut self, homogeneous: bool) {
        self.homogeneous_bc = homogeneous;
    }

    /// Object name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration given at construction.
    pub fn config(&self) -> &ConvectiveConfig {
        &self.config
    }

    /// Cell scratch slot holding the ghost-filled transported field.
    pub fn scratch_slot(&self) -> SlotId {
        self.scratch.slot
    }

    /// Face slot holding interpolated values.
    pub fn q_extrap_slot(&self) -> SlotId {
        self.q_extrap.slot
    }

    /// Face slot holding fluxes. Allocated only for forms that use it.
    pub fn q_flux_slot(&self) -> SlotId {
        self.q_flux.slot
    }

    /// True between initialization and deallocation.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn owned_slots(&self) -> impl Iterator<Item = &SlotInfo> {
        let flux = self.config.difference_form.needs_flux().then_some(&self.q_flux);
        [&self.scratch, &self.q_extrap].into_iter().chain(flux)
    }

    // ── Lifecycle ─────────────────────────────────────────────────

    /// Bind the operator to the hierarchy and level range of `input`,
    /// build its transfer schedules and allocate scratch storage on
    /// levels where it is missing.
    ///
    /// Calling this while initialized tears the previous state down
    /// first. Component 0 of `input` is the ghost-fill source the
    /// schedules are built with.
    pub fn initialize_operator_state(
        &mut self,
        input: &HierarchyVector,
        output: &HierarchyVector,
    ) -> Result<(), ConvectiveError> {
        let timer = Arc::clone(&self.timer);
        let _phase = PhaseGuard::new(timer.as_ref(), "initialize_operator_state");

        if self.state.is_some() {
            self.deallocate_operator_state()?;
        }
        input.check_compatible(output)?;
        let q_in = input.component(0).ok_or(ConfigError::MissingInput {
            what: "input vector component",
        })?;
        if q_in.def.centering != Centering::Cell {
            return Err(PreconditionViolation::CenteringMismatch {
                what: format!("input component `{}`", q_in.def.name),
                expected: Centering::Cell,
                found: q_in.def.centering,
            }
            .into());
        }
        if q_in.def.depth != self.q_def.depth {
            return Err(PreconditionViolation::DepthMismatch {
                dst: self.q_def.depth,
                src: q_in.def.depth,
            }
            .into());
        }

        let hierarchy = Arc::clone(input.hierarchy());
        let (coarsest, finest) = (input.coarsest_level_number(), input.finest_level_number());
        let mut h = hierarchy.write().map_err(|_| MeshError::Poisoned)?;
        if finest >= h.num_levels() {
            return Err(MeshError::LevelOutOfRange {
                level: finest,
                num_levels: h.num_levels(),
            }
            .into());
        }

        let form = self.config.difference_form;
        let mut coarsen_alg = CoarsenAlgorithm::new();
        if form.needs_face_values() {
            coarsen_alg.register_coarsen(self.q_extrap.slot, self.q_extrap.slot, Arc::clone(&self.coarsen_op));
        }
        if form.needs_flux() {
            coarsen_alg.register_coarsen(self.q_flux.slot, self.q_flux.slot, Arc::clone(&self.coarsen_op));
        }
        let coarsen_scheds = (coarsest + 1..=finest)
            .map(|ln| coarsen_alg.create_schedule(&h, ln))
            .collect::<Result<Vec<_>, _>>()?;

        let mut refine_alg = RefineAlgorithm::new();
        refine_alg.register_refine(
            self.scratch.slot,
            q_in.slot,
            self.scratch.clone(),
            Arc::clone(&self.refine_op),
        );
        let strategy: Option<Arc<dyn PhysicalBoundaryStrategy>> = match self.config.outflow_bdry_extrap_type {
            ExtrapolationType::None => None,
            kind => Some(Arc::new(CartExtrapPhysBdryOp::new(vec![self.scratch.slot], kind))),
        };
        let refine_scheds = (coarsest..=finest)
            .map(|ln| refine_alg.create_schedule(&h, ln, strategy.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        for ln in coarsest..=finest {
            let level = h.level_mut(ln)?;
            for info in self.owned_slots() {
                if !level.check_allocated(info.slot) {
                    level.allocate_patch_data(info);
                }
            }
        }
        drop(h);

        log::debug!("{}: initialized on levels {coarsest}..={finest}", self.name);
        self.state = Some(OperatorState {
            hierarchy,
            coarsest,
            finest,
            refine_alg,
            refine_scheds,
            coarsen_scheds,
        });
        Ok(())
    }

    /// Release scratch storage on every level in range and return to the
    /// uninitialized state. A no-op when not initialized.
    pub fn deallocate_operator_state(&mut self) -> Result<(), ConvectiveError> {
        let timer = Arc::clone(&self.timer);
        let _phase = PhaseGuard::new(timer.as_ref(), "deallocate_operator_state");

        let Some(state) = self.state.take() else {
            return Ok(());
        };
        let mut h = state.hierarchy.write().map_err(|_| MeshError::Poisoned)?;
        for ln in state.levels() {
            let level = h.level_mut(ln)?;
            for slot in [self.scratch.slot, self.q_extrap.slot, self.q_flux.slot] {
                if level.check_allocated(slot) {
                    level.deallocate_patch_data(slot);
                }
            }
        }
        log::debug!("{}: deallocated", self.name);
        Ok(())
    }

    // ── Application ───────────────────────────────────────────────

    /// Compute `dq/dt` of the field in `q_slot` into `n_slot` on every
    /// level in range.
    ///
    /// Layouts of the source, output and velocity are checked on every
    /// patch before anything is written.
    pub fn apply_convective_operator(
        &mut self,
        q_slot: SlotId,
        n_slot: SlotId,
    ) -> Result<(), ConvectiveError> {
        let timer = Arc::clone(&self.timer);
        let _phase = PhaseGuard::new(timer.as_ref(), "apply_convective_operator");

        let mut state = self.state.take().ok_or(ConfigError::NotInitialized {
            operation: "apply_convective_operator",
        })?;
        let result = self.apply_levels(&mut state, q_slot, n_slot);
        self.state = Some(state);
        result
    }

    fn apply_levels(
        &self,
        state: &mut OperatorState,
        q_slot: SlotId,
        n_slot: SlotId,
    ) -> Result<(), ConvectiveError> {
        let u_slot = self.u_slot.ok_or(ConfigError::MissingInput {
            what: "advection velocity",
        })?;
        let hierarchy = Arc::clone(&state.hierarchy);
        let mut h = hierarchy.write().map_err(|_| MeshError::Poisoned)?;
        self.check_inputs(&h, state.levels(), q_slot, n_slot, u_slot)?;

        // Ghost fill from the caller's source, then point the schedules
        // back at the input vector they were built with.
        let mut source = RefineAlgorithm::new();
        source.register_refine(
            self.scratch.slot,
            q_slot,
            self.scratch.clone(),
            Arc::clone(&self.refine_op),
        );
        for schedule in &mut state.refine_scheds {
            source.reset_schedule(schedule)?;
            let filled = schedule.fill_data(&mut h, self.solution_time);
            state.refine_alg.reset_schedule(schedule)?;
            filled?;
        }

        let geometry = h.geometry();
        let mut periodic = [false; MAX_DIM];
        for (axis, flag) in periodic.iter_mut().enumerate().take(geometry.dim().count()) {
            *flag = geometry.is_periodic(axis);
        }
        let inflow = InflowBoundary {
            coefs: &self.bc_coefs,
            inflow_only: self.config.outflow_bdry_extrap_type != ExtrapolationType::None,
            homogeneous: self.homogeneous_bc,
            time: self.solution_time,
        };
        for ln in state.levels() {
            log::trace!("{}: face values on level {ln}", self.name);
            let level = h.level_mut(ln)?;
            let domain = *level.domain();
            for patch in level.patches_mut() {
                inflow.apply(patch, self.scratch.slot, u_slot, &domain, periodic)?;
                self.interpolate_to_faces(patch, u_slot)?;
            }
        }

        for schedule in state.coarsen_scheds.iter().rev() {
            log::trace!("{}: synchronizing level {}", self.name, schedule.fine_level_number());
            schedule.coarsen_data(&mut h)?;
        }

        for ln in state.levels() {
            let level = h.level_mut(ln)?;
            for patch in level.patches_mut() {
                self.difference(patch, n_slot, u_slot)?;
            }
        }
        Ok(())
    }

    fn check_inputs(
        &self,
        h: &PatchHierarchy,
        levels: RangeInclusive<usize>,
        q_slot: SlotId,
        n_slot: SlotId,
        u_slot: SlotId,
    ) -> Result<(), ConvectiveError> {
        let depth = self.q_def.depth;
        for ln in levels {
            let level = h.level(ln)?;
            for slot in [q_slot, n_slot, u_slot] {
                level.require_allocated(slot)?;
            }
            for patch in level.patches() {
                let dim = patch.dim();
                let i = patch.index();
                expect_layout(level.patch_data(i, q_slot)?, "source", Centering::Cell, depth, dim)?;
                expect_layout(level.patch_data(i, n_slot)?, "output", Centering::Cell, depth, dim)?;
                expect_layout(
                    level.patch_data(i, u_slot)?,
                    "advection velocity",
                    Centering::Face,
                    1,
                    dim,
                )?;
            }
        }
        Ok(())
    }

    fn interpolate_to_faces(&self, patch: &mut Patch, u_slot: SlotId) -> Result<(), ConvectiveError> {
        let bx = *patch.index_box();
        let missing = missing_data(patch);
        {
            let (extrap, others) = patch
                .split_slot_mut(self.q_extrap.slot)
                .ok_or_else(|| missing(self.q_extrap.slot))?;
            let extrap = extrap.as_face_mut().ok_or_else(|| missing(self.q_extrap.slot))?;
            let q = others
                .cell(self.scratch.slot)
                .ok_or_else(|| missing(self.scratch.slot))?;
            for d in 0..self.q_def.depth {
                ctof_interp(extrap.arrays_mut(), d, q.array(), d, &bx);
            }
        }
        if self.config.difference_form.needs_flux() {
            let (flux, others) = patch
                .split_slot_mut(self.q_flux.slot)
                .ok_or_else(|| missing(self.q_flux.slot))?;
            let flux = flux.as_face_mut().ok_or_else(|| missing(self.q_flux.slot))?;
            let qf = others
                .face(self.q_extrap.slot)
                .ok_or_else(|| missing(self.q_extrap.slot))?;
            let u = others.face(u_slot).ok_or_else(|| missing(u_slot))?;
            for d in 0..self.q_def.depth {
                advect_flux(1.0, u.arrays(), qf.arrays(), flux.arrays_mut(), d, &bx);
            }
        }
        Ok(())
    }

    fn difference(&self, patch: &mut Patch, n_slot: SlotId, u_slot: SlotId) -> Result<(), ConvectiveError> {
        let bx = *patch.index_box();
        let dx = patch.dx();
        let missing = missing_data(patch);
        let (out, others) = patch.split_slot_mut(n_slot).ok_or_else(|| missing(n_slot))?;
        let out = out.as_cell_mut().ok_or_else(|| missing(n_slot))?.array_mut();
        let face = |slot: SlotId| others.face(slot).ok_or_else(|| missing(slot));
        for d in 0..self.q_def.depth {
            match self.config.difference_form {
                DifferencingForm::Advective => {
                    let (u, qf) = (face(u_slot)?, face(self.q_extrap.slot)?);
                    advect_derivative(out, d, -1.0, &dx, u.arrays(), qf.arrays(), d, &bx);
                }
                DifferencingForm::Conservative => {
                    let flux = face(self.q_flux.slot)?;
                    ftoc_div(out, d, -1.0, flux.arrays(), d, &bx, &dx);
                }
                DifferencingForm::SkewSymmetric => {
                    let (u, qf) = (face(u_slot)?, face(self.q_extrap.slot)?);
                    let flux = face(self.q_flux.slot)?;
                    advect_derivative(out, d, -1.0, &dx, u.arrays(), qf.arrays(), d, &bx);
                    ftoc_div_add(out, d, -0.5, flux.arrays(), d, 0.5, &bx, &dx);
                }
            }
        }
        Ok(())
    }
}

impl Drop for ConvectiveOperator {
    fn drop(&mut self) {
        if let Err(err) = self.deallocate_operator_state() {
            log::warn!("{}: failed to release scratch storage: {err}", self.name);
        }
    }
}

fn missing_data(patch: &Patch) -> impl Fn(SlotId) -> MeshError {
    let (level, index) = (patch.level_number(), patch.index());
    move |slot| MeshError::MissingData {
        level,
        patch: index,
        slot,
        what: "operator scratch",
    }
}

fn expect_layout(
    data: &PatchData,
    what: &str,
    centering: Centering,
    depth: usize,
    dim: Dim,
) -> Result<(), PreconditionViolation> {
    if data.centering() != centering {
        return Err(PreconditionViolation::CenteringMismatch {
            what: what.to_string(),
            expected: centering,
            found: data.centering(),
        });
    }
    if data.depth() != depth {
        return Err(PreconditionViolation::DepthMismatch {
            dst: depth,
            src: data.depth(),
        });
    }
    if !data.ghosts().is_uniform(dim) {
        return Err(PreconditionViolation::NonUniformGhostWidth {
            what: what.to_string(),
            ghosts: data.ghosts(),
        });
    }
    Ok(())
}
