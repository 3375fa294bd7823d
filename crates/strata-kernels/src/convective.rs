//! Face interpolation, flux and differencing kernels.

use strata_core::{ArrayData, Dim, IndexBox, IntVector, MAX_DIM};

/// Second-order centered cell-to-face interpolation of component `q_d`
/// into component `qf_d` of every face orientation.
///
/// `qf[a](i) = (q(i - e_a) + q(i)) / 2` for every face of `patch_box`.
/// Reads one ghost cell of `q` on each side.
pub fn ctof_interp(
    qf: &mut [ArrayData],
    qf_d: usize,
    q: &ArrayData,
    q_d: usize,
    patch_box: &IndexBox,
) {
    for a in patch_box.dim().axes() {
        let e = IntVector::unit(a);
        for p in patch_box.face_box(a).iter() {
            let v = 0.5 * (q.value(p - e, q_d) + q.value(p, q_d));
            qf[a].set_value(p, qf_d, v);
        }
    }
}

/// Face flux `flux[a](i) = dt * u[a](i) * qf[a](i)` for component `d`.
///
/// The velocity has depth one.
pub fn advect_flux(
    dt: f64,
    u: &[ArrayData],
    qf: &[ArrayData],
    flux: &mut [ArrayData],
    d: usize,
    patch_box: &IndexBox,
) {
    for a in patch_box.dim().axes() {
        for p in patch_box.face_box(a).iter() {
            let v = dt * u[a].value(p, 0) * qf[a].value(p, d);
            flux[a].set_value(p, d, v);
        }
    }
}

/// Advective derivative from face values:
/// `out(i) = alpha * sum_a (u[a](i) + u[a](i+e_a))/2 * (qf[a](i+e_a) - qf[a](i)) / dx[a]`.
#[allow(clippy::too_many_arguments)]
pub fn advect_derivative(
    out: &mut ArrayData,
    out_d: usize,
    alpha: f64,
    dx: &[f64; MAX_DIM],
    u: &[ArrayData],
    qf: &[ArrayData],
    d: usize,
    patch_box: &IndexBox,
) {
    let dim = patch_box.dim();
    for p in patch_box.iter() {
        let mut sum = 0.0;
        for a in dim.axes() {
            let hi = p + IntVector::unit(a);
            let u_avg = 0.5 * (u[a].value(p, 0) + u[a].value(hi, 0));
            sum += u_avg * (qf[a].value(hi, d) - qf[a].value(p, d)) / dx[a];
        }
        out.set_value(p, out_d, alpha * sum);
    }
}

fn divergence(flux: &[ArrayData], d: usize, p: IntVector, dx: &[f64; MAX_DIM], dim: Dim) -> f64 {
    dim.axes()
        .map(|a| (flux[a].value(p + IntVector::unit(a), d) - flux[a].value(p, d)) / dx[a])
        .sum()
}

/// Face-to-cell divergence `out(i) = alpha * div(flux)(i)`.
pub fn ftoc_div(
    out: &mut ArrayData,
    out_d: usize,
    alpha: f64,
    flux: &[ArrayData],
    d: usize,
    patch_box: &IndexBox,
    dx: &[f64; MAX_DIM],
) {
    let dim = patch_box.dim();
    for p in patch_box.iter() {
        out.set_value(p, out_d, alpha * divergence(flux, d, p, dx, dim));
    }
}

/// Face-to-cell divergence accumulated onto the existing output:
/// `out(i) = alpha * div(flux)(i) + beta * out(i)`.
#[allow(clippy::too_many_arguments)]
pub fn ftoc_div_add(
    out: &mut ArrayData,
    out_d: usize,
    alpha: f64,
    flux: &[ArrayData],
    d: usize,
    beta: f64,
    patch_box: &IndexBox,
    dx: &[f64; MAX_DIM],
) {
    let dim = patch_box.dim();
    for p in patch_box.iter() {
        let v = out.value_mut(p, out_d);
        *v = alpha * divergence(flux, d, p, dx, dim) + beta * *v;
    }
}
