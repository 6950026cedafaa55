//! The Nelder-Mead downhill simplex search itself.
//!
//! Grounded on `original_source/tags/1.0-alpha/Threads/SimplexThread.cpp`'s
//! `simplexTest`: reflect the worst vertex through the centroid of the
//! others, expand if the reflection improved on the best vertex, contract
//! if it didn't beat the second-worst, and shrink the whole simplex toward
//! the best vertex if even contraction fails. Convergence is judged on the
//! relative spread between the best and worst objective values, matching
//! the original's `2*|VThigh-VTlow|/(|VThigh|+|VTlow|+1e-10)` test.

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// What the caller's objective returned for one candidate center.
#[derive(Debug, Clone, Copy)]
pub enum ObjectiveOutcome {
    /// A usable VTC0 value at this point.
    Value(f64),
    /// The point fell outside the gridded CAPPI.
    OutOfCappi,
    /// The point was inside the CAPPI but the GBVTD ring fit there failed
    /// (too few samples, or the largest azimuthal gap disallows even
    /// wavenumber 0).
    RingFitFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Infeasible {
    OutOfCappi,
    RingFitFailed,
}

#[derive(Debug, Clone, Copy)]
struct Vertex {
    x: f64,
    y: f64,
    /// Value to *minimize*. Points the caller's objective judged infeasible
    /// are assigned `f64::INFINITY`.
    cost: f64,
    infeasible: Option<Infeasible>,
}

/// Outcome of one amoeba run, mirroring spec.md §4.3's per-seed state
/// machine: `{Converged, MaxIterReached, OutOfCappi, RingFitFailed}`.
#[derive(Debug, Clone, Copy)]
pub enum AmoebaOutcome {
    /// Converged to a best vertex with a finite objective value (the
    /// maximized quantity, already un-negated).
    Converged { x: f64, y: f64, value: f64 },
    /// `max_iterations` was exhausted before the relative-spread tolerance
    /// was met; `(x, y, value)` is the best vertex found anyway.
    MaxIterReached { x: f64, y: f64, value: f64 },
    /// Every vertex stayed outside the usable grid.
    OutOfCappi,
    /// Every vertex was inside the grid but the GBVTD ring fit failed at
    /// all of them.
    RingFitFailed,
}

fn centroid_excluding(vertices: &[Vertex; 3], exclude: usize) -> (f64, f64) {
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut n = 0.0;
    for (idx, v) in vertices.iter().enumerate() {
        if idx == exclude {
            continue;
        }
        sx += v.x;
        sy += v.y;
        n += 1.0;
    }
    (sx / n, sy / n)
}

fn eval(objective: &impl Fn(f64, f64) -> ObjectiveOutcome, x: f64, y: f64) -> (f64, Option<Infeasible>) {
    match objective(x, y) {
        ObjectiveOutcome::Value(value) => (-value, None), // minimize the negation to maximize VTC0
        ObjectiveOutcome::OutOfCappi => (f64::INFINITY, Some(Infeasible::OutOfCappi)),
        ObjectiveOutcome::RingFitFailed => (f64::INFINITY, Some(Infeasible::RingFitFailed)),
    }
}

fn infeasible_outcome(vertices: &[Vertex; 3]) -> AmoebaOutcome {
    if vertices.iter().all(|v| v.infeasible == Some(Infeasible::RingFitFailed)) {
        AmoebaOutcome::RingFitFailed
    } else {
        AmoebaOutcome::OutOfCappi
    }
}

/// Run the downhill simplex search, maximizing `objective(x, y)`, for at
/// most `max_iterations` iterations.
pub fn search(
    initial_vertices: [(f64, f64); 3],
    epsilon: f64,
    max_iterations: usize,
    objective: impl Fn(f64, f64) -> ObjectiveOutcome,
) -> AmoebaOutcome {
    let eval_at = |x: f64, y: f64| eval(&objective, x, y);

    let mut vertices: [Vertex; 3] = initial_vertices.map(|(x, y)| {
        let (cost, infeasible) = eval_at(x, y);
        Vertex { x, y, cost, infeasible }
    });

    if vertices.iter().all(|v| !v.cost.is_finite()) {
        return infeasible_outcome(&vertices);
    }

    let mut converged = false;
    for _ in 0..max_iterations {
        let (ihi, ilo, inhi) = ranks(&vertices);

        let y_hi = vertices[ihi].cost;
        let y_lo = vertices[ilo].cost;
        let rtol = 2.0 * (y_hi - y_lo).abs() / (y_hi.abs() + y_lo.abs() + 1e-10);
        if rtol < epsilon {
            converged = true;
            break;
        }

        let (cx, cy) = centroid_excluding(&vertices, ihi);
        let reflected = reflect(&vertices[ihi], cx, cy, REFLECTION);
        let (y_try, try_infeasible) = eval_at(reflected.0, reflected.1);

        if y_try < y_lo {
            let expanded = reflect(&vertices[ihi], cx, cy, EXPANSION);
            let (y_exp, exp_infeasible) = eval_at(expanded.0, expanded.1);
            if y_exp < y_try {
                vertices[ihi] = Vertex {
                    x: expanded.0,
                    y: expanded.1,
                    cost: y_exp,
                    infeasible: exp_infeasible,
                };
            } else {
                vertices[ihi] = Vertex {
                    x: reflected.0,
                    y: reflected.1,
                    cost: y_try,
                    infeasible: try_infeasible,
                };
            }
        } else if y_try >= vertices[inhi].cost {
            if y_try < y_hi {
                vertices[ihi] = Vertex {
                    x: reflected.0,
                    y: reflected.1,
                    cost: y_try,
                    infeasible: try_infeasible,
                };
            }
            let contracted = reflect(&vertices[ihi], cx, cy, -CONTRACTION);
            let (y_con, con_infeasible) = eval_at(contracted.0, contracted.1);
            if y_con < vertices[ihi].cost {
                vertices[ihi] = Vertex {
                    x: contracted.0,
                    y: contracted.1,
                    cost: y_con,
                    infeasible: con_infeasible,
                };
            } else {
                shrink(&mut vertices, ilo, SHRINK, &eval_at);
            }
        } else {
            vertices[ihi] = Vertex {
                x: reflected.0,
                y: reflected.1,
                cost: y_try,
                infeasible: try_infeasible,
            };
        }
    }

    let (_, ilo, _) = ranks(&vertices);
    let best = vertices[ilo];
    if best.cost.is_finite() {
        if converged {
            AmoebaOutcome::Converged {
                x: best.x,
                y: best.y,
                value: -best.cost,
            }
        } else {
            tracing::warn!(x = best.x, y = best.y, max_iterations, "simplex search exhausted max iterations without converging");
            AmoebaOutcome::MaxIterReached {
                x: best.x,
                y: best.y,
                value: -best.cost,
            }
        }
    } else {
        infeasible_outcome(&vertices)
    }
}

fn reflect(worst: &Vertex, cx: f64, cy: f64, factor: f64) -> (f64, f64) {
    (cx + factor * (cx - worst.x), cy + factor * (cy - worst.y))
}

fn shrink(vertices: &mut [Vertex; 3], keep: usize, factor: f64, eval_at: &impl Fn(f64, f64) -> (f64, Option<Infeasible>)) {
    let anchor = vertices[keep];
    for (idx, v) in vertices.iter_mut().enumerate() {
        if idx == keep {
            continue;
        }
        v.x = anchor.x + factor * (v.x - anchor.x);
        v.y = anchor.y + factor * (v.y - anchor.y);
        let (cost, infeasible) = eval_at(v.x, v.y);
        v.cost = cost;
        v.infeasible = infeasible;
    }
}

/// Returns (index of highest cost, index of lowest cost, index of
/// second-highest cost).
fn ranks(vertices: &[Vertex; 3]) -> (usize, usize, usize) {
    let mut order = [0, 1, 2];
    order.sort_by(|&a, &b| vertices[a].cost.partial_cmp(&vertices[b].cost).unwrap());
    (order[2], order[0], order[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_ITERATIONS: usize = 200;

    #[test]
    fn converges_to_a_single_peaked_objective() {
        let objective = |x: f64, y: f64| ObjectiveOutcome::Value(100.0 - ((x - 3.0).powi(2) + (y + 2.0).powi(2)));
        let initial = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        match search(initial, 1e-6, MAX_ITERATIONS, objective) {
            AmoebaOutcome::Converged { x, y, value } => {
                assert!((x - 3.0).abs() < 0.1);
                assert!((y + 2.0).abs() < 0.1);
                assert!(value > 99.0);
            }
            other => panic!("expected convergence, got {other:?}"),
        }
    }

    #[test]
    fn reports_out_of_cappi_when_always_infeasible() {
        let initial = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        match search(initial, 1e-6, MAX_ITERATIONS, |_, _| ObjectiveOutcome::OutOfCappi) {
            AmoebaOutcome::OutOfCappi => {}
            other => panic!("expected out-of-cappi, got {other:?}"),
        }
    }

    #[test]
    fn reports_ring_fit_failed_when_every_vertex_has_no_data() {
        let initial = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        match search(initial, 1e-6, MAX_ITERATIONS, |_, _| ObjectiveOutcome::RingFitFailed) {
            AmoebaOutcome::RingFitFailed => {}
            other => panic!("expected ring-fit-failed, got {other:?}"),
        }
    }

    #[test]
    fn reports_max_iter_reached_when_iterations_run_out_before_converging() {
        // A flat objective never lowers `rtol` below epsilon, so the search
        // always exhausts its iteration budget.
        let objective = |_: f64, _: f64| ObjectiveOutcome::Value(1.0);
        let initial = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        match search(initial, 1e-6, 5, objective) {
            AmoebaOutcome::MaxIterReached { .. } => {}
            other => panic!("expected max-iter-reached, got {other:?}"),
        }
    }
}
