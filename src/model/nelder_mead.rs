//! Box-constrained Nelder–Mead simplex minimization.
//!
//! Used to fit Gaussian-process hyperparameters. Trial points are clamped
//! into the bounds; non-finite objective values are treated as `+inf`.

/// Initial simplex edge as a fraction of each bound's width.
const INITIAL_STEP: f64 = 0.05;

/// Result of one minimization run.
#[derive(Debug, Clone)]
pub(crate) struct Minimum {
    pub(crate) point: Vec<f64>,
    pub(crate) value: f64,
    /// `false` if the iteration budget ran out before the simplex collapsed.
    pub(crate) converged: bool,
}

/// Tolerances and budget for [`minimize`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Options {
    pub(crate) max_iter: usize,
    pub(crate) x_tol: f64,
    pub(crate) f_tol: f64,
}

fn clamp_into(point: &mut [f64], bounds: &[(f64, f64)]) {
    for (v, &(lo, hi)) in point.iter_mut().zip(bounds) {
        *v = v.clamp(lo, hi);
    }
}

/// Minimizes `f` starting from `start` inside `bounds`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn minimize<F>(f: F, start: &[f64], bounds: &[(f64, f64)], options: Options) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let eval = |p: &[f64]| {
        let v = f(p);
        if v.is_finite() { v } else { f64::INFINITY }
    };
    let d = start.len();

    let mut x0 = start.to_vec();
    clamp_into(&mut x0, bounds);
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(d + 1);
    let f0 = eval(&x0);
    simplex.push((x0.clone(), f0));
    for (i, &(lo, hi)) in bounds.iter().enumerate().take(d) {
        let step = INITIAL_STEP * (hi - lo);
        let mut p = x0.clone();
        p[i] = if p[i] + step <= hi { p[i] + step } else { p[i] - step };
        clamp_into(&mut p, bounds);
        let v = eval(&p);
        simplex.push((p, v));
    }

    let mut converged = false;
    for _ in 0..options.max_iter {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let best = simplex[0].1;
        let worst = simplex[d].1;

        let spread = simplex[1..]
            .iter()
            .flat_map(|(p, _)| p.iter().zip(&simplex[0].0).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        if (worst - best).abs() <= options.f_tol && spread <= options.x_tol {
            converged = true;
            break;
        }

        let worst_point = simplex[d].0.clone();
        let centroid: Vec<f64> = (0..d)
            .map(|j| simplex[..d].iter().map(|(p, _)| p[j]).sum::<f64>() / d as f64)
            .collect();
        let along = |t: f64| {
            let mut p: Vec<f64> = centroid
                .iter()
                .zip(&worst_point)
                .map(|(c, w)| c + t * (c - w))
                .collect();
            clamp_into(&mut p, bounds);
            let v = eval(&p);
            (p, v)
        };

        let reflected = along(1.0);
        if reflected.1 < best {
            let expanded = along(2.0);
            simplex[d] = if expanded.1 < reflected.1 { expanded } else { reflected };
        } else if reflected.1 < simplex[d - 1].1 {
            simplex[d] = reflected;
        } else {
            let contracted = if reflected.1 < worst { along(0.5) } else { along(-0.5) };
            if contracted.1 < reflected.1.min(worst) {
                simplex[d] = contracted;
            } else {
                let best_point = simplex[0].0.clone();
                for entry in &mut simplex[1..] {
                    let mut p: Vec<f64> = best_point
                        .iter()
                        .zip(&entry.0)
                        .map(|(b, x)| b + 0.5 * (x - b))
                        .collect();
                    clamp_into(&mut p, bounds);
                    entry.1 = eval(&p);
                    entry.0 = p;
                }
            }
        }
    }

    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (point, value) = simplex.swap_remove(0);
    Minimum {
        point,
        value,
        converged,
    }
}
