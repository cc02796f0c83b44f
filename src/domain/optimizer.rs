//! Nelder–Mead simplex minimiser.
//!
//! Standard coefficients: reflection 1, expansion 2, contraction 0.5,
//! shrink 0.5. Converged when the simplex diameter (max coordinate distance
//! from the best vertex) is below `x_tolerance` and the objective spread is
//! below `f_tolerance` relative to `1 + |f_best|`. Non-finite objective
//! values are treated as +inf, so a constrained problem can reject
//! infeasible points by returning infinity.

#[derive(Debug, Clone, Copy)]
pub struct NelderMead {
    pub x_tolerance: f64,
    pub f_tolerance: f64,
    pub max_iterations: usize,
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            x_tolerance: 1e-7,
            f_tolerance: 1e-9,
            max_iterations: 5000,
            initial_step: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl NelderMead {
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Minimum
    where
        F: Fn(&[f64]) -> f64,
    {
        let eval = |x: &[f64]| {
            let v = objective(x);
            if v.is_finite() { v } else { f64::INFINITY }
        };

        let n = start.len();
        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        simplex.push((start.to_vec(), eval(start)));
        for i in 0..n {
            let mut vertex = start.to_vec();
            vertex[i] += self.initial_step;
            let value = eval(&vertex);
            simplex.push((vertex, value));
        }

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

            if self.has_converged(&simplex) {
                converged = true;
                break;
            }
            iterations += 1;

            let worst = simplex[n].clone();
            let centroid: Vec<f64> = (0..n)
                .map(|j| simplex[..n].iter().map(|(x, _)| x[j]).sum::<f64>() / n as f64)
                .collect();
            let along = |t: f64| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(&worst.0)
                    .map(|(c, w)| c + t * (c - w))
                    .collect()
            };

            let reflected = along(1.0);
            let f_reflected = eval(&reflected);

            if f_reflected < simplex[0].1 {
                let expanded = along(2.0);
                let f_expanded = eval(&expanded);
                simplex[n] = if f_expanded < f_reflected {
                    (expanded, f_expanded)
                } else {
                    (reflected, f_reflected)
                };
                continue;
            }

            if f_reflected < simplex[n - 1].1 {
                simplex[n] = (reflected, f_reflected);
                continue;
            }

            let (contracted, f_contracted) = if f_reflected < worst.1 {
                let c = along(0.5);
                let f = eval(&c);
                (c, f)
            } else {
                let c = along(-0.5);
                let f = eval(&c);
                (c, f)
            };

            if f_contracted < worst.1.min(f_reflected) {
                simplex[n] = (contracted, f_contracted);
                continue;
            }

            let best = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                let shrunk: Vec<f64> = best
                    .iter()
                    .zip(&vertex.0)
                    .map(|(b, x)| b + 0.5 * (x - b))
                    .collect();
                let value = eval(&shrunk);
                *vertex = (shrunk, value);
            }
        }

        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (x, value) = simplex.swap_remove(0);
        Minimum {
            x,
            value,
            iterations,
            converged,
        }
    }

    fn has_converged(&self, sorted: &[(Vec<f64>, f64)]) -> bool {
        let (best_x, best_f) = &sorted[0];
        if !best_f.is_finite() {
            return false;
        }
        let x_spread = sorted[1..]
            .iter()
            .flat_map(|(x, _)| x.iter().zip(best_x).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        let f_spread = sorted[1..]
            .iter()
            .map(|(_, f)| (f - best_f).abs())
            .fold(0.0, f64::max);
        x_spread <= self.x_tolerance && f_spread <= self.f_tolerance * (1.0 + best_f.abs())
    }
}
