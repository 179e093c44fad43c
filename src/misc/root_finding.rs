//! Root finding and one dimensional search.
use crate::consts::INV_PHI;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RootError {
    /// Maximum number of iterations reached before converging
    MaxIterationReached,
    /// The function has the same sign at both ends of the bracket
    NotBracketed,
}

impl std::error::Error for RootError {}

impl fmt::Display for RootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxIterationReached => {
                write!(f, "maximum number of iterations reached")
            }
            Self::NotBracketed => {
                write!(f, "root is not bracketed by the interval")
            }
        }
    }
}

/// Bisection on the bracket [a, b]
pub fn bisection<F>(
    mut a: f64,
    mut b: f64,
    tol: f64,
    max_iter: usize,
    f: F,
) -> Result<f64, RootError>
where
    F: Fn(f64) -> f64,
{
    let mut f_a = f(a);
    let f_b = f(b);
    if f_a == 0.0 {
        return Ok(a);
    } else if f_b == 0.0 {
        return Ok(b);
    } else if f_a.signum() == f_b.signum() {
        return Err(RootError::NotBracketed);
    }

    for _ in 0..max_iter {
        let c = (a + b) / 2.0;
        let f_c = f(c);
        if f_c == 0.0 || (b - a) / 2.0 <= tol {
            return Ok(c);
        }
        if f_c.signum() == f_a.signum() {
            a = c;
            f_a = f_c;
        } else {
            b = c;
        }
    }

    Err(RootError::MaxIterationReached)
}

/// Newton-Raphson kept inside the bracket [a, b].
///
/// Whenever a Newton step would leave the bracket, or the derivative
/// vanishes, a bisection step is taken instead. The bracket shrinks every
/// iteration, so this converges wherever bisection does while keeping the
/// quadratic convergence of Newton near the root.
pub fn newton_bisection<F>(
    mut a: f64,
    mut b: f64,
    x0: f64,
    tol: f64,
    max_iter: usize,
    f: F,
) -> Result<f64, RootError>
where
    F: Fn(f64) -> (f64, f64),
{
    let (f_a, _) = f(a);
    let (f_b, _) = f(b);
    if f_a == 0.0 {
        return Ok(a);
    } else if f_b == 0.0 {
        return Ok(b);
    } else if f_a.signum() == f_b.signum() {
        return Err(RootError::NotBracketed);
    }
    let sign_a = f_a.signum();

    let mut x = x0.clamp(a, b);
    for _ in 0..max_iter {
        let (f_x, g_x) = f(x);
        if f_x == 0.0 {
            return Ok(x);
        }

        if f_x.signum() == sign_a {
            a = x;
        } else {
            b = x;
        }

        let newton = x - f_x / g_x;
        let x_next = if g_x.abs() > f64::EPSILON && a < newton && newton < b
        {
            newton
        } else {
            (a + b) / 2.0
        };

        if (x_next - x).abs() <= tol || (b - a) <= tol {
            return Ok(x_next);
        }
        x = x_next;
    }

    Err(RootError::MaxIterationReached)
}

/// Golden-section search for the maximum of a unimodal function on [a, b]
pub fn golden_max<F>(mut a: f64, mut b: f64, tol: f64, f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let mut c = b - (b - a) * INV_PHI;
    let mut d = a + (b - a) * INV_PHI;
    let mut f_c = f(c);
    let mut f_d = f(d);

    while (b - a).abs() > tol {
        if f_c > f_d {
            b = d;
            d = c;
            f_d = f_c;
            c = b - (b - a) * INV_PHI;
            f_c = f(c);
        } else {
            a = c;
            c = d;
            f_c = f_d;
            d = a + (b - a) * INV_PHI;
            f_d = f(d);
        }
    }

    (a + b) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bisection_finds_sqrt_2() {
        let root = bisection(0.0, 2.0, 1E-12, 200, |x| x * x - 2.0).unwrap();
        assert::close(root, std::f64::consts::SQRT_2, 1E-10);
    }

    #[test]
    fn bisection_rejects_unbracketed() {
        let res = bisection(2.0, 3.0, 1E-12, 200, |x| x * x - 2.0);
        assert_eq!(res, Err(RootError::NotBracketed));
    }

    #[test]
    fn newton_bisection_survives_flat_start() {
        // the derivative is zero at the starting point, so a plain Newton
        // step would diverge
        let root =
            newton_bisection(-1.0, 2.0, 0.0, 1E-12, 200, |x| {
                (x.powi(3) - 1.0, 3.0 * x * x)
            })
            .unwrap();
        assert::close(root, 1.0, 1E-10);
    }

    #[test]
    fn newton_bisection_cubic_cdf() {
        // CDF of f(x) = 3/4 (1 - x^2) on [-1, 1]
        let cdf = |x: f64| (2.0 + 3.0 * x - x.powi(3)) / 4.0;
        let pdf = |x: f64| 0.75 * (1.0 - x * x);
        let root =
            newton_bisection(-1.0, 1.0, 0.0, 1E-12, 200, |x| {
                (cdf(x) - 0.5, pdf(x))
            })
            .unwrap();
        assert::close(root, 0.0, 1E-10);
    }

    #[test]
    fn golden_max_of_parabola() {
        let x = golden_max(-3.0, 5.0, 1E-10, |x| -(x - 1.25).powi(2));
        assert::close(x, 1.25, 1E-8);
    }
}
