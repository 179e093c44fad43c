const QUAD_EPS: f64 = 1E-8;
const MAX_DEPTH: u32 = 48;

fn simpsons_rule<F>(func: &F, a: f64, b: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let c = (a + b) / 2.0;
    let h3 = (b - a) / 6.0;
    h3 * (4.0_f64.mul_add(func(c), func(a)) + func(b))
}

fn recursive_asr<F>(
    func: &F,
    a: f64,
    b: f64,
    eps: f64,
    whole: f64,
    depth: u32,
) -> f64
where
    F: Fn(f64) -> f64,
{
    let c = (a + b) / 2.0;
    let left = simpsons_rule(func, a, c);
    let right = simpsons_rule(func, c, b);
    let err = left + right - whole;
    // a NaN or infinite estimate cannot be refined
    if depth >= MAX_DEPTH || !err.is_finite() || err.abs() <= 15.0 * eps {
        left + right + err / 15.0
    } else {
        recursive_asr(func, a, c, eps / 2.0, left, depth + 1)
            + recursive_asr(func, c, b, eps / 2.0, right, depth + 1)
    }
}

/// Adaptive Simpson's quadrature with a user supplied error tolerance.
/// `None` uses the default tolerance of 1E-8.
///
/// Integrating from `b` to `a` with `a < b` yields the negated integral.
///
/// # Example
///
/// ```
/// use probsim::misc::quad_eps;
///
/// let q = quad_eps(|x: f64| x.exp(), 0.0, 1.0, Some(1E-10));
/// assert!((q - (1.0_f64.exp() - 1.0)).abs() < 1E-10);
/// ```
pub fn quad_eps<F>(func: F, a: f64, b: f64, eps: Option<f64>) -> f64
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return 0.0;
    }
    let eps = eps.unwrap_or(QUAD_EPS);
    recursive_asr(&func, a, b, eps, simpsons_rule(&func, a, b), 0)
}

/// Adaptive Simpson's quadrature
///
/// # Example
///
/// Integrate f: x<sup>2</sup> over the interval [0, 1].
///
/// ```
/// use probsim::misc::quad;
///
/// let func = |x: f64| x.powi(2);
/// let q = quad(func, 0.0, 1.0);
///
/// assert!((q - 1.0/3.0).abs() < 1E-8);
/// ```
pub fn quad<F>(func: F, a: f64, b: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    quad_eps(func, a, b, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn quad_of_x2() {
        let func = |x: f64| x.powi(2);
        let q = quad(func, 0.0, 1.0);
        assert::close(q, 1.0 / 3.0, QUAD_EPS);
    }

    #[test]
    fn quad_of_sin() {
        let func = |x: f64| x.sin();
        let q = quad(func, 0.0, 5.0 * PI);
        assert::close(q, 2.0, QUAD_EPS);
    }

    #[test]
    fn quad_reversed_bounds_is_negated() {
        let func = |x: f64| x.powi(3);
        let fwd = quad(func, 0.0, 2.0);
        let rev = quad(func, 2.0, 0.0);
        assert::close(fwd, 4.0, QUAD_EPS);
        assert::close(rev, -4.0, QUAD_EPS);
    }

    #[test]
    fn quad_of_empty_interval_is_zero() {
        assert_eq!(quad(|x: f64| x, 1.5, 1.5), 0.0);
    }

    #[test]
    fn quad_of_parabolic_density_is_one() {
        let q = quad(|x: f64| 0.75 * (1.0 - x * x), -1.0, 1.0);
        assert::close(q, 1.0, QUAD_EPS);
    }

    #[test]
    fn quad_of_nan_returns_promptly() {
        assert!(quad(|_| f64::NAN, 0.0, 1.0).is_nan());
    }
}
