//! Star-polymer pair potential.
//!
//! Closed-form potential between two star polymers with `f` arms and corona
//! diameter `sigma` (Likos form), piecewise at `r = sigma`:
//!
//! ```text
//! beta V(r) = (5/18) f^(3/2) * (-ln(r/sigma) + c)                 r <= sigma
//!           = (5/18) f^(3/2) * c * (sigma/r) * exp(-sqrt(f)(r-sigma)/(2 sigma))   r > sigma
//! with c = 1 / (1 + sqrt(f)/2)
//! ```
//!
//! Logarithmic inside the corona (diverges at contact), Yukawa-screened
//! outside; the two branches agree at `r = sigma`.

/// Evaluate `beta V(r)` for an `arms`-arm star with corona diameter `sigma`.
///
/// `r` must be positive; the potential diverges as `r -> 0`.
pub fn star_potential(r: f64, arms: f64, sigma: f64) -> f64 {
    let prefactor = (5.0 / 18.0) * arms.powf(1.5);
    let corona = 1.0 / (1.0 + arms.sqrt() / 2.0);
    if r <= sigma {
        prefactor * (-(r / sigma).ln() + corona)
    } else {
        prefactor * corona * (sigma / r) * (-arms.sqrt() * (r - sigma) / (2.0 * sigma)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_agree_at_the_corona_diameter() {
        for arms in [18.0, 32.0, 64.0, 128.0, 256.0] {
            let sigma = 1.0;
            let inside = star_potential(sigma, arms, sigma);
            let outside = star_potential(sigma + 1e-12, arms, sigma);
            assert!((inside - outside).abs() < 1e-6, "f={arms}");
        }
    }

    #[test]
    fn contact_value_for_eighteen_arms() {
        // (5/18) * 18^1.5 / (1 + sqrt(18)/2) at r = sigma.
        let v = star_potential(1.0, 18.0, 1.0);
        assert!((v - 6.7964).abs() < 1e-3, "v = {v}");
    }

    #[test]
    fn diverges_inside_and_decays_outside() {
        let near_zero = star_potential(1e-5, 18.0, 1.0);
        assert!(near_zero > 100.0);

        let mut prev = star_potential(1.0, 64.0, 1.0);
        for i in 1..=20 {
            let r = 1.0 + i as f64 * 0.1;
            let v = star_potential(r, 64.0, 1.0);
            assert!(v < prev, "not decreasing at r={r}");
            assert!(v > 0.0);
            prev = v;
        }
    }

    #[test]
    fn more_arms_means_stiffer_repulsion() {
        for &r in &[0.5, 1.0, 1.5] {
            assert!(star_potential(r, 256.0, 1.0) > star_potential(r, 18.0, 1.0));
        }
    }
}
