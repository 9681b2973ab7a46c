// Copyright (c) 2025 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The `projection` module contains the functions that implement the
//! ellipsoidal polar stereographic projection, Snyder
//! [Map Projections: A Working Manual](https://pubs.usgs.gov/pp/1395/report.pdf)
//! chapter 21.
//!
//! Positions are described by their colatitude `theta`, the angular distance
//! from the projection pole. The forward projection is closed form:
//!
//!   t2  = 2 * tan(theta/2) * ((1 + e cos(theta)) / (1 - e cos(theta)))^(e/2)
//!   rho = a * k0 * t2 / c
//!
//! The reverse projection solves `v(theta) = t2(theta) - t2 = 0` with
//! Newton's method, which converges much faster than the fixed point
//! iteration of Snyder (7-9).

use crate::{Degrees, Hemisphere, Metres, PolarStereographic, Radians};

/// The maximum number of Newton iterations performed by `solve_colatitude`.
pub const MAX_ITERATIONS: u32 = 5;

/// The convergence tolerance of `solve_colatitude` in radians:
/// one tenth of the square root of the machine epsilon.
#[must_use]
pub fn calculate_tolerance() -> f64 {
    0.1 * libm::sqrt(f64::EPSILON)
}

/// Calculate the colatitude of a geodetic latitude, measured from the pole
/// of the given hemisphere.
/// * `hemisphere` - the projection pole.
/// * `lat` - the geodetic latitude.
///
/// returns the colatitude in Radians, zero at the projection pole.
#[must_use]
pub fn calculate_colatitude(hemisphere: Hemisphere, lat: Degrees) -> Radians {
    Radians((90.0 - hemisphere.sign() * lat.0).to_radians())
}

/// Calculate the conformal latitude factor `((1 + e cos) / (1 - e cos))^(e/2)`.
/// * `e` - the Eccentricity of the ellipsoid.
/// * `ecos` - the Eccentricity multiplied by the cosine of the colatitude.
#[must_use]
pub fn calculate_conformal_factor(e: f64, ecos: f64) -> f64 {
    libm::pow((1.0 + ecos) / (1.0 - ecos), e / 2.0)
}

/// Calculate twice Snyder's conformal variable `t`, Snyder (15-9).
/// * `theta` - the colatitude in radians.
/// * `f` - the conformal latitude factor at `theta`.
#[must_use]
pub fn calculate_t2(theta: f64, f: f64) -> f64 {
    2.0 * libm::tan(theta / 2.0) * f
}

/// Calculate Snyder's `m`, the radius of the parallel divided by the
/// Semimajor axis, Snyder (14-15).
/// * `theta` - the colatitude in radians.
/// * `ecos` - the Eccentricity multiplied by the cosine of `theta`.
#[must_use]
pub fn calculate_meridional_factor(theta: f64, ecos: f64) -> f64 {
    libm::sin(theta) / libm::sqrt(1.0 - ecos * ecos)
}

/// Calculate the grid coordinates of a point at a radial distance from the
/// projection pole.
/// * `hemisphere` - the projection pole.
/// * `rho` - the radial distance from the pole.
/// * `lon` - the longitude.
///
/// returns the x and y grid coordinates.
#[must_use]
pub fn calculate_grid_xy(hemisphere: Hemisphere, rho: Metres, lon: Degrees) -> (Metres, Metres) {
    let lam = lon.0.to_radians();
    let x = rho.0 * libm::sin(lam);
    let y = -hemisphere.sign() * rho.0 * libm::cos(lam);
    (Metres(x), Metres(y))
}

/// Calculate the longitude of a grid position.
///
/// The longitude is undefined at the projection pole, where it is zero by
/// convention.
/// * `hemisphere` - the projection pole.
/// * `x`, `y` - the grid coordinates.
/// * `rho` - the radial distance of the grid position from the pole.
///
/// returns the longitude in the range [-180, 180].
#[allow(clippy::float_cmp)]
#[must_use]
pub fn calculate_grid_longitude(hemisphere: Hemisphere, x: Metres, y: Metres, rho: Metres) -> Degrees {
    if rho.0 == 0.0 {
        Degrees(0.0)
    } else {
        let y = if hemisphere.is_north() { -y.0 } else { y.0 };
        Degrees(-libm::atan2(-x.0, y).to_degrees())
    }
}

/// Calculate the meridian convergence at a longitude.
/// * `hemisphere` - the projection pole.
/// * `lon` - the longitude.
#[must_use]
pub fn calculate_convergence(hemisphere: Hemisphere, lon: Degrees) -> Degrees {
    Degrees(hemisphere.sign() * lon.0)
}

/// Calculate the point scale factor.
///
/// At the projection pole `m` vanishes and the scale is `k0`.
/// * `rho` - the radial distance from the pole.
/// * `m` - Snyder's `m` at the point.
/// * `model` - the projection.
#[must_use]
pub fn calculate_scale(rho: Metres, m: f64, model: &PolarStereographic) -> f64 {
    if m < f64::EPSILON {
        model.central_scale()
    } else {
        rho.0 / (model.equatorial_radius().0 * m)
    }
}

/// Solve the colatitude of a point from twice its conformal variable `t`
/// using Newton's method on:
///   v(theta) = 2 * tan(theta/2) * f(theta) - t2 = 0
///
/// The iteration starts at the equator and stops when a step is smaller than
/// the model's tolerance or after the model's maximum number of iterations.
/// Failing to converge is not an error: the last estimate is returned.
/// * `t2` - twice Snyder's conformal variable `t`.
/// * `model` - the projection.
///
/// returns the colatitude, the number of iterations performed and the
/// residual `v` at the returned colatitude.
#[must_use]
pub fn solve_colatitude(t2: f64, model: &PolarStereographic) -> (Radians, u32, f64) {
    let e = model.eccentricity();
    let mut theta = core::f64::consts::FRAC_PI_2;
    let mut ecos = e * libm::cos(theta);
    let mut iterations = 0;
    let mut dtheta = 0.0;
    for i in 0..model.max_iterations() {
        let f = calculate_conformal_factor(e, ecos);
        let c2 = libm::cos(theta / 2.0);
        let v = calculate_t2(theta, f) - t2;
        let dv = model.one_minus_e2() * f / ((1.0 - ecos * ecos) * c2 * c2);
        dtheta = -v / dv;
        theta += dtheta;
        ecos = e * libm::cos(theta);
        iterations = i + 1;
        if libm::fabs(dtheta) < model.tolerance() {
            break;
        }
    }

    let residual = calculate_t2(theta, calculate_conformal_factor(e, ecos)) - t2;
    if libm::fabs(dtheta) < model.tolerance() {
        log::trace!("solve_colatitude: t2: {t2} converged in {iterations} iterations");
    } else {
        log::debug!(
            "solve_colatitude: t2: {t2} not converged after {iterations} iterations, step: {dtheta}, residual: {residual}"
        );
    }

    (Radians(theta), iterations, residual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UPS;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_calculate_tolerance() {
        // sqrt(epsilon) is 2^-26
        assert_eq!(0.1 / 67_108_864.0, calculate_tolerance());
        assert_eq!(1.490_116_119_384_765_7e-9, calculate_tolerance());
    }

    #[test]
    fn test_calculate_colatitude() {
        assert_eq!(0.0, calculate_colatitude(Hemisphere::North, Degrees(90.0)).0);
        assert_eq!(0.0, calculate_colatitude(Hemisphere::South, Degrees(-90.0)).0);
        assert_eq!(
            core::f64::consts::FRAC_PI_2,
            calculate_colatitude(Hemisphere::North, Degrees(0.0)).0
        );
        assert!(is_within_tolerance(
            10.0_f64.to_radians(),
            calculate_colatitude(Hemisphere::South, Degrees(-80.0)).0,
            f64::EPSILON
        ));
        // across the Equator from the projection pole
        assert!(is_within_tolerance(
            100.0_f64.to_radians(),
            calculate_colatitude(Hemisphere::North, Degrees(-10.0)).0,
            f64::EPSILON
        ));
    }

    #[test]
    fn test_calculate_conformal_factor() {
        // sphere
        assert_eq!(1.0, calculate_conformal_factor(0.0, 0.0));
        // Equator
        assert_eq!(1.0, calculate_conformal_factor(UPS.eccentricity(), 0.0));
        // the factor increases towards the pole
        let e = UPS.eccentricity();
        let f_pole = calculate_conformal_factor(e, e);
        assert!(1.0 < f_pole);
        assert!(is_within_tolerance(
            libm::pow((1.0 + e) / (1.0 - e), e / 2.0),
            f_pole,
            f64::EPSILON
        ));
    }

    #[test]
    fn test_calculate_t2_and_meridional_factor() {
        assert_eq!(0.0, calculate_t2(0.0, 1.0));
        assert!(is_within_tolerance(
            2.0,
            calculate_t2(core::f64::consts::FRAC_PI_2, 1.0),
            f64::EPSILON
        ));

        assert_eq!(0.0, calculate_meridional_factor(0.0, UPS.eccentricity()));
        assert_eq!(
            1.0,
            calculate_meridional_factor(core::f64::consts::FRAC_PI_2, 0.0)
        );
    }

    #[test]
    fn test_calculate_grid_xy() {
        let rho = Metres(1000.0);

        let (x, y) = calculate_grid_xy(Hemisphere::North, rho, Degrees(0.0));
        assert_eq!(0.0, x.0);
        assert_eq!(-1000.0, y.0);

        let (x, y) = calculate_grid_xy(Hemisphere::South, rho, Degrees(0.0));
        assert_eq!(0.0, x.0);
        assert_eq!(1000.0, y.0);

        let (x, y) = calculate_grid_xy(Hemisphere::North, rho, Degrees(90.0));
        assert_eq!(1000.0, x.0);
        assert!(libm::fabs(y.0) < 1e-12);

        let (x, y) = calculate_grid_xy(Hemisphere::South, rho, Degrees(-90.0));
        assert_eq!(-1000.0, x.0);
        assert!(libm::fabs(y.0) < 1e-12);
    }

    #[test]
    fn test_calculate_grid_longitude() {
        let pole = Metres(0.0);
        assert_eq!(
            0.0,
            calculate_grid_longitude(Hemisphere::North, pole, pole, pole).0
        );
        assert_eq!(
            0.0,
            calculate_grid_longitude(Hemisphere::South, pole, pole, pole).0
        );

        let rho = Metres(1000.0);
        for i in -17..18 {
            let lon = Degrees(f64::from(i) * 10.0);
            for hemisphere in [Hemisphere::North, Hemisphere::South] {
                let (x, y) = calculate_grid_xy(hemisphere, rho, lon);
                let result = calculate_grid_longitude(hemisphere, x, y, rho);
                assert!(is_within_tolerance(lon.0, result.0, 1e-12));
            }
        }
    }

    #[test]
    fn test_calculate_convergence() {
        assert_eq!(45.0, calculate_convergence(Hemisphere::North, Degrees(45.0)).0);
        assert_eq!(-45.0, calculate_convergence(Hemisphere::South, Degrees(45.0)).0);
    }

    #[test]
    fn test_calculate_scale() {
        assert_eq!(UPS.central_scale(), calculate_scale(Metres(0.0), 0.0, &UPS));
        assert_eq!(
            UPS.central_scale(),
            calculate_scale(Metres(1.0), f64::EPSILON / 2.0, &UPS)
        );
        assert_eq!(1.0, calculate_scale(UPS.equatorial_radius(), 1.0, &UPS));
    }

    #[test]
    fn test_solve_colatitude_pole() {
        let (theta, iterations, residual) = solve_colatitude(0.0, &UPS);
        assert!(theta.0 < 1e-15);
        assert!(0 < iterations && iterations <= MAX_ITERATIONS);
        assert!(libm::fabs(residual) < UPS.tolerance());
    }

    #[test]
    fn test_solve_colatitude() {
        let e = UPS.eccentricity();
        for i in 1..90 {
            let expected = f64::from(i).to_radians();
            let t2 = calculate_t2(expected, calculate_conformal_factor(e, e * libm::cos(expected)));

            let (theta, iterations, residual) = solve_colatitude(t2, &UPS);
            assert!(is_within_tolerance(expected, theta.0, 1e-12));
            assert!(iterations <= MAX_ITERATIONS);
            assert!(libm::fabs(residual) < UPS.tolerance());
        }
    }

    #[test]
    fn test_solve_colatitude_not_converged() {
        // 60 degrees beyond the Equator is too far from the initial estimate
        let e = UPS.eccentricity();
        let expected = 150.0_f64.to_radians();
        let t2 = calculate_t2(expected, calculate_conformal_factor(e, e * libm::cos(expected)));

        let (theta, iterations, residual) = solve_colatitude(t2, &UPS);
        assert_eq!(MAX_ITERATIONS, iterations);
        assert!(UPS.tolerance() < libm::fabs(residual));
        assert!(UPS.tolerance() < libm::fabs(theta.0 - expected));
    }
}
