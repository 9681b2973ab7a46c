// Copyright (c) 2024-2025 Ken Barker

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

//! polar-stereographic
//!
//! A library for converting geographic coordinates on an ellipsoid to and
//! from [polar stereographic](https://en.wikipedia.org/wiki/Universal_polar_stereographic_coordinate_system)
//! grid coordinates.
//!
//! The polar stereographic projection is the conformal projection used to map
//! the polar regions, where the Transverse Mercator projection of UTM degrades.
//! The Universal Polar Stereographic (UPS) grid uses it on the WGS-84
//! ellipsoid with a central scale factor of 0.994 at the poles.
//!
//! ## Design
//!
//! The library is based on Charles Karney's [GeographicLib](https://geographiclib.sourceforge.io/)
//! `PolarStereographic` class, using the formulae in Snyder
//! [Map Projections: A Working Manual](https://pubs.usgs.gov/pp/1395/report.pdf).
//!
//! The `PolarStereographic` struct holds the constants derived from an
//! ellipsoid and a central scale factor. It is immutable after construction,
//! so the static `UPS` projection may be shared between threads.
//!
//! The forward projection is closed form. The reverse projection solves for
//! the colatitude with a bounded Newton iteration, see the `projection`
//! module.
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Degrees`
//!   and `Radians`;
//! - [unit-sphere](https://crates.io/crates/unit-sphere) - to define `LatLong`;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres`.
//!
//! The library is declared [no_std](https://docs.rust-embedded.org/book/intro/no-std.html)
//! so it can be used in embedded applications.

#![cfg_attr(not(test), no_std)]

extern crate angle_sc;
extern crate icao_units;
extern crate unit_sphere;

pub mod ellipsoid;
pub mod error;
pub mod projection;

pub use angle_sc::{Degrees, Radians, Validate};
pub use error::Error;
pub use icao_units::si::Metres;
pub use unit_sphere::LatLong;

use lazy_static::lazy_static;

/// The UPS central scale factor.
pub const UPS_K0: f64 = 0.994;

/// The hemisphere of a polar stereographic projection, i.e. its pole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Select the hemisphere of a latitude, the Equator is in the North.
    /// * `lat` - the latitude.
    #[must_use]
    pub fn from_latitude(lat: Degrees) -> Self {
        if lat.0 < 0.0 {
            Self::South
        } else {
            Self::North
        }
    }

    /// Whether the projection pole is the North pole.
    #[must_use]
    pub const fn is_north(self) -> bool {
        matches!(self, Self::North)
    }

    /// One in the North, minus one in the South.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::North => 1.0,
            Self::South => -1.0,
        }
    }
}

impl From<bool> for Hemisphere {
    /// `true` is the North.
    fn from(north: bool) -> Self {
        if north {
            Self::North
        } else {
            Self::South
        }
    }
}

/// A polar stereographic projection on an ellipsoid of revolution.
#[derive(Clone, Debug, PartialEq)]
pub struct PolarStereographic {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,
    /// The central scale factor, at the pole.
    k0: f64,

    /// The Eccentricity of the ellipsoid.
    e: f64,
    /// One minus the square of the Eccentricity.
    e2m: f64,
    /// The radial scale constant, see `ellipsoid::calculate_scale_constant`.
    c: f64,
    /// The convergence tolerance of the reverse projection, in radians.
    tolerance: f64,
    /// The maximum number of iterations of the reverse projection.
    max_iterations: u32,
}

impl Validate for PolarStereographic {
    /// Test whether a `PolarStereographic` is valid.
    /// Whether 0 < `a`, 0 <= `e` < 1 and 0 < `k0`.
    fn is_valid(&self) -> bool {
        0.0 < self.a.0 && (0.0..1.0).contains(&self.e) && 0.0 < self.k0
    }
}

impl PolarStereographic {
    /// Constructor.
    ///
    /// The parameters are not validated, see `try_new`.
    /// * `a` - the Semimajor axis of the ellipsoid.
    /// * `inverse_f` - the inverse flattening of the ellipsoid,
    ///   infinite for a sphere.
    /// * `k0` - the central scale factor.
    #[must_use]
    pub fn new(a: Metres, inverse_f: f64, k0: f64) -> Self {
        let f = ellipsoid::calculate_flattening(inverse_f);
        let e = ellipsoid::calculate_eccentricity(f);
        Self {
            a,
            f,
            k0,
            e,
            e2m: 1.0 - e * e,
            c: ellipsoid::calculate_scale_constant(e),
            tolerance: projection::calculate_tolerance(),
            max_iterations: projection::MAX_ITERATIONS,
        }
    }

    /// Validating constructor.
    /// * `a` - the Semimajor axis of the ellipsoid.
    /// * `inverse_f` - the inverse flattening of the ellipsoid.
    /// * `k0` - the central scale factor.
    ///
    /// # Errors
    ///
    /// `MajorRadiusNotPositive` if `a` is not positive and finite,
    /// `FlatteningOutOfRange` if the flattening is not in [0, 1),
    /// `ScaleNotPositive` if `k0` is not positive and finite.
    pub fn try_new(a: Metres, inverse_f: f64, k0: f64) -> Result<Self, Error> {
        if !(0.0 < a.0 && a.0.is_finite()) {
            return Err(Error::MajorRadiusNotPositive(a.0));
        }
        let f = ellipsoid::calculate_flattening(inverse_f);
        if !(0.0..1.0).contains(&f) {
            return Err(Error::FlatteningOutOfRange(f));
        }
        if !(0.0 < k0 && k0.is_finite()) {
            return Err(Error::ScaleNotPositive(k0));
        }
        Ok(Self::new(a, inverse_f, k0))
    }

    /// Construct a `PolarStereographic` on the WGS-84 ellipsoid.
    /// * `k0` - the central scale factor.
    #[must_use]
    pub fn wgs84(k0: f64) -> Self {
        Self::new(ellipsoid::wgs84::A, ellipsoid::wgs84::INVERSE_F, k0)
    }

    /// Construct a copy of this projection with the central scale factor set
    /// so that the point scale factor at `lat` is `k`.
    /// * `lat` - the latitude, in the Northern projection.
    /// * `k` - the point scale factor at `lat`.
    ///
    /// # Errors
    ///
    /// `ScaleNotPositive` if `k` is not positive and finite,
    /// `LatitudeOutOfRange` if `lat` is not in (-90, 90].
    pub fn with_scale(&self, lat: Degrees, k: f64) -> Result<Self, Error> {
        if !(0.0 < k && k.is_finite()) {
            return Err(Error::ScaleNotPositive(k));
        }
        if !(-90.0 < lat.0 && lat.0 <= 90.0) {
            return Err(Error::LatitudeOutOfRange(lat.0));
        }

        let mut unit_scale = self.clone();
        unit_scale.k0 = 1.0;
        let (_, _, _, k1) = unit_scale.forward(Hemisphere::North, lat, Degrees(0.0));

        let mut result = self.clone();
        result.k0 = k / k1;
        Ok(result)
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn equatorial_radius(&self) -> Metres {
        self.a
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn flattening(&self) -> f64 {
        self.f
    }

    /// The inverse flattening of the ellipsoid, infinite for a sphere.
    #[must_use]
    pub fn inverse_flattening(&self) -> f64 {
        1.0 / self.f
    }

    /// The central scale factor, at the pole.
    #[must_use]
    pub const fn central_scale(&self) -> f64 {
        self.k0
    }

    /// The Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn eccentricity(&self) -> f64 {
        self.e
    }

    /// One minus the square of the Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn one_minus_e2(&self) -> f64 {
        self.e2m
    }

    /// The radial scale constant.
    #[must_use]
    pub const fn scale_constant(&self) -> f64 {
        self.c
    }

    /// The convergence tolerance of the reverse projection, in radians.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The maximum number of iterations of the reverse projection.
    #[must_use]
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Project a geographic position to polar stereographic grid coordinates.
    /// * `hemisphere` - the projection pole.
    /// * `lat` - the latitude, normally in the same hemisphere as the pole.
    /// * `lon` - the longitude.
    ///
    /// returns the x and y grid coordinates, the meridian convergence and
    /// the point scale factor.
    ///
    /// # Examples
    /// ```
    /// use polar_stereographic::*;
    /// use angle_sc::is_within_tolerance;
    ///
    /// let (x, y, gamma, k) = UPS.forward(Hemisphere::North, Degrees(80.0), Degrees(0.0));
    /// assert!(is_within_tolerance(0.0, x.0, 1e-9));
    /// assert!(is_within_tolerance(-1_112_951.136_954_905, y.0, 1e-6));
    /// assert_eq!(0.0, gamma.0);
    /// assert!(is_within_tolerance(1.001_607_561_750_571_5, k, 1e-12));
    /// ```
    #[must_use]
    pub fn forward(
        &self,
        hemisphere: Hemisphere,
        lat: Degrees,
        lon: Degrees,
    ) -> (Metres, Metres, Degrees, f64) {
        let theta = projection::calculate_colatitude(hemisphere, lat).0;
        let ecos = self.e * libm::cos(theta);
        let f = projection::calculate_conformal_factor(self.e, ecos);
        let t2 = projection::calculate_t2(theta, f);
        let m = projection::calculate_meridional_factor(theta, ecos);

        let rho = Metres(self.a.0 * self.k0 * t2 / self.c);
        let k = projection::calculate_scale(rho, m, self);
        let (x, y) = projection::calculate_grid_xy(hemisphere, rho, lon);
        (x, y, projection::calculate_convergence(hemisphere, lon), k)
    }

    /// Project a `LatLong` to polar stereographic grid coordinates, using
    /// the pole in the same hemisphere as the `LatLong`.
    /// * `position` - the geographic position.
    ///
    /// returns the hemisphere, the x and y grid coordinates, the meridian
    /// convergence and the point scale factor.
    #[must_use]
    pub fn forward_lat_long(
        &self,
        position: &LatLong,
    ) -> (Hemisphere, Metres, Metres, Degrees, f64) {
        let hemisphere = Hemisphere::from_latitude(position.lat());
        let (x, y, gamma, k) = self.forward(hemisphere, position.lat(), position.lon());
        (hemisphere, x, y, gamma, k)
    }

    /// Convert polar stereographic grid coordinates to a geographic position.
    /// * `hemisphere` - the projection pole.
    /// * `x`, `y` - the grid coordinates.
    ///
    /// returns the latitude, the longitude in the range [-180, 180],
    /// the meridian convergence and the point scale factor.
    ///
    /// # Examples
    /// ```
    /// use polar_stereographic::*;
    /// use angle_sc::is_within_tolerance;
    ///
    /// let (lat, lon, gamma, k) =
    ///     UPS.reverse(Hemisphere::North, Metres(0.0), Metres(-1_112_951.136_954_905));
    /// assert!(is_within_tolerance(80.0, lat.0, 1e-9));
    /// assert!(is_within_tolerance(0.0, lon.0, 1e-12));
    /// assert!(is_within_tolerance(0.0, gamma.0, 1e-12));
    /// assert!(is_within_tolerance(1.001_607_561_750_571_5, k, 1e-12));
    /// ```
    #[must_use]
    pub fn reverse(
        &self,
        hemisphere: Hemisphere,
        x: Metres,
        y: Metres,
    ) -> (Degrees, Degrees, Degrees, f64) {
        let (lat, lon, gamma, k, _, _) = self.reverse_with_diagnostics(hemisphere, x, y);
        (lat, lon, gamma, k)
    }

    /// Convert polar stereographic grid coordinates to a geographic position,
    /// also returning the state of the colatitude solver.
    ///
    /// The solver does not guarantee convergence: a residual larger than
    /// `tolerance` indicates that the position is unreliable.
    /// * `hemisphere` - the projection pole.
    /// * `x`, `y` - the grid coordinates.
    ///
    /// returns the latitude, the longitude, the meridian convergence,
    /// the point scale factor, the number of solver iterations and the
    /// solver residual.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn reverse_with_diagnostics(
        &self,
        hemisphere: Hemisphere,
        x: Metres,
        y: Metres,
    ) -> (Degrees, Degrees, Degrees, f64, u32, f64) {
        let rho = Metres(libm::hypot(x.0, y.0));
        let t2 = rho.0 * self.c / (self.a.0 * self.k0);
        let (theta, iterations, residual) = projection::solve_colatitude(t2, self);

        let lat = Degrees(hemisphere.sign() * (90.0 - theta.0.to_degrees()));
        let lon = projection::calculate_grid_longitude(hemisphere, x, y, rho);

        let ecos = self.e * libm::cos(theta.0);
        let m = projection::calculate_meridional_factor(theta.0, ecos);
        let k = if m == 0.0 || rho.0 == 0.0 {
            self.k0
        } else {
            rho.0 / (self.a.0 * m)
        };

        (
            lat,
            lon,
            projection::calculate_convergence(hemisphere, lon),
            k,
            iterations,
            residual,
        )
    }

    /// Convert polar stereographic grid coordinates to a `LatLong`.
    /// * `hemisphere` - the projection pole.
    /// * `x`, `y` - the grid coordinates.
    ///
    /// returns the geographic position, the meridian convergence and the
    /// point scale factor.
    #[must_use]
    pub fn reverse_lat_long(
        &self,
        hemisphere: Hemisphere,
        x: Metres,
        y: Metres,
    ) -> (LatLong, Degrees, f64) {
        let (lat, lon, gamma, k) = self.reverse(hemisphere, x, y);
        (LatLong::new(lat, lon), gamma, k)
    }
}

lazy_static! {
    /// The Universal Polar Stereographic projection: the WGS-84 ellipsoid
    /// with a central scale factor of 0.994.
    pub static ref UPS: PolarStereographic = PolarStereographic::wgs84(UPS_K0);
}
