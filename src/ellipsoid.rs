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

//! The ellipsoid module contains functions for deriving the constants of a
//! polar stereographic projection from an ellipsoid's Semimajor axis and
//! inverse flattening.

pub mod wgs84;

/// Calculate the flattening of an ellipsoid from its inverse flattening.
/// An infinite inverse flattening gives a sphere, i.e. a flattening of zero.
/// * `inverse_f` - the inverse flattening.
/// # Examples
/// ```
/// use polar_stereographic::ellipsoid::{calculate_flattening, wgs84};
///
/// assert_eq!(wgs84::F, calculate_flattening(wgs84::INVERSE_F));
/// assert_eq!(0.0, calculate_flattening(f64::INFINITY));
/// ```
#[must_use]
pub fn calculate_flattening(inverse_f: f64) -> f64 {
    1.0 / inverse_f
}

/// Calculate the square of the Eccentricity of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use polar_stereographic::ellipsoid::{calculate_sq_eccentricity, wgs84};
///
/// // The WGS 84 sq_eccentricity.
/// assert_eq!(0.0066943799901413165, calculate_sq_eccentricity(wgs84::F));
/// ```
#[must_use]
pub fn calculate_sq_eccentricity(f: f64) -> f64 {
    f * (2.0 - f)
}

/// Calculate the Eccentricity of an ellipsoid.
/// * `f` - the flattening ratio.
/// # Examples
/// ```
/// use polar_stereographic::ellipsoid::{calculate_eccentricity, wgs84};
///
/// // The WGS 84 eccentricity.
/// assert_eq!(0.08181919084262149, calculate_eccentricity(wgs84::F));
/// ```
#[must_use]
pub fn calculate_eccentricity(f: f64) -> f64 {
    libm::sqrt(calculate_sq_eccentricity(f))
}

/// Calculate the normalising constant of the polar stereographic radial
/// distance: `sqrt((1 + e)^(1 + e) * (1 - e)^(1 - e))`, Snyder (21-33).
///
/// It is one for a sphere.
/// * `e` - the Eccentricity of the ellipsoid.
#[must_use]
pub fn calculate_scale_constant(e: f64) -> f64 {
    libm::sqrt(libm::pow(1.0 + e, 1.0 + e) * libm::pow(1.0 - e, 1.0 - e))
}
