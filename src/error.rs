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

//! The error module contains the errors returned by the validating
//! `PolarStereographic` constructors.

use thiserror::Error;

/// The reasons why a `PolarStereographic` cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum Error {
    #[error("Major radius is not positive: {0}")]
    MajorRadiusNotPositive(f64),

    #[error("Flattening is not in [0, 1): {0}")]
    FlatteningOutOfRange(f64),

    #[error("Scale is not positive: {0}")]
    ScaleNotPositive(f64),

    #[error("Latitude is not in (-90, 90]: {0}")]
    LatitudeOutOfRange(f64),
}
