// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)
//
// Geometric predicates for the sweep.
//
// Pure functions on point coordinates. Orientation uses a fixed absolute
// tolerance (EPSILON) rather than an adaptive one; every caller in the sweep
// relies on the three-way Collinear answer it produces.

use std::f64::consts::PI;

pub type Real = f64;

/// Absolute tolerance for orientation and the near-equal x test of point events.
pub const EPSILON: Real = 1e-12;

pub const PI_DIV2: Real = PI / 2.0;
pub const PI_3DIV4: Real = 3.0 * PI / 4.0;

/// A 2D point with an inert z coordinate.
///
/// Equality is exact on x and y: two points are the same vertex only when
/// both coordinates match bit for bit (with -0.0 == 0.0). z never takes part.
#[derive(Clone, Copy, Debug, Default)]
pub struct Point {
    pub x: Real,
    pub y: Real,
    pub z: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y, z: 0.0 }
    }

    #[inline]
    pub const fn with_z(x: Real, y: Real, z: Real) -> Self {
        Point { x, y, z }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Hash key matching `==`: -0.0 folds onto 0.0.
    #[inline]
    pub(crate) fn key(&self) -> (u64, u64) {
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

impl PartialEq for Point {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    Cw,
    Ccw,
    Collinear,
}

/// Sign of the determinant of (a - c, b - c).
///
/// Positive is CCW, negative CW, and anything inside (-EPSILON, EPSILON)
/// is Collinear.
#[inline]
pub fn orient2d(pa: &Point, pb: &Point, pc: &Point) -> Orientation {
    let detleft = (pa.x - pc.x) * (pb.y - pc.y);
    let detright = (pa.y - pc.y) * (pb.x - pc.x);
    let val = detleft - detright;
    if val > -EPSILON && val < EPSILON {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Ccw
    } else {
        Orientation::Cw
    }
}

/// Strict in-circle test for d against the circle through a, b, c.
///
/// Requires a, b, c to form a triangle and a, d to lie on opposite sides of
/// bc. d can only be inside when it falls in the wedge at bc bounded by the
/// lines ab and ca, so both partial orientations are checked first:
///
/// ```text
///                a
///                +
///               / \
///              /   \
///            b/     \c
///            +-------+
///           /    B    \
///          /           \
/// ```
///
/// Returns false on the circle itself.
pub fn smart_incircle(pa: &Point, pb: &Point, pc: &Point, pd: &Point) -> bool {
    let pdx = pd.x;
    let pdy = pd.y;
    let adx = pa.x - pdx;
    let ady = pa.y - pdy;
    let bdx = pb.x - pdx;
    let bdy = pb.y - pdy;

    let adxbdy = adx * bdy;
    let bdxady = bdx * ady;
    let oabd = adxbdy - bdxady;
    if oabd <= 0.0 {
        return false;
    }

    let cdx = pc.x - pdx;
    let cdy = pc.y - pdy;

    let cdxady = cdx * ady;
    let adxcdy = adx * cdy;
    let ocad = cdxady - adxcdy;
    if ocad <= 0.0 {
        return false;
    }

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdxcdy - cdxbdy) + blift * ocad + clift * oabd;

    det > 0.0
}

/// The two wedge tests of `smart_incircle` without the lifted determinant.
/// True when a flip of the pair sharing bc would produce valid triangles.
pub fn in_scan_area(pa: &Point, pb: &Point, pc: &Point, pd: &Point) -> bool {
    let pdx = pd.x;
    let pdy = pd.y;
    let adx = pa.x - pdx;
    let ady = pa.y - pdy;
    let bdx = pb.x - pdx;
    let bdy = pb.y - pdy;

    let oabd = adx * bdy - bdx * ady;
    if oabd <= 0.0 {
        return false;
    }

    let cdx = pc.x - pdx;
    let cdy = pc.y - pdy;

    let ocad = cdx * ady - adx * cdy;
    ocad > 0.0
}

/// Signed angle between p->a and p->b, in [-pi, pi].
///
/// Treats the two vectors as complex numbers: the argument of
/// conj(a) * b is atan2(ax*by - ay*bx, ax*bx + ay*by).
#[inline]
pub fn angle(p: &Point, a: &Point, b: &Point) -> Real {
    let ax = a.x - p.x;
    let ay = a.y - p.y;
    let bx = b.x - p.x;
    let by = b.y - p.y;
    (ax * by - ay * bx).atan2(ax * bx + ay * by)
}

/// Angle of the vector b->a against the horizontal [1, 0].
#[inline]
pub fn basin_angle(a: &Point, b: &Point) -> Real {
    (a.y - b.y).atan2(a.x - b.x)
}

/// Twice the signed area of abc (positive for CCW).
#[inline]
pub fn signed_area2(a: &Point, b: &Point, c: &Point) -> Real {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}
