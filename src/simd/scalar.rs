//! Portable reference kernels.
//!
//! [`ScalarKernel`] implements [`Float4Kernel`] with plain lane loops and the
//! `std` transcendental functions. It is compiled on every target, serves as
//! the fallback backend and is the oracle the accelerated kernels are tested
//! against. The determinant and inverse use cofactor expansion rather than the
//! shuffle-based block method of the register backends.
//!
//! The generic `det*`/`inverse*` functions work on any `num::Float` and
//! back the `f64` (and non-4x4) matrix operations.

use num::Float;

use super::traits::{Columns, Float4Kernel, Lanes};

/// Lane-loop implementation of [`Float4Kernel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarKernel;

#[inline(always)]
fn map(a: Lanes, f: impl Fn(f32) -> f32) -> Lanes {
    [f(a[0]), f(a[1]), f(a[2]), f(a[3])]
}

#[inline(always)]
fn zip(a: Lanes, b: Lanes, f: impl Fn(f32, f32) -> f32) -> Lanes {
    [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3])]
}

impl Float4Kernel for ScalarKernel {
    type Reg = Lanes;

    const NAME: &'static str = "scalar";

    #[inline]
    fn load(lanes: &Lanes) -> Lanes {
        *lanes
    }

    #[inline]
    fn store(reg: Lanes) -> Lanes {
        reg
    }

    #[inline]
    fn splat(value: f32) -> Lanes {
        [value; 4]
    }

    #[inline]
    fn add(a: Lanes, b: Lanes) -> Lanes {
        zip(a, b, |x, y| x + y)
    }

    #[inline]
    fn sub(a: Lanes, b: Lanes) -> Lanes {
        zip(a, b, |x, y| x - y)
    }

    #[inline]
    fn mul(a: Lanes, b: Lanes) -> Lanes {
        zip(a, b, |x, y| x * y)
    }

    #[inline]
    fn div(a: Lanes, b: Lanes) -> Lanes {
        zip(a, b, |x, y| x / y)
    }

    #[inline]
    fn min(a: Lanes, b: Lanes) -> Lanes {
        zip(a, b, f32::min)
    }

    #[inline]
    fn max(a: Lanes, b: Lanes) -> Lanes {
        zip(a, b, f32::max)
    }

    #[inline]
    fn abs(a: Lanes) -> Lanes {
        map(a, f32::abs)
    }

    #[inline]
    fn neg(a: Lanes) -> Lanes {
        map(a, |x| -x)
    }

    #[inline]
    fn floor(a: Lanes) -> Lanes {
        map(a, f32::floor)
    }

    #[inline]
    fn sqrt(a: Lanes) -> Lanes {
        map(a, f32::sqrt)
    }

    #[inline]
    fn rcp(a: Lanes) -> Lanes {
        map(a, f32::recip)
    }

    #[inline]
    fn rsqrt(a: Lanes) -> Lanes {
        map(a, |x| 1.0 / x.sqrt())
    }

    #[inline]
    fn hsum(a: Lanes) -> f32 {
        (a[0] + a[2]) + (a[1] + a[3])
    }

    #[inline]
    fn hmin(a: Lanes) -> f32 {
        a[0].min(a[1]).min(a[2].min(a[3]))
    }

    #[inline]
    fn hmax(a: Lanes) -> f32 {
        a[0].max(a[1]).max(a[2].max(a[3]))
    }

    #[inline]
    fn shuffle<const MASK: i32>(a: Lanes, b: Lanes) -> Lanes {
        let m = MASK as usize;
        [a[m & 3], a[(m >> 2) & 3], b[(m >> 4) & 3], b[(m >> 6) & 3]]
    }

    #[inline]
    fn sign_mask(a: Lanes) -> u32 {
        a.iter()
            .enumerate()
            .fold(0, |acc, (i, x)| acc | ((x.to_bits() >> 31) << i))
    }

    #[inline]
    fn exp(a: Lanes) -> Lanes {
        map(a, f32::exp)
    }

    #[inline]
    fn log(a: Lanes) -> Lanes {
        map(a, f32::ln)
    }

    #[inline]
    fn determinant(m: &Columns) -> f32 {
        det4(m)
    }

    #[inline]
    fn inverse(m: &Columns) -> Columns {
        inverse4(m)
    }
}

// The cofactor routines index `m[i][j]` as row `i`, column `j`. Fed a
// column-major matrix they compute the inverse of its transpose, which read
// back column-major is the inverse of the original, so no transposes are needed.

pub fn det2<T: Float>(m: &[[T; 2]; 2]) -> T {
    m[0][0] * m[1][1] - m[0][1] * m[1][0]
}

pub fn det3<T: Float>(m: &[[T; 3]; 3]) -> T {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// 2x2 minors of the top and bottom row pairs.
struct Minors4<T> {
    s: [T; 6],
    c: [T; 6],
}

impl<T: Float> Minors4<T> {
    fn new(a: &[[T; 4]; 4]) -> Self {
        Minors4 {
            s: [
                a[0][0] * a[1][1] - a[1][0] * a[0][1],
                a[0][0] * a[1][2] - a[1][0] * a[0][2],
                a[0][0] * a[1][3] - a[1][0] * a[0][3],
                a[0][1] * a[1][2] - a[1][1] * a[0][2],
                a[0][1] * a[1][3] - a[1][1] * a[0][3],
                a[0][2] * a[1][3] - a[1][2] * a[0][3],
            ],
            c: [
                a[2][0] * a[3][1] - a[3][0] * a[2][1],
                a[2][0] * a[3][2] - a[3][0] * a[2][2],
                a[2][0] * a[3][3] - a[3][0] * a[2][3],
                a[2][1] * a[3][2] - a[3][1] * a[2][2],
                a[2][1] * a[3][3] - a[3][1] * a[2][3],
                a[2][2] * a[3][3] - a[3][2] * a[2][3],
            ],
        }
    }

    fn determinant(&self) -> T {
        let (s, c) = (&self.s, &self.c);
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }
}

pub fn det4<T: Float>(m: &[[T; 4]; 4]) -> T {
    Minors4::new(m).determinant()
}

pub fn inverse2<T: Float>(m: &[[T; 2]; 2]) -> [[T; 2]; 2] {
    let inv_det = det2(m).recip();
    [
        [m[1][1] * inv_det, -m[0][1] * inv_det],
        [-m[1][0] * inv_det, m[0][0] * inv_det],
    ]
}

pub fn inverse3<T: Float>(m: &[[T; 3]; 3]) -> [[T; 3]; 3] {
    let inv_det = det3(m).recip();
    let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
        (m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]) * inv_det
    };
    [
        [cof(1, 2, 1, 2), -cof(0, 2, 1, 2), cof(0, 1, 1, 2)],
        [-cof(1, 2, 0, 2), cof(0, 2, 0, 2), -cof(0, 1, 0, 2)],
        [cof(1, 2, 0, 1), -cof(0, 2, 0, 1), cof(0, 1, 0, 1)],
    ]
}

pub fn inverse4<T: Float>(a: &[[T; 4]; 4]) -> [[T; 4]; 4] {
    let minors = Minors4::new(a);
    let (s, c) = (&minors.s, &minors.c);
    let inv_det = minors.determinant().recip();

    let mut out = [
        [
            a[1][1] * c[5] - a[1][2] * c[4] + a[1][3] * c[3],
            -a[0][1] * c[5] + a[0][2] * c[4] - a[0][3] * c[3],
            a[3][1] * s[5] - a[3][2] * s[4] + a[3][3] * s[3],
            -a[2][1] * s[5] + a[2][2] * s[4] - a[2][3] * s[3],
        ],
        [
            -a[1][0] * c[5] + a[1][2] * c[2] - a[1][3] * c[1],
            a[0][0] * c[5] - a[0][2] * c[2] + a[0][3] * c[1],
            -a[3][0] * s[5] + a[3][2] * s[2] - a[3][3] * s[1],
            a[2][0] * s[5] - a[2][2] * s[2] + a[2][3] * s[1],
        ],
        [
            a[1][0] * c[4] - a[1][1] * c[2] + a[1][3] * c[0],
            -a[0][0] * c[4] + a[0][1] * c[2] - a[0][3] * c[0],
            a[3][0] * s[4] - a[3][1] * s[2] + a[3][3] * s[0],
            -a[2][0] * s[4] + a[2][1] * s[2] - a[2][3] * s[0],
        ],
        [
            -a[1][0] * c[3] + a[1][1] * c[1] - a[1][2] * c[0],
            a[0][0] * c[3] - a[0][1] * c[1] + a[0][2] * c[0],
            -a[3][0] * s[3] + a[3][1] * s[1] - a[3][2] * s[0],
            a[2][0] * s[3] - a[2][1] * s[1] + a[2][2] * s[0],
        ],
    ];
    for row in out.iter_mut() {
        for x in row.iter_mut() {
            *x = *x * inv_det;
        }
    }
    out
}
