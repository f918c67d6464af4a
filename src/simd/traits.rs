//! The 4-lane `f32` kernel interface shared by every backend.
//!
//! A backend implements the register primitives of [`Float4Kernel`]; the
//! array-level kernels (dot product, normalize, cross product, quaternion
//! product, 4x4 matrix algebra) are provided on top of them, so every backend
//! runs the same shuffle sequence and only overrides what its instruction set
//! can do better (NEON's `vld4q_f32` transpose, AVX's two-column `mat_mul`,
//! the reference determinant).
//!
//! Matrices are column-major: `Columns[c][r]` is column `c`, row `r`.

/// Four `f32` lanes in memory order.
pub type Lanes = [f32; 4];

/// Four column vectors of a 4x4 matrix.
pub type Columns = [Lanes; 4];

/// Builds the 8-bit immediate for [`Float4Kernel::shuffle`].
///
/// Lane `i` of the result takes lane `x`, `y` of the first operand and lane
/// `z`, `w` of the second. This is the `_MM_SHUFFLE(w, z, y, x)` encoding.
pub const fn shuffle_mask(x: u32, y: u32, z: u32, w: u32) -> i32 {
    ((w << 6) | (z << 4) | (y << 2) | x) as i32
}

macro_rules! swizzle {
    ($k:ident, $v:expr, $x:literal, $y:literal, $z:literal, $w:literal) => {{
        let v = $v;
        $k::shuffle::<{ shuffle_mask($x, $y, $z, $w) }>(v, v)
    }};
}

macro_rules! shuffle {
    ($k:ident, $a:expr, $b:expr, $x:literal, $y:literal, $z:literal, $w:literal) => {
        $k::shuffle::<{ shuffle_mask($x, $y, $z, $w) }>($a, $b)
    };
}

/// Register primitives and the array-level kernels built on them.
///
/// Approximate primitives carry an accuracy contract, not bit-exactness:
/// `rcp`/`rsqrt` within 1e-5 relative error, `exp`/`log` within 1e-5
/// relative error (plus one unit in the last place for subnormal results) over
/// the whole `f32` range, subnormals included.
pub trait Float4Kernel {
    /// The register holding four lanes.
    type Reg: Copy;

    /// Short backend name, e.g. `"sse2"`.
    const NAME: &'static str;

    fn load(lanes: &Lanes) -> Self::Reg;
    fn store(reg: Self::Reg) -> Lanes;
    fn splat(value: f32) -> Self::Reg;

    fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Lane-wise minimum. The result for NaN lanes is backend-defined.
    fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise maximum. The result for NaN lanes is backend-defined.
    fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    fn abs(a: Self::Reg) -> Self::Reg;
    fn neg(a: Self::Reg) -> Self::Reg;
    fn floor(a: Self::Reg) -> Self::Reg;
    fn sqrt(a: Self::Reg) -> Self::Reg;

    /// Approximate `1 / a`.
    fn rcp(a: Self::Reg) -> Self::Reg;
    /// Approximate `1 / sqrt(a)`.
    fn rsqrt(a: Self::Reg) -> Self::Reg;

    fn hsum(a: Self::Reg) -> f32;
    fn hmin(a: Self::Reg) -> f32;
    fn hmax(a: Self::Reg) -> f32;

    /// Two-source lane shuffle, see [`shuffle_mask`].
    fn shuffle<const MASK: i32>(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Sign bit of lane `i` in bit `i` of the result.
    fn sign_mask(a: Self::Reg) -> u32;

    /// Approximate `e^a`: `+inf` above `ln(f32::MAX)`, zero below
    /// `ln(2^-150)`, subnormal results kept.
    fn exp(a: Self::Reg) -> Self::Reg;
    /// Approximate natural log; NaN for negative lanes, -inf for zero.
    fn log(a: Self::Reg) -> Self::Reg;

    #[inline]
    fn dot(a: &Lanes, b: &Lanes) -> f32 {
        Self::hsum(Self::mul(Self::load(a), Self::load(b)))
    }

    #[inline]
    fn sum(a: &Lanes) -> f32 {
        Self::hsum(Self::load(a))
    }

    /// `1 / (a0 + a1 + a2 + a3)`.
    #[inline]
    fn recip_sum(a: &Lanes) -> f32 {
        1.0 / Self::sum(a)
    }

    #[inline]
    fn length(a: &Lanes) -> f32 {
        Self::dot(a, a).sqrt()
    }

    /// Scales `a` to unit length. Undefined for the zero vector.
    #[inline]
    fn normalize(a: &Lanes) -> Lanes {
        let v = Self::load(a);
        let len_sq = Self::hsum(Self::mul(v, v));
        Self::store(Self::mul(v, Self::rsqrt(Self::splat(len_sq))))
    }

    /// Cross product of the `xyz` lanes; lane 3 of the result is zero.
    #[inline]
    fn cross(a: &Lanes, b: &Lanes) -> Lanes {
        let a = Self::load(a);
        let b = Self::load(b);
        let lhs = Self::mul(swizzle!(Self, a, 1, 2, 0, 3), swizzle!(Self, b, 2, 0, 1, 3));
        let rhs = Self::mul(swizzle!(Self, a, 2, 0, 1, 3), swizzle!(Self, b, 1, 2, 0, 3));
        Self::store(Self::sub(lhs, rhs))
    }

    /// `x^y` as `exp(y * log(x))`, defined for `x > 0`.
    #[inline]
    fn pow(x: &Lanes, y: &Lanes) -> Lanes {
        Self::store(Self::exp(Self::mul(Self::load(y), Self::log(Self::load(x)))))
    }

    /// Hamilton product of two `(x, y, z, w)` quaternions, `w` real.
    #[inline]
    fn quat_mul(a: &Lanes, b: &Lanes) -> Lanes {
        let a = Self::load(a);
        let b = Self::load(b);
        let flip_w = Self::load(&[1.0, 1.0, 1.0, -1.0]);

        let t0 = Self::mul(swizzle!(Self, a, 3, 3, 3, 3), b);
        let t1 = Self::mul(swizzle!(Self, a, 0, 1, 2, 0), swizzle!(Self, b, 3, 3, 3, 0));
        let t2 = Self::mul(swizzle!(Self, a, 1, 2, 0, 1), swizzle!(Self, b, 2, 0, 1, 1));
        let t3 = Self::mul(swizzle!(Self, a, 2, 0, 1, 2), swizzle!(Self, b, 1, 2, 0, 2));

        let acc = Self::add(t0, Self::mul(Self::add(t1, t2), flip_w));
        Self::store(Self::sub(acc, t3))
    }

    #[inline]
    fn transpose(m: &Columns) -> Columns {
        let [c0, c1, c2, c3] = load_columns::<Self>(m);

        let t0 = shuffle!(Self, c0, c1, 0, 1, 0, 1);
        let t2 = shuffle!(Self, c0, c1, 2, 3, 2, 3);
        let t1 = shuffle!(Self, c2, c3, 0, 1, 0, 1);
        let t3 = shuffle!(Self, c2, c3, 2, 3, 2, 3);

        [
            Self::store(shuffle!(Self, t0, t1, 0, 2, 0, 2)),
            Self::store(shuffle!(Self, t0, t1, 1, 3, 1, 3)),
            Self::store(shuffle!(Self, t2, t3, 0, 2, 0, 2)),
            Self::store(shuffle!(Self, t2, t3, 1, 3, 1, 3)),
        ]
    }

    /// `a * b`: column `j` of the result is `a * b[j]`.
    #[inline]
    fn mat_mul(a: &Columns, b: &Columns) -> Columns {
        let cols = load_columns::<Self>(a);
        let mut out = [[0.0; 4]; 4];
        for (dst, rhs) in out.iter_mut().zip(b) {
            *dst = Self::store(combine::<Self>(&cols, rhs));
        }
        out
    }

    /// `m * v` with `v` as a column vector.
    #[inline]
    fn mat_mul_vec(m: &Columns, v: &Lanes) -> Lanes {
        Self::store(combine::<Self>(&load_columns::<Self>(m), v))
    }

    /// `v * m` with `v` as a row vector: lane `j` is `dot(v, m[j])`.
    #[inline]
    fn vec_mul_mat(v: &Lanes, m: &Columns) -> Lanes {
        let row = Self::load(v);
        let mut out = [0.0; 4];
        for (dst, col) in out.iter_mut().zip(m) {
            *dst = Self::hsum(Self::mul(row, Self::load(col)));
        }
        out
    }

    /// Component-wise product.
    #[inline]
    fn comp_mul(a: &Columns, b: &Columns) -> Columns {
        let mut out = [[0.0; 4]; 4];
        for ((dst, x), y) in out.iter_mut().zip(a).zip(b) {
            *dst = Self::store(Self::mul(Self::load(x), Self::load(y)));
        }
        out
    }

    /// `c * r^T`: column `j` is `c * r[j]`.
    #[inline]
    fn outer(c: &Lanes, r: &Lanes) -> Columns {
        let col = Self::load(c);
        let mut out = [[0.0; 4]; 4];
        for (dst, &s) in out.iter_mut().zip(r) {
            *dst = Self::store(Self::mul(col, Self::splat(s)));
        }
        out
    }

    #[inline]
    fn determinant(m: &Columns) -> f32 {
        BlockParts::<Self>::new(m).determinant()
    }

    /// Closed-form inverse. Undefined when the determinant is zero.
    #[inline]
    fn inverse(m: &Columns) -> Columns {
        BlockParts::<Self>::new(m).inverse()
    }
}

#[inline(always)]
fn load_columns<K: Float4Kernel + ?Sized>(m: &Columns) -> [K::Reg; 4] {
    [K::load(&m[0]), K::load(&m[1]), K::load(&m[2]), K::load(&m[3])]
}

/// `sum_k cols[k] * weights[k]`.
#[inline(always)]
fn combine<K: Float4Kernel + ?Sized>(cols: &[K::Reg; 4], weights: &Lanes) -> K::Reg {
    let mut acc = K::mul(cols[0], K::splat(weights[0]));
    for k in 1..4 {
        acc = K::add(acc, K::mul(cols[k], K::splat(weights[k])));
    }
    acc
}

// 2x2 blocks packed as (m00, m01, m10, m11), row-major within the block.

#[inline(always)]
fn mat2_mul<K: Float4Kernel + ?Sized>(a: K::Reg, b: K::Reg) -> K::Reg {
    K::add(
        K::mul(a, swizzle!(K, b, 0, 3, 0, 3)),
        K::mul(swizzle!(K, a, 1, 0, 3, 2), swizzle!(K, b, 2, 1, 2, 1)),
    )
}

/// `adj(a) * b`
#[inline(always)]
fn mat2_adj_mul<K: Float4Kernel + ?Sized>(a: K::Reg, b: K::Reg) -> K::Reg {
    K::sub(
        K::mul(swizzle!(K, a, 3, 3, 0, 0), b),
        K::mul(swizzle!(K, a, 1, 1, 2, 2), swizzle!(K, b, 2, 3, 0, 1)),
    )
}

/// `a * adj(b)`
#[inline(always)]
fn mat2_mul_adj<K: Float4Kernel + ?Sized>(a: K::Reg, b: K::Reg) -> K::Reg {
    K::sub(
        K::mul(a, swizzle!(K, b, 3, 0, 3, 0)),
        K::mul(swizzle!(K, a, 1, 0, 3, 2), swizzle!(K, b, 2, 1, 2, 1)),
    )
}

/// 2x2 block decomposition of a 4x4 matrix.
///
/// The columns are treated as the rows of the transpose, which has the same
/// determinant and whose inverse, read back row by row, is the inverse of the
/// original read column by column.
struct BlockParts<K: Float4Kernel + ?Sized> {
    a: K::Reg,
    b: K::Reg,
    c: K::Reg,
    d: K::Reg,
    det_a: K::Reg,
    det_b: K::Reg,
    det_c: K::Reg,
    det_d: K::Reg,
    d_c: K::Reg,
    a_b: K::Reg,
}

impl<K: Float4Kernel + ?Sized> BlockParts<K> {
    #[inline(always)]
    fn new(m: &Columns) -> Self {
        let [r0, r1, r2, r3] = load_columns::<K>(m);

        let a = shuffle!(K, r0, r1, 0, 1, 0, 1);
        let b = shuffle!(K, r0, r1, 2, 3, 2, 3);
        let c = shuffle!(K, r2, r3, 0, 1, 0, 1);
        let d = shuffle!(K, r2, r3, 2, 3, 2, 3);

        // (|A|, |B|, |C|, |D|)
        let det_sub = K::sub(
            K::mul(shuffle!(K, r0, r2, 0, 2, 0, 2), shuffle!(K, r1, r3, 1, 3, 1, 3)),
            K::mul(shuffle!(K, r0, r2, 1, 3, 1, 3), shuffle!(K, r1, r3, 0, 2, 0, 2)),
        );

        BlockParts {
            a,
            b,
            c,
            d,
            det_a: swizzle!(K, det_sub, 0, 0, 0, 0),
            det_b: swizzle!(K, det_sub, 1, 1, 1, 1),
            det_c: swizzle!(K, det_sub, 2, 2, 2, 2),
            det_d: swizzle!(K, det_sub, 3, 3, 3, 3),
            d_c: mat2_adj_mul::<K>(d, c),
            a_b: mat2_adj_mul::<K>(a, b),
        }
    }

    /// `|A||D| + |B||C| - tr(adj(A)B adj(D)C)`, broadcast.
    #[inline(always)]
    fn det_splat(&self) -> K::Reg {
        let trace = K::hsum(K::mul(self.a_b, swizzle!(K, self.d_c, 0, 2, 1, 3)));
        let det = K::add(K::mul(self.det_a, self.det_d), K::mul(self.det_b, self.det_c));
        K::sub(det, K::splat(trace))
    }

    #[inline(always)]
    fn determinant(&self) -> f32 {
        K::store(self.det_splat())[0]
    }

    #[inline(always)]
    fn inverse(&self) -> Columns {
        let x = K::sub(K::mul(self.det_d, self.a), mat2_mul::<K>(self.b, self.d_c));
        let w = K::sub(K::mul(self.det_a, self.d), mat2_mul::<K>(self.c, self.a_b));
        let y = K::sub(K::mul(self.det_b, self.c), mat2_mul_adj::<K>(self.d, self.a_b));
        let z = K::sub(K::mul(self.det_c, self.b), mat2_mul_adj::<K>(self.a, self.d_c));

        let r_det = K::div(K::load(&[1.0, -1.0, -1.0, 1.0]), self.det_splat());
        let x = K::mul(x, r_det);
        let y = K::mul(y, r_det);
        let z = K::mul(z, r_det);
        let w = K::mul(w, r_det);

        [
            K::store(shuffle!(K, x, y, 3, 1, 3, 1)),
            K::store(shuffle!(K, x, y, 2, 0, 2, 0)),
            K::store(shuffle!(K, z, w, 3, 1, 3, 1)),
            K::store(shuffle!(K, z, w, 2, 0, 2, 0)),
        ]
    }
}
