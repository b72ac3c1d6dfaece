//! Matrices over GF(2^8)
//!
//! Row-major byte matrices with the row operations needed for Gauss-Jordan
//! elimination. Row elimination goes through the `addmul` kernel, so the
//! same inner loop serves encoding and linear algebra.

use super::addmul::addmul;
use super::{tables, Gf};
use crate::error::Result;
use std::fmt;

/// A row-major matrix of GF(2^8) values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfMat {
    d: Vec<u8>,
    r: usize,
    c: usize,
}

impl GfMat {
    /// A zero matrix with `r` rows and `c` columns.
    pub fn new(r: usize, c: usize) -> Self {
        GfMat {
            d: vec![0; r * c],
            r,
            c,
        }
    }

    pub fn rows(&self) -> usize {
        self.r
    }

    pub fn cols(&self) -> usize {
        self.c
    }

    fn idx(&self, i: usize, j: usize) -> usize {
        self.c * i + j
    }

    pub fn get(&self, i: usize, j: usize) -> Gf {
        Gf::new(self.d[self.idx(i, j)])
    }

    pub fn set(&mut self, i: usize, j: usize, val: Gf) {
        let idx = self.idx(i, j);
        self.d[idx] = val.value();
    }

    pub fn row(&self, i: usize) -> &[u8] {
        &self.d[self.idx(i, 0)..self.idx(i + 1, 0)]
    }

    pub fn swap_row(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for col in 0..self.c {
            let a = self.idx(i, col);
            let b = self.idx(j, col);
            self.d.swap(a, b);
        }
    }

    pub fn scale_row(&mut self, i: usize, val: Gf) {
        let mul_val = &tables().mul[val.value() as usize];
        let start = self.idx(i, 0);
        for cell in &mut self.d[start..start + self.c] {
            *cell = mul_val[*cell as usize];
        }
    }

    /// XOR `val` times row `src` into row `dst`.
    pub fn addmul_row(&mut self, src: usize, dst: usize, val: Gf) {
        debug_assert_ne!(src, dst);
        let c = self.c;
        let split = self.c * src.max(dst);
        let (lo, hi) = self.d.split_at_mut(split);
        let (src_row, dst_row) = if src < dst {
            (&lo[src * c..src * c + c], &mut hi[..c])
        } else {
            let (s, d): (&[u8], &mut [u8]) = (&hi[..c], &mut lo[dst * c..dst * c + c]);
            (s, d)
        };
        addmul(dst_row, src_row, val.value());
    }

    /// In-place Gauss-Jordan inversion with a paired matrix.
    ///
    /// `a` must be the identity on entry; on return `self` has been reduced
    /// and `a` holds the inverse. A column with no usable pivot is skipped,
    /// mirroring the fact that every matrix inverted on the correction path
    /// is non-singular by construction.
    pub fn invert_with(&mut self, a: &mut GfMat) -> Result<()> {
        for i in 0..self.r {
            let mut p_row = i;
            let mut p_val = self.get(i, i);
            let mut j = i + 1;
            while j < self.r && p_val.is_zero() {
                p_row = j;
                p_val = self.get(j, i);
                j += 1;
            }
            if p_val.is_zero() {
                continue;
            }

            if p_row != i {
                self.swap_row(i, p_row);
                a.swap_row(i, p_row);
            }

            let inv = p_val.inv()?;
            self.scale_row(i, inv);
            a.scale_row(i, inv);

            for j in i + 1..self.r {
                let leading = self.get(j, i);
                self.addmul_row(i, j, leading);
                a.addmul_row(i, j, leading);
            }
        }

        for i in (1..self.r).rev() {
            for j in (0..i).rev() {
                let trailing = self.get(j, i);
                self.addmul_row(i, j, trailing);
                a.addmul_row(i, j, trailing);
            }
        }

        Ok(())
    }

    /// Reduce the leftmost square block to the identity, in place.
    pub fn standardize(&mut self) -> Result<()> {
        for i in 0..self.r {
            let mut p_row = i;
            let mut p_val = self.get(i, i);
            let mut j = i + 1;
            while j < self.r && p_val.is_zero() {
                p_row = j;
                p_val = self.get(j, i);
                j += 1;
            }
            if p_val.is_zero() {
                continue;
            }

            if p_row != i {
                self.swap_row(i, p_row);
            }

            let inv = p_val.inv()?;
            self.scale_row(i, inv);

            for j in i + 1..self.r {
                let leading = self.get(j, i);
                self.addmul_row(i, j, leading);
            }
        }

        for i in (1..self.r).rev() {
            for j in (0..i).rev() {
                let trailing = self.get(j, i);
                self.addmul_row(i, j, trailing);
            }
        }

        Ok(())
    }

    /// Parity block of a standardized matrix.
    ///
    /// With `self` in standard form `[I_r | P]`, returns the
    /// `(c-r) × c` matrix `[P^T | I_(c-r)]`. The field has characteristic
    /// 2, so no negation is needed.
    pub fn parity(&self) -> GfMat {
        let out_rows = self.c - self.r;
        let mut out = GfMat::new(out_rows, self.c);

        for i in 0..out_rows {
            out.set(i, i + self.r, Gf::ONE);
        }

        for i in 0..out_rows {
            for j in 0..self.r {
                out.set(i, j, self.get(j, i + self.r));
            }
        }

        out
    }
}

impl fmt::Display for GfMat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.r {
            if i > 0 {
                writeln!(f)?;
            }
            for &b in self.row(i) {
                write!(f, "{b:02x}")?;
            }
        }
        Ok(())
    }
}
