//! Polynomials with coefficients in GF(2^8)
//!
//! Coefficients are stored highest degree first. A `skip` offset marks
//! leading coefficients as logically removed, so stripping zeros during
//! long division never reallocates.

use super::Gf;
use crate::error::{Error, Result};

/// A polynomial over GF(2^8), coefficients in descending degree order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfPoly {
    coeffs: Vec<Gf>,
    skip: usize,
}

impl GfPoly {
    /// An empty polynomial, coefficients pushed later.
    pub fn empty() -> Self {
        GfPoly {
            coeffs: Vec::new(),
            skip: 0,
        }
    }

    /// The zero polynomial with `len` coefficient slots.
    pub fn zero(len: usize) -> Self {
        GfPoly {
            coeffs: vec![Gf::ZERO; len],
            skip: 0,
        }
    }

    pub fn from_coeffs(coeffs: Vec<Gf>) -> Self {
        GfPoly { coeffs, skip: 0 }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        GfPoly {
            coeffs: bytes.iter().map(|&b| Gf::new(b)).collect(),
            skip: 0,
        }
    }

    /// Number of coefficients, shifted prefix excluded.
    pub fn len(&self) -> usize {
        self.coeffs.len() - self.skip
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Degree; the polynomial must be non-empty.
    pub fn deg(&self) -> usize {
        debug_assert!(!self.is_empty());
        self.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.as_slice().iter().all(|c| c.is_zero())
    }

    fn as_slice(&self) -> &[Gf] {
        &self.coeffs[self.skip..]
    }

    /// The coefficient stored first, i.e. the one of highest degree.
    fn lead(&self) -> Gf {
        self.coeffs[self.skip]
    }

    /// Coefficient of `x^power`, or zero when out of range.
    pub fn index(&self, power: usize) -> Gf {
        let s = self.as_slice();
        if power >= s.len() {
            return Gf::ZERO;
        }
        s[s.len() - 1 - power]
    }

    pub fn push(&mut self, coef: Gf) {
        self.coeffs.push(coef);
    }

    /// Drop the leading coefficient.
    fn shift(&mut self) {
        debug_assert!(!self.is_empty());
        self.skip += 1;
    }

    fn strip_leading_zeros(&mut self) {
        while !self.is_empty() && self.lead().is_zero() {
            self.shift();
        }
    }

    /// Append `count` zero coefficients on the low-order side.
    fn pad_low(&mut self, count: usize) {
        self.coeffs.extend(std::iter::repeat(Gf::ZERO).take(count));
    }

    /// Coefficient-wise multiply by a scalar.
    pub fn scale(&self, factor: Gf) -> GfPoly {
        GfPoly {
            coeffs: self.as_slice().iter().map(|&c| c * factor).collect(),
            skip: 0,
        }
    }

    /// Coefficient-wise sum aligned by degree; the result has the longer
    /// length of the two.
    pub fn add(&self, b: &GfPoly) -> GfPoly {
        let len = self.len().max(b.len());
        let mut out = vec![Gf::ZERO; len];
        for power in 0..len {
            out[len - 1 - power] = self.index(power) + b.index(power);
        }
        GfPoly {
            coeffs: out,
            skip: 0,
        }
    }

    /// Euclidean long division; returns `(quotient, remainder)`.
    ///
    /// Fails with [`Error::DivideByZero`] when `b` is zero, and with
    /// [`Error::AlgebraError`] if a subtraction step leaves a nonzero
    /// leading coefficient.
    pub fn div(self, mut b: GfPoly) -> Result<(GfPoly, GfPoly)> {
        b.strip_leading_zeros();
        if b.is_empty() {
            return Err(Error::DivideByZero);
        }

        let mut p = self;
        p.strip_leading_zeros();
        if p.is_empty() {
            return Ok((GfPoly::zero(1), GfPoly::zero(1)));
        }

        let mut q = GfPoly::empty();
        while !p.is_empty() && b.deg() <= p.deg() {
            let coef = p.lead().div(b.lead())?;
            q.push(coef);

            let mut padded = b.scale(coef);
            padded.pad_low(p.deg() - padded.deg());

            p = p.add(&padded);
            if !p.lead().is_zero() {
                return Err(Error::AlgebraError);
            }
            p.shift();
        }

        // the remainder keeps at least one coefficient
        while p.len() > 1 && p.lead().is_zero() {
            p.shift();
        }

        Ok((q, p))
    }

    /// Horner evaluation at `x`.
    pub fn eval(&self, x: Gf) -> Gf {
        let mut out = Gf::ZERO;
        for &c in self.as_slice() {
            out = out * x + c;
        }
        out
    }
}
