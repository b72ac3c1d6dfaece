//! Encoding-matrix linear algebra
//!
//! Two routines back the codec setup and the rebuild path:
//!
//! - [`create_inverted_vdm`] fills a k×k block with the inverse of the
//!   Vandermonde matrix at the codec's evaluation points, computed directly
//!   from the Lagrange interpolation coefficients rather than by
//!   elimination.
//! - [`invert_matrix`] is a Gauss-Jordan inversion over a flat k×k byte
//!   buffer. Unlike [`GfMat::invert_with`](crate::gf::GfMat::invert_with)
//!   it searches the whole unreduced block for pivots and undoes the
//!   implied column permutation afterwards, so it tolerates any row order
//!   the share selection produces.

use crate::error::{Error, Result};
use crate::gf::{addmul, tables};

struct PivotSearcher {
    k: usize,
    ipiv: Vec<bool>,
}

impl PivotSearcher {
    fn new(k: usize) -> Self {
        PivotSearcher {
            k,
            ipiv: vec![false; k],
        }
    }

    fn search(&mut self, col: usize, matrix: &[u8]) -> Result<(usize, usize)> {
        let k = self.k;
        if !self.ipiv[col] && matrix[col * k + col] != 0 {
            self.ipiv[col] = true;
            return Ok((col, col));
        }

        for row in 0..k {
            if self.ipiv[row] {
                continue;
            }
            for i in 0..k {
                if !self.ipiv[i] && matrix[row * k + i] != 0 {
                    self.ipiv[i] = true;
                    return Ok((row, i));
                }
            }
        }

        Err(Error::SingularMatrix)
    }
}

/// Invert a k×k row-major matrix in place.
pub(crate) fn invert_matrix(matrix: &mut [u8], k: usize) -> Result<()> {
    debug_assert_eq!(matrix.len(), k * k);
    let t = tables();
    let mut pivot_searcher = PivotSearcher::new(k);
    let mut indxc = vec![0usize; k];
    let mut indxr = vec![0usize; k];
    let mut id_row = vec![0u8; k];
    let mut pivot_copy = vec![0u8; k];

    for col in 0..k {
        let (p_row, p_col) = pivot_searcher.search(col, matrix)?;

        // move the pivot onto the diagonal of its column
        if p_row != p_col {
            for i in 0..k {
                matrix.swap(p_row * k + i, p_col * k + i);
            }
        }

        indxr[col] = p_row;
        indxc[col] = p_col;

        let pivot_row = &mut matrix[p_col * k..p_col * k + k];
        let c = pivot_row[p_col];
        if c == 0 {
            return Err(Error::SingularMatrix);
        }

        if c != 1 {
            let c_inv = t.inverse[c as usize];
            pivot_row[p_col] = 1;
            let mul_c = &t.mul[c_inv as usize];
            for cell in pivot_row.iter_mut() {
                *cell = mul_c[*cell as usize];
            }
        }

        id_row[p_col] = 1;
        if matrix[p_col * k..p_col * k + k] != id_row[..] {
            pivot_copy.copy_from_slice(&matrix[p_col * k..p_col * k + k]);
            for i in 0..k {
                if i == p_col {
                    continue;
                }
                let row = &mut matrix[i * k..i * k + k];
                let c = row[p_col];
                row[p_col] = 0;
                addmul(row, &pivot_copy, c);
            }
        }
        id_row[p_col] = 0;
    }

    // undo the column permutation implied by the row swaps, most recent
    // pivot first
    for i in (0..k).rev() {
        if indxr[i] != indxc[i] {
            for row in 0..k {
                matrix.swap(row * k + indxr[i], row * k + indxc[i]);
            }
        }
    }

    Ok(())
}

/// Fill `vdm` (k×k, row-major) with the inverted Vandermonde matrix at the
/// codec's evaluation points.
///
/// The columns are the Lagrange basis coefficients at the points
/// {0, α, α², …} with α the field generator: `c` accumulates the master
/// polynomial, `b` the synthetic division by each point, and the
/// normalizer is inverted once per row.
pub(crate) fn create_inverted_vdm(vdm: &mut [u8], k: usize) {
    debug_assert!(vdm.len() >= k * k);
    if k == 1 {
        vdm[0] = 1;
        return;
    }

    let t = tables();
    let mut b = vec![0u8; k];
    let mut c = vec![0u8; k];

    c[k - 1] = 0;
    for i in 1..k {
        let mul_p_i = &t.mul[t.exp[i] as usize];
        for j in (k - 1 - (i - 1))..(k - 1) {
            c[j] ^= mul_p_i[c[j + 1] as usize];
        }
        c[k - 1] ^= t.exp[i];
    }

    for row in 0..k {
        let index = if row != 0 { t.exp[row] as usize } else { 0 };
        let mul_p_row = &t.mul[index];

        let mut norm = 1u8;
        b[k - 1] = 1;
        for i in (0..k - 1).rev() {
            b[i] = c[i + 1] ^ mul_p_row[b[i + 1] as usize];
            norm = b[i] ^ mul_p_row[norm as usize];
        }

        let mul_norm_inv = &t.mul[t.inverse[norm as usize] as usize];
        for col in 0..k {
            vdm[col * k + row] = mul_norm_inv[b[col] as usize];
        }
    }
}
