//! Error detection and correction
//!
//! The decode path runs in two stages. A syndrome check projects the
//! received shares onto the parity space of the code; a nonzero projection
//! at some byte position means at least one share is corrupted there. For
//! every such position the Berlekamp-Welch solver recovers the message
//! polynomial P and the error locator E from the linear system
//! P(x_i) = y_i · E(x_i), then re-evaluates P at every share's point to
//! repair the column in place.

use super::{Fec, Share};
use crate::error::{Error, Result};
use crate::gf::{addmul, dot, Gf, GfMat, GfPoly};
use log::{debug, trace};

/// The evaluation point of a share number: share 0 maps to the field zero,
/// share m to generator^(m-1).
fn eval_point(num: usize) -> Gf {
    if num == 0 {
        Gf::ZERO
    } else {
        Gf::GENERATOR.pow(num - 1)
    }
}

impl Fec {
    /// Detect and repair corrupted shares in place.
    ///
    /// Shares are sorted by number as a side effect. Up to
    /// `(shares.len() - k) / 2` corrupted shares per byte position can be
    /// repaired; beyond that the call fails with [`Error::TooManyErrors`]
    /// and the share bytes may be left partially updated.
    pub fn correct(&self, shares: &mut [Share]) -> Result<()> {
        self.sort_and_check(shares)?;

        let synd = self.syndrome_matrix(shares)?;
        trace!("syndrome matrix:\n{synd}");
        let mut buf = vec![0u8; shares[0].data.len()];

        for i in 0..synd.rows() {
            buf.fill(0);

            for j in 0..synd.cols() {
                addmul(&mut buf, &shares[j].data, synd.get(i, j).value());
            }

            for j in 0..buf.len() {
                if buf[j] == 0 {
                    continue;
                }
                debug!("corruption detected at byte position {j}");
                let data = self.berlekamp_welch(shares, j)?;
                for share in shares.iter_mut() {
                    share.data[j] = data[share.num];
                }
            }
        }

        Ok(())
    }

    /// Correct the shares, then rebuild the original blocks through
    /// `output`. See [`correct`](Self::correct) and
    /// [`rebuild`](Self::rebuild).
    pub fn decode_to<F>(&self, shares: &mut [Share], output: F) -> Result<()>
    where
        F: FnMut(usize, &[u8]),
    {
        self.correct(shares)?;
        self.rebuild(shares, output)
    }

    /// Correct the shares, rebuild the original data and concatenate it
    /// into `dst`. Returns the number of bytes written, which is always
    /// `k` times the share length.
    pub fn decode(&self, shares: &mut [Share], dst: &mut [u8]) -> Result<usize> {
        self.correct(shares)?;

        let piece_len = shares[0].data.len();
        let result_len = piece_len * self.required();
        if dst.len() < result_len {
            return Err(Error::InvalidOutputLength {
                len: dst.len(),
                expected: result_len,
            });
        }

        self.rebuild(shares, |num, data| {
            dst[num * piece_len..num * piece_len + data.len()].copy_from_slice(data);
        })?;

        Ok(result_len)
    }

    /// Recover the full column of share bytes at `index` by solving the
    /// Berlekamp-Welch system over the first q+e shares. Returns one byte
    /// per share number in `[0, n)`.
    fn berlekamp_welch(&self, shares: &[Share], index: usize) -> Result<Vec<u8>> {
        let k = self.required();
        let r = shares.len(); // required + redundancy
        let e = (r - k) / 2; // deg of E polynomial
        let q = e + k; // deg of Q polynomial

        if e == 0 {
            return Err(Error::NotEnoughShares {
                have: r,
                need: k + 2,
            });
        }

        let dim = q + e;

        // build the system of equations s * u = f
        let mut s = GfMat::new(dim, dim); // constraint matrix
        let mut a = GfMat::new(dim, dim); // augmented matrix
        let mut f = vec![0u8; dim]; // constant column vector
        let mut u = vec![0u8; dim]; // solution vector

        for i in 0..dim {
            let x_i = eval_point(shares[i].num);
            let r_i = Gf::new(shares[i].data[index]);

            f[i] = (x_i.pow(e) * r_i).value();

            for j in 0..q {
                s.set(i, j, x_i.pow(j));
                if i == j {
                    a.set(i, j, Gf::ONE);
                }
            }

            for t in 0..e {
                let j = t + q;
                s.set(i, j, x_i.pow(t) * r_i);
                if i == j {
                    a.set(i, j, Gf::ONE);
                }
            }
        }

        // invert and put the result in a
        s.invert_with(&mut a)?;

        for (i, out) in u.iter_mut().enumerate() {
            *out = dot(a.row(i), &f).value();
        }

        // reverse u for easier construction of the polynomials
        u.reverse();

        let q_poly = GfPoly::from_bytes(&u[e..]);
        let mut e_coeffs = Vec::with_capacity(e + 1);
        e_coeffs.push(1u8);
        e_coeffs.extend_from_slice(&u[..e]);
        let e_poly = GfPoly::from_bytes(&e_coeffs);

        let (p_poly, rem) = q_poly.div(e_poly)?;
        if !rem.is_zero() {
            return Err(Error::TooManyErrors);
        }

        let mut out = vec![0u8; self.total()];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = p_poly.eval(eval_point(i)).value();
        }

        Ok(out)
    }

    /// The parity-check matrix restricted to the share numbers actually
    /// present: the corresponding Vandermonde columns, standardized and
    /// converted to parity form.
    fn syndrome_matrix(&self, shares: &[Share]) -> Result<GfMat> {
        let k = self.required();
        let n = self.total();

        let mut keepers = vec![false; n];
        let mut share_count = 0;
        for share in shares {
            if !keepers[share.num] {
                keepers[share.num] = true;
                share_count += 1;
            }
        }

        // vandermonde matrix, with the columns of missing shares skipped
        let vand = self.vand_matrix();
        let mut out = GfMat::new(k, share_count);
        for i in 0..k {
            let mut skipped = 0;
            for j in 0..n {
                if !keepers[j] {
                    skipped += 1;
                    continue;
                }
                out.set(i, j - skipped, Gf::new(vand[i * n + j]));
            }
        }

        // standardize and convert into parity form
        out.standardize()?;
        Ok(out.parity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fec;

    fn encoded_shares(fec: &Fec, data: &[u8]) -> Vec<Share> {
        let mut shares = Vec::new();
        fec.encode(data, |num, block| {
            shares.push(Share::new(num, block.to_vec()));
        })
        .unwrap();
        shares
    }

    #[test]
    fn test_eval_points() {
        assert_eq!(eval_point(0), Gf::ZERO);
        assert_eq!(eval_point(1), Gf::ONE);
        assert_eq!(eval_point(2), Gf::new(2));
        assert_eq!(eval_point(5), Gf::new(16));
    }

    #[test]
    fn test_berlekamp_welch_recovery_vector() {
        let fec = Fec::new(3, 7).unwrap();
        let shares = encoded_shares(&fec, &[0x01, 0x02, 0x03]);

        let out = fec.berlekamp_welch(&shares, 0).unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0x15, 0x69, 0xcc, 0xf2]);
    }

    #[test]
    fn test_berlekamp_welch_ignores_corruption_within_radius() {
        let fec = Fec::new(3, 7).unwrap();
        let mut shares = encoded_shares(&fec, &[0x01, 0x02, 0x03]);

        // (7 - 3) / 2 = 2 errors are recoverable
        shares[1].data[0] ^= 0x5A;
        shares[5].data[0] ^= 0x11;

        let out = fec.berlekamp_welch(&shares, 0).unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0x15, 0x69, 0xcc, 0xf2]);
    }

    #[test]
    fn test_berlekamp_welch_needs_redundancy() {
        let fec = Fec::new(3, 7).unwrap();
        let shares = encoded_shares(&fec, &[0x01, 0x02, 0x03]);

        let err = fec.berlekamp_welch(&shares[..4], 0).unwrap_err();
        assert!(matches!(err, Error::NotEnoughShares { have: 4, need: 5 }));
    }

    #[test]
    fn test_syndrome_matrix_annihilates_codewords() {
        let fec = Fec::new(3, 7).unwrap();
        let shares = encoded_shares(&fec, &[0x0A, 0x0B, 0x0C]);

        let synd = fec.syndrome_matrix(&shares).unwrap();
        assert_eq!(synd.rows(), 4);
        assert_eq!(synd.cols(), 7);

        for i in 0..synd.rows() {
            let mut acc = 0u8;
            for j in 0..synd.cols() {
                acc ^= (synd.get(i, j) * Gf::new(shares[j].data[0])).value();
            }
            assert_eq!(acc, 0, "syndrome row {i} did not vanish");
        }
    }

    #[test]
    fn test_correct_is_noop_on_clean_shares() {
        let fec = Fec::new(3, 7).unwrap();
        let data: Vec<u8> = (0..30).collect();
        let mut shares = encoded_shares(&fec, &data);
        let pristine = shares.clone();

        fec.correct(&mut shares).unwrap();
        assert_eq!(shares, pristine);
    }
}
