//! Systematic Reed-Solomon forward error correction over GF(2^8)
//!
//! A codec built for `k` required and `n` total shares expands a buffer of
//! `k * B` bytes into `n` shares of `B` bytes each. Any `k` of the shares
//! reconstruct the original buffer, and when more than `k` are available
//! the Berlekamp-Welch corrector repairs up to `(n - k) / 2` corrupted
//! shares per byte position in place.
//!
//! The code is systematic: the first `k` shares are verbatim copies of the
//! input blocks, so the common no-loss case is a plain concatenation.
//!
//! ```
//! use rsfec::{Fec, Share};
//!
//! let fec = Fec::new(4, 8)?;
//!
//! let data = b"some data to protect, 4x8 bytes.";
//! let mut shares = Vec::new();
//! fec.encode(data, |num, block| {
//!     shares.push(Share::new(num, block.to_vec()));
//! })?;
//!
//! // lose half of the shares, keep any 4
//! shares.retain(|share| share.num % 2 == 1);
//!
//! let mut recovered = vec![0u8; data.len()];
//! let written = fec.decode(&mut shares, &mut recovered)?;
//! assert_eq!(&recovered[..written], data);
//! # Ok::<(), rsfec::Error>(())
//! ```

pub mod error;
pub mod fec;
pub mod gf;

pub use error::{Error, Result};
pub use fec::{Fec, Share, MAX_SHARES};
