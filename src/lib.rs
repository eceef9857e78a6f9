//! Powers of Tau trusted setup multi-party computation.
//!
//! Participants take turns multiplying a secret into an [`Accumulator`] of
//! powers of tau in G1 and G2. Each contribution comes with a [`PublicKey`]
//! that lets anyone check the update was applied honestly to the previous
//! accumulator, without learning the secret. Once the ceremony is over the
//! accumulator can be converted into the Lagrange basis over an evaluation
//! domain with [`Radix`].
//!
//! (https://eprint.iacr.org/2017/1050)
pub mod accumulator;
pub mod ceremony;
pub mod envelope;
pub mod error;
pub mod io;
pub mod keypair;
pub mod parameters;
pub mod proof_of_knowledge;
pub mod radix;
pub mod serialisation;

pub use accumulator::Accumulator;
pub use ceremony::{contribute_randomness, init_ceremony, verify_contribution, Ceremony};
pub use error::{CeremonyError, FormatError, UsageError};
pub use keypair::{PrivateKey, PublicKey};
pub use parameters::{CeremonyCurve, Curve, Parameters, PointEncoding};
pub use radix::Radix;
