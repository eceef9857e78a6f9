// A proof of knowledge shows two things:
// - One knows the discrete log `x` relating the anchor of the accumulator
//   they contributed to and the commitment they published
// - The proof was produced for that exact accumulator, since the G2 base it
//   is checked against is derived from the accumulator digest
//
// Given an anchor A, the contributor publishes P = x * A and the pair
// (r, x * r) where r is hashed to G2 from the accumulator digest and P.
// Anyone can check e(A, x * r) == e(P, r) without learning `x`.

use ark_ec::{PairingEngine, ProjectiveCurve};
use ark_ff::{PrimeField, UniformRand, Zero};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::{parameters::PointEncoding, serialisation::write_points};

// Domain separation tag for the hash which derives the G2 challenge base
pub(crate) const POK_DOMAIN_SEPARATOR: &[u8] = b"powers-of-tau/proof-of-knowledge/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfKnowledge<E: PairingEngine> {
    // The G2 point derived from the accumulator digest and the commitment
    pub(crate) challenge: E::G2Projective,
    // The challenge point multiplied by the secret
    pub(crate) response: E::G2Projective,
}

impl<E: PairingEngine> ProofOfKnowledge<E> {
    /// Proves knowledge of `secret` such that `commitment = secret * anchor`.
    /// The anchor itself is not an input: it is fixed by `digest`.
    pub(crate) fn prove(secret: &E::Fr, digest: &[u8; 32], commitment: &E::G1Projective) -> Self {
        let challenge = challenge_point::<E>(digest, commitment);
        Self {
            challenge,
            response: challenge.mul(secret.into_repr()),
        }
    }

    pub(crate) fn verify(
        &self,
        digest: &[u8; 32],
        anchor: E::G1Projective,
        commitment: E::G1Projective,
    ) -> bool {
        if commitment.is_zero() || self.response.is_zero() {
            return false;
        }

        // The challenge has to be the one for this accumulator, otherwise the
        // proof was made for a different state
        if self.challenge != challenge_point::<E>(digest, &commitment) {
            return false;
        }

        same_ratio::<E>((anchor, commitment), (self.challenge, self.response))
    }
}

// Hashes the accumulator digest and the commitment into a point in G2
pub(crate) fn challenge_point<E: PairingEngine>(
    digest: &[u8; 32],
    commitment: &E::G1Projective,
) -> E::G2Projective {
    let mut commitment_bytes = Vec::new();
    write_points(&[*commitment], PointEncoding::Compressed, &mut commitment_bytes);

    let mut hasher = Sha256::new();
    hasher.update(POK_DOMAIN_SEPARATOR);
    hasher.update(digest);
    hasher.update(&commitment_bytes);

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hasher.finalize());

    let mut rng = ChaCha20Rng::from_seed(seed);
    E::G2Projective::rand(&mut rng)
}

// Checks that `g1.1 / g1.0 == g2.1 / g2.0` in the exponent
pub(crate) fn same_ratio<E: PairingEngine>(
    g1: (E::G1Projective, E::G1Projective),
    g2: (E::G2Projective, E::G2Projective),
) -> bool {
    E::pairing(g1.0, g2.1) == E::pairing(g1.1, g2.0)
}
