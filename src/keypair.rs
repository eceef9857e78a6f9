use ark_ec::{PairingEngine, ProjectiveCurve};
use ark_ff::{PrimeField, UniformRand, Zero};
use rand::{CryptoRng, Rng};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    accumulator::Accumulator,
    error::{CeremonyError, UsageError},
    parameters::CeremonyCurve,
    proof_of_knowledge::ProofOfKnowledge,
    serialisation::decode_scalar,
};

/// The secret a participant contributes. It only lives for the duration of
/// one contribution and is overwritten when dropped.
pub struct PrivateKey<E: PairingEngine> {
    pub(crate) tau: E::Fr,
}

impl<E: PairingEngine> Zeroize for PrivateKey<E> {
    fn zeroize(&mut self) {
        self.tau.zeroize();
    }
}

impl<E: PairingEngine> Drop for PrivateKey<E> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<E: PairingEngine> ZeroizeOnDrop for PrivateKey<E> {}

/// What a participant publishes alongside their updated accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey<E: PairingEngine> {
    // The secret applied to the anchor of the accumulator that was contributed to
    pub(crate) proof_commitment: E::G1Projective,
    pub(crate) proof_of_knowledge: ProofOfKnowledge<E>,
}

impl<E: PairingEngine> PrivateKey<E> {
    // This function should only be used for testing purposes
    #[cfg(test)]
    pub(crate) fn from_u64(int: u64) -> Result<Self, CeremonyError> {
        Self::from_scalar(E::Fr::from(int))
    }

    fn from_scalar(tau: E::Fr) -> Result<Self, CeremonyError> {
        if tau.is_zero() {
            return Err(UsageError::ZeroScalar.into());
        }
        Ok(Self { tau })
    }

    /// Creates a private key from its canonical little-endian encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CeremonyError> {
        Self::from_scalar(decode_scalar(bytes)?)
    }

    // Creates a private key using entropy from a RNG. Zero is never returned, a
    // zero contribution would leave the accumulator untouched
    pub fn rand<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let tau = E::Fr::rand(rng);
            if !tau.is_zero() {
                return Self { tau };
            }
        }
    }

    /// Draws a fresh private key from the operating system's RNG.
    pub fn generate() -> Self {
        Self::rand(&mut rand::rngs::OsRng)
    }
}

impl<E: CeremonyCurve> PrivateKey<E> {
    /// Computes the public key which proves this key was applied to `accumulator`.
    pub fn to_public(&self, accumulator: &Accumulator<E>) -> PublicKey<E> {
        let proof_commitment = accumulator.anchor().mul(self.tau.into_repr());
        let proof_of_knowledge =
            ProofOfKnowledge::prove(&self.tau, &accumulator.digest(), &proof_commitment);

        PublicKey {
            proof_commitment,
            proof_of_knowledge,
        }
    }
}

impl<E: CeremonyCurve> PublicKey<E> {
    // Checks the proof of knowledge against the accumulator it claims to be
    // computed from
    pub(crate) fn verify_knowledge(&self, before: &Accumulator<E>) -> bool {
        self.proof_of_knowledge
            .verify(&before.digest(), before.anchor(), self.proof_commitment)
    }
}
