use ark_ec::{msm::VariableBaseMSM, wnaf::WnafContext, ProjectiveCurve};
use ark_ff::{PrimeField, UniformRand, Zero};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{
    error::{CeremonyError, UsageError},
    keypair::{PrivateKey, PublicKey},
    parameters::{CeremonyCurve, Parameters, PointEncoding},
    proof_of_knowledge::same_ratio,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Stores the powers of tau in G1 and G2, this is the structured reference
// string that the ceremony builds up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator<E: CeremonyCurve> {
    pub(crate) tau_g1: Vec<E::G1Projective>,
    pub(crate) tau_g2: Vec<E::G2Projective>,
}

impl<E: CeremonyCurve> Accumulator<E> {
    // Creates the starting point of a powers of tau ceremony, every element is
    // the generator of its group, ie tau = 1.
    // This is not compatible with the BGM17 Groth16 powers of tau ceremony (notice there is no \alpha, \beta)
    pub fn new(parameters: &Parameters) -> Result<Accumulator<E>, CeremonyError> {
        parameters.validate()?;
        parameters.check_curve::<E>()?;

        Ok(Self {
            tau_g1: vec![E::G1Projective::prime_subgroup_generator(); parameters.num_powers],
            tau_g2: vec![E::G2Projective::prime_subgroup_generator(); parameters.num_powers],
        })
    }

    pub fn num_powers(&self) -> usize {
        self.tau_g1.len()
    }

    pub fn g1_elements(&self) -> &[E::G1Projective] {
        &self.tau_g1
    }

    pub fn g2_elements(&self) -> &[E::G2Projective] {
        &self.tau_g2
    }

    // Checks that the accumulator has the shape the ceremony expects
    pub fn check_parameters(&self, parameters: &Parameters) -> Result<(), CeremonyError> {
        parameters.check_curve::<E>()?;
        for found in [self.tau_g1.len(), self.tau_g2.len()] {
            if found != parameters.num_powers {
                return Err(UsageError::SizeMismatch {
                    expected: parameters.num_powers,
                    found,
                }
                .into());
            }
        }
        Ok(())
    }

    // The degree-1 element in G1. Contributions are proven against it.
    // Index 0 is the generator in every accumulator, so only index 1 carries tau.
    // A ceremony with a single power has no tau to carry, so the generator is used
    pub(crate) fn anchor(&self) -> E::G1Projective {
        self.tau_g1
            .get(1)
            .copied()
            .unwrap_or_else(E::G1Projective::prime_subgroup_generator)
    }

    // Hash of the compressed accumulator, proofs of knowledge are bound to it
    pub fn digest(&self) -> [u8; 32] {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(self.serialise(PointEncoding::Compressed)));
        digest
    }

    // Returns a new accumulator where the i'th element of both groups has been
    // multiplied by private_key^i. The secret that has been accumulated so far
    // is never needed
    pub fn transform(&self, private_key: &PrivateKey<E>) -> Accumulator<E> {
        let mut updated = self.clone();
        updated.update_powers(private_key.tau);
        updated
    }

    // Updates the accumulator and produces the public key for this update
    pub fn update(&mut self, private_key: &PrivateKey<E>) -> PublicKey<E> {
        let public_key = private_key.to_public(self);
        self.update_powers(private_key.tau);
        public_key
    }

    // Updates the group elements using a users private key
    fn update_powers(&mut self, private_key: E::Fr) {
        let max_number_elements = std::cmp::max(self.tau_g1.len(), self.tau_g2.len());
        let powers_of_priv_key = vandemonde_challenge(private_key, max_number_elements);

        let wnaf = WnafContext::new(3);

        // tau^0 stays the generator
        ark_std::cfg_iter_mut!(self.tau_g1)
            .zip(ark_std::cfg_iter!(powers_of_priv_key))
            .skip(1)
            .for_each(|(tg1, priv_pow)| {
                *tg1 = wnaf.mul(*tg1, priv_pow);
            });

        ark_std::cfg_iter_mut!(self.tau_g2)
            .zip(ark_std::cfg_iter!(powers_of_priv_key))
            .skip(1)
            .for_each(|(tg2, priv_pow)| {
                *tg2 = wnaf.mul(*tg2, priv_pow);
            });
    }

    // Verify that a single update was applied to transition `before` to `after`
    //
    // Returns false, rather than an error, for any contribution that does not
    // check out. The check holds iff `after` is `before` with every power of
    // tau multiplied through by the secret that `public_key` proves knowledge of.
    pub fn verify_update(before: &Self, after: &Self, public_key: &PublicKey<E>) -> bool {
        // 1. Both accumulators belong to the same ceremony
        if before.tau_g1.len() != after.tau_g1.len() || before.tau_g2.len() != after.tau_g2.len()
        {
            debug!("accumulator sizes differ");
            return false;
        }

        // 2. The contributor knows the secret and used it on `before`
        if !public_key.verify_knowledge(before) {
            debug!("proof of knowledge does not verify against the previous accumulator");
            return false;
        }

        // 3. tau^0 is untouched
        if !before.starts_at_generators() || !after.starts_at_generators() {
            debug!("degree-0 elements are not the group generators");
            return false;
        }

        if after.num_powers() < 2 {
            return true;
        }

        // 4. `before` is itself a sequence of consecutive powers. Together with
        // steps 5 and 7 this gives after[k] = secret^k * before[k] for every k
        if !before.structure_check() {
            debug!("previous accumulator is not a sequence of consecutive powers");
            return false;
        }

        // 5. The new degree-1 element is the one the contributor committed to
        if after.tau_g1[1] != public_key.proof_commitment {
            debug!("degree-1 element does not match the proof commitment");
            return false;
        }

        // 6. Check that the degree-1 component is not the identity element
        // No need to check the other elements because the structure check will fail
        // if they are also not the identity element
        if after.tau_g1[1].is_zero() || after.tau_g2[1].is_zero() {
            debug!("degree-1 element is the identity");
            return false;
        }

        // 7. Check that the new accumulator goes up in incremental powers
        if !after.structure_check() {
            debug!("accumulator is not a sequence of consecutive powers");
            return false;
        }

        true
    }

    fn starts_at_generators(&self) -> bool {
        let g1_ok = self
            .tau_g1
            .first()
            .map_or(false, |p| *p == E::G1Projective::prime_subgroup_generator());
        let g2_ok = self
            .tau_g2
            .first()
            .map_or(false, |p| *p == E::G2Projective::prime_subgroup_generator());
        g1_ok && g2_ok
    }

    // Checks that each subsequent element is increasing the index of tau for
    // both G_1 and G_2 elements.
    //
    // Rather than one pairing check per element, the consecutive pairs are
    // folded with random coefficients rho_i:
    //   e(sum rho_i * tau^{i+1}, g2) == e(sum rho_i * tau^i, tau * g2)
    // A bad pair only survives with negligible probability.
    pub(crate) fn structure_check(&self) -> bool {
        if self.tau_g1.len() < 2 || self.tau_g2.len() < 2 {
            return true;
        }

        let (g1_lhs, g1_rhs) = power_pairs(&self.tau_g1);
        let (g2_lhs, g2_rhs) = power_pairs(&self.tau_g2);

        // Check G_1 elements
        let g1_ok = same_ratio::<E>((g1_lhs, g1_rhs), (self.tau_g2[0], self.tau_g2[1]));
        // Check G_2 elements
        let g2_ok = same_ratio::<E>((self.tau_g1[0], self.tau_g1[1]), (g2_lhs, g2_rhs));

        g1_ok && g2_ok
    }
}

// Folds the overlapping pairs (tau^i, tau^{i+1}) of `powers` into a single
// pair using random coefficients
fn power_pairs<G: ProjectiveCurve>(powers: &[G]) -> (G, G) {
    let mut rng = rand::thread_rng();
    let coefficients: Vec<_> = (0..powers.len() - 1)
        .map(|_| G::ScalarField::rand(&mut rng).into_repr())
        .collect();

    let bases = G::batch_normalization_into_affine(powers);
    let lhs = VariableBaseMSM::multi_scalar_mul(&bases[..bases.len() - 1], &coefficients);
    let rhs = VariableBaseMSM::multi_scalar_mul(&bases[1..], &coefficients);

    (lhs, rhs)
}

// [x, x^2, ..., x^n]
fn vandemonde_challenge<F: PrimeField>(x: F, n: usize) -> Vec<F> {
    let mut challenges: Vec<F> = Vec::with_capacity(n);
    let mut power = F::one();
    for _ in 0..n {
        challenges.push(power);
        power *= x;
    }
    challenges
}
