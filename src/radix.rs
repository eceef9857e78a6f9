// Converts a finished accumulator into the Lagrange basis over an evaluation
// domain, which is the form consumers that commit to polynomials in
// evaluation form need.
//
// For a domain of size m with generator w, the Lagrange polynomial L_i(X)
// evaluated at tau is (1/m) * sum_j w^{-ij} tau^j. That is exactly the inverse
// FFT of [tau^0, ..., tau^{m-1}], so the basis can be computed in the exponent
// from the first m powers without knowing tau.
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use tracing::info;

use crate::{
    accumulator::Accumulator,
    error::{CeremonyError, UsageError},
    parameters::CeremonyCurve,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Radix<E: CeremonyCurve> {
    // L_i(tau) * G_1 for each i in the domain
    pub(crate) coeffs_g1: Vec<E::G1Projective>,
    // L_i(tau) * G_2 for each i in the domain
    pub(crate) coeffs_g2: Vec<E::G2Projective>,
}

impl<E: CeremonyCurve> Radix<E> {
    pub fn from_accumulator(
        accumulator: &Accumulator<E>,
        requested: usize,
    ) -> Result<Radix<E>, CeremonyError> {
        let capacity = accumulator.num_powers();
        let domain = evaluation_domain::<E>(requested, capacity)?;
        let domain_size = domain.size();

        let mut coeffs_g1 = accumulator.tau_g1[..domain_size].to_vec();
        let mut coeffs_g2 = accumulator.tau_g2[..domain_size].to_vec();
        domain.ifft_in_place(&mut coeffs_g1);
        domain.ifft_in_place(&mut coeffs_g2);

        info!(requested, domain_size, "extracted lagrange basis");

        Ok(Radix {
            coeffs_g1,
            coeffs_g2,
        })
    }

    pub fn domain_size(&self) -> usize {
        self.coeffs_g1.len()
    }

    pub fn g1_elements(&self) -> &[E::G1Projective] {
        &self.coeffs_g1
    }

    pub fn g2_elements(&self) -> &[E::G2Projective] {
        &self.coeffs_g2
    }
}

// Smallest radix-2 domain holding at least `requested` elements, as long as
// it fits in `capacity` powers
fn evaluation_domain<E: CeremonyCurve>(
    requested: usize,
    capacity: usize,
) -> Result<Radix2EvaluationDomain<E::Fr>, CeremonyError> {
    if requested == 0 {
        return Err(UsageError::EmptyDomain.into());
    }
    let fits = requested
        .checked_next_power_of_two()
        .map_or(false, |rounded| rounded <= capacity);
    if !fits {
        return Err(UsageError::DomainTooLarge {
            requested,
            capacity,
        }
        .into());
    }
    Radix2EvaluationDomain::new(requested)
        .ok_or_else(|| UsageError::UnsupportedDomain(requested).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        keypair::PrivateKey,
        parameters::{Curve, Parameters, PointEncoding},
    };
    use ark_bls12_381::{Bls12_381, Fr, G1Projective, G2Projective};
    use ark_ec::ProjectiveCurve;
    use ark_ff::PrimeField;

    fn accumulator(num_powers: usize, secret: u64) -> Accumulator<Bls12_381> {
        let params = Parameters::new(Curve::Bls12_381, num_powers, PointEncoding::Compressed).unwrap();
        Accumulator::new(&params)
            .unwrap()
            .transform(&PrivateKey::from_u64(secret).unwrap())
    }

    #[test]
    fn domain_sizes_round_up() {
        let acc = accumulator(8, 5);
        for (requested, expected) in [(1, 1), (2, 2), (3, 4), (5, 8), (8, 8)] {
            let radix = Radix::from_accumulator(&acc, requested).unwrap();
            assert_eq!(radix.domain_size(), expected);
            assert_eq!(radix.g2_elements().len(), expected);
        }
    }

    #[test]
    fn rejects_domains_above_capacity() {
        let acc = accumulator(8, 5);
        assert!(matches!(
            Radix::from_accumulator(&acc, 9),
            Err(CeremonyError::Usage(UsageError::DomainTooLarge {
                requested: 9,
                capacity: 8
            }))
        ));
        // Rounding up would overflow
        for requested in [usize::MAX, usize::MAX / 2 + 2] {
            assert!(matches!(
                Radix::from_accumulator(&acc, requested),
                Err(CeremonyError::Usage(UsageError::DomainTooLarge { capacity: 8, .. }))
            ));
        }
        assert!(matches!(
            Radix::from_accumulator(&acc, 0),
            Err(CeremonyError::Usage(UsageError::EmptyDomain))
        ));
    }

    #[test]
    fn matches_lagrange_basis() {
        let secret = 1234u64;
        let acc = accumulator(8, secret);
        let tau = Fr::from(secret);

        let radix = Radix::from_accumulator(&acc, 4).unwrap();
        let domain = Radix2EvaluationDomain::<Fr>::new(4).unwrap();
        let lagrange = domain.evaluate_all_lagrange_coefficients(tau);

        let g1 = G1Projective::prime_subgroup_generator();
        let g2 = G2Projective::prime_subgroup_generator();
        for (i, l_i) in lagrange.iter().enumerate() {
            assert_eq!(radix.g1_elements()[i], g1.mul(l_i.into_repr()));
            assert_eq!(radix.g2_elements()[i], g2.mul(l_i.into_repr()));
        }
    }

    #[test]
    fn domain_of_one_is_the_generator() {
        let acc = accumulator(4, 77);
        let radix = Radix::from_accumulator(&acc, 1).unwrap();
        assert_eq!(radix.g1_elements(), &[G1Projective::prime_subgroup_generator()]);
        assert_eq!(radix.g2_elements(), &[G2Projective::prime_subgroup_generator()]);
    }
}
