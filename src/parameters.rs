use std::fmt;

use ark_ec::{AffineCurve, PairingEngine};
use ark_serialize::CanonicalSerialize;
use serde::{Deserialize, Serialize};

use crate::error::{CeremonyError, UsageError};

// The ceremony size used by the original trusted setup tool
pub const DEFAULT_NUM_POWERS: usize = 32;

// Largest ceremony supported. Radix-2 domains over the BN254 scalar field stop
// at 2^28 elements, BLS12-381 goes up to 2^32
pub const MAX_NUM_POWERS: usize = 1 << 28;

// Width of the domain size header at the start of a result file
pub const RADIX_HEADER_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Curve {
    #[value(name = "bls12-381")]
    #[serde(rename = "bls12-381")]
    Bls12_381,
    Bn254,
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Bls12_381 => write!(f, "bls12-381"),
            Curve::Bn254 => write!(f, "bn254"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PointEncoding {
    Compressed,
    Uncompressed,
}

/// A pairing engine the ceremony knows how to run over.
pub trait CeremonyCurve: PairingEngine {
    const CURVE: Curve;
}

impl CeremonyCurve for ark_bls12_381::Bls12_381 {
    const CURVE: Curve = Curve::Bls12_381;
}

impl CeremonyCurve for ark_bn254::Bn254 {
    const CURVE: Curve = Curve::Bn254;
}

/// Describes one ceremony profile: which curve it runs over, how many powers
/// of tau it holds and how group elements are laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub curve: Curve,
    pub num_powers: usize,
    pub encoding: PointEncoding,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            curve: Curve::Bls12_381,
            num_powers: DEFAULT_NUM_POWERS,
            encoding: PointEncoding::Compressed,
        }
    }
}

impl Parameters {
    pub fn new(
        curve: Curve,
        num_powers: usize,
        encoding: PointEncoding,
    ) -> Result<Self, CeremonyError> {
        let parameters = Parameters {
            curve,
            num_powers,
            encoding,
        };
        parameters.validate()?;
        Ok(parameters)
    }

    /// Loads a profile from its JSON description.
    pub fn from_json(json: &str) -> Result<Self, CeremonyError> {
        let parameters: Parameters = serde_json::from_str(json)?;
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn validate(&self) -> Result<(), CeremonyError> {
        if !self.num_powers.is_power_of_two() || self.num_powers > MAX_NUM_POWERS {
            return Err(UsageError::InvalidNumPowers(self.num_powers).into());
        }
        Ok(())
    }

    // Checks that these parameters were written for the curve `E`
    pub fn check_curve<E: CeremonyCurve>(&self) -> Result<(), CeremonyError> {
        if self.curve != E::CURVE {
            return Err(UsageError::CurveMismatch {
                configured: self.curve,
                requested: E::CURVE,
            }
            .into());
        }
        Ok(())
    }

    pub fn g1_size<E: CeremonyCurve>(&self) -> usize {
        encoded_size(&E::G1Affine::prime_subgroup_generator(), self.encoding)
    }

    pub fn g2_size<E: CeremonyCurve>(&self) -> usize {
        encoded_size(&E::G2Affine::prime_subgroup_generator(), self.encoding)
    }

    // The size helpers saturate instead of wrapping, so parameters that skipped
    // `validate` can never make a short input pass a length check
    pub fn accumulator_size<E: CeremonyCurve>(&self) -> usize {
        self.num_powers
            .saturating_mul(self.g1_size::<E>() + self.g2_size::<E>())
    }

    // proof commitment in G1, then the challenge and response points in G2
    pub fn public_key_size<E: CeremonyCurve>(&self) -> usize {
        self.g1_size::<E>() + 2 * self.g2_size::<E>()
    }

    pub fn response_size<E: CeremonyCurve>(&self) -> usize {
        self.accumulator_size::<E>()
            .saturating_add(self.public_key_size::<E>())
    }

    pub fn radix_size<E: CeremonyCurve>(&self, domain_size: usize) -> usize {
        domain_size
            .saturating_mul(self.g1_size::<E>() + self.g2_size::<E>())
            .saturating_add(RADIX_HEADER_SIZE)
    }
}

fn encoded_size<P: CanonicalSerialize>(point: &P, encoding: PointEncoding) -> usize {
    match encoding {
        PointEncoding::Compressed => point.serialized_size(),
        PointEncoding::Uncompressed => point.uncompressed_size(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_bn254::Bn254;

    #[test]
    fn rejects_sizes_that_are_not_powers_of_two() {
        for num_powers in [0, 3, 6, 33] {
            assert!(Parameters::new(Curve::Bls12_381, num_powers, PointEncoding::Compressed).is_err());
        }
        for num_powers in [1, 2, 32, 1024, MAX_NUM_POWERS] {
            assert!(Parameters::new(Curve::Bls12_381, num_powers, PointEncoding::Compressed).is_ok());
        }
    }

    #[test]
    fn rejects_oversized_ceremonies() {
        let huge = (usize::MAX >> 1) + 1;
        for num_powers in [MAX_NUM_POWERS * 2, huge] {
            assert!(matches!(
                Parameters::new(Curve::Bls12_381, num_powers, PointEncoding::Compressed),
                Err(CeremonyError::Usage(UsageError::InvalidNumPowers(n))) if n == num_powers
            ));
        }

        // Built by hand, bypassing `validate`
        let params = Parameters {
            num_powers: huge,
            ..Parameters::default()
        };
        assert_eq!(params.accumulator_size::<Bls12_381>(), usize::MAX);
        assert_eq!(params.response_size::<Bls12_381>(), usize::MAX);
        assert_eq!(params.radix_size::<Bls12_381>(huge), usize::MAX);
        assert!(crate::Accumulator::<Bls12_381>::deserialise(&[], &params).is_err());
    }

    #[test]
    fn point_widths() {
        let compressed = Parameters::default();
        assert_eq!(compressed.g1_size::<Bls12_381>(), 48);
        assert_eq!(compressed.g2_size::<Bls12_381>(), 96);

        let uncompressed = Parameters {
            encoding: PointEncoding::Uncompressed,
            ..compressed
        };
        assert_eq!(uncompressed.g1_size::<Bls12_381>(), 96);
        assert_eq!(uncompressed.g2_size::<Bls12_381>(), 192);

        let bn = Parameters {
            curve: Curve::Bn254,
            ..compressed
        };
        assert_eq!(bn.g1_size::<Bn254>(), 32);
        assert_eq!(bn.g2_size::<Bn254>(), 64);
        assert_eq!(bn.accumulator_size::<Bn254>(), 32 * (32 + 64));
    }

    #[test]
    fn curve_mismatch_is_a_usage_error() {
        let params = Parameters::default();
        assert!(params.check_curve::<Bls12_381>().is_ok());
        assert!(matches!(
            params.check_curve::<Bn254>(),
            Err(CeremonyError::Usage(UsageError::CurveMismatch { .. }))
        ));
    }

    #[test]
    fn profile_from_json() {
        let params = Parameters::from_json(
            r#"{ "curve": "bn254", "num_powers": 64, "encoding": "uncompressed" }"#,
        )
        .unwrap();
        assert_eq!(params.curve, Curve::Bn254);
        assert_eq!(params.num_powers, 64);
        assert_eq!(params.encoding, PointEncoding::Uncompressed);

        let bad_size =
            Parameters::from_json(r#"{ "curve": "bn254", "num_powers": 5, "encoding": "compressed" }"#);
        assert!(matches!(
            bad_size,
            Err(CeremonyError::Usage(UsageError::InvalidNumPowers(5)))
        ));

        let bad_json = Parameters::from_json(r#"{ "curve": "secp256k1" }"#);
        assert!(matches!(
            bad_json,
            Err(CeremonyError::Usage(UsageError::Profile(_)))
        ));
    }
}
