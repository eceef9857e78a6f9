// Canonical encodings for scalars, points and the ceremony artifacts built from them.
//
// Points use the arkworks canonical encoding: little-endian field limbs with the
// flags packed into the most significant byte, either compressed (x only) or
// uncompressed (x and y). Decoding always checks that a point is on the curve
// and in the prime order subgroup.
use crate::{
    accumulator::Accumulator,
    error::{CeremonyError, FormatError},
    keypair::PublicKey,
    parameters::{CeremonyCurve, Parameters, PointEncoding, RADIX_HEADER_SIZE},
    proof_of_knowledge::ProofOfKnowledge,
    radix::Radix,
};
use ark_ec::{AffineCurve, ProjectiveCurve};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub fn encode_scalar<F: PrimeField>(scalar: &F) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(scalar.serialized_size());
    scalar
        .serialize(&mut bytes)
        .expect("writing into a vector cannot fail");
    bytes
}

// Rejects encodings that are not reduced modulo the field order
pub fn decode_scalar<F: PrimeField>(bytes: &[u8]) -> Result<F, FormatError> {
    let expected = F::zero().serialized_size();
    check_length("scalar", expected, bytes.len())?;

    let mut reader = bytes;
    F::deserialize(&mut reader).map_err(FormatError::Scalar)
}

pub(crate) fn write_point<P: CanonicalSerialize>(
    point: &P,
    encoding: PointEncoding,
    bytes: &mut Vec<u8>,
) {
    let written = match encoding {
        PointEncoding::Compressed => point.serialize(&mut *bytes),
        PointEncoding::Uncompressed => point.serialize_uncompressed(&mut *bytes),
    };
    written.expect("writing into a vector cannot fail")
}

pub(crate) fn write_points<G: ProjectiveCurve>(
    points: &[G],
    encoding: PointEncoding,
    bytes: &mut Vec<u8>,
) {
    for point in G::batch_normalization_into_affine(points) {
        write_point(&point, encoding, bytes);
    }
}

fn read_point<P: CanonicalDeserialize>(
    mut bytes: &[u8],
    encoding: PointEncoding,
) -> Result<P, SerializationError> {
    match encoding {
        PointEncoding::Compressed => P::deserialize(&mut bytes),
        PointEncoding::Uncompressed => P::deserialize_uncompressed(&mut bytes),
    }
}

// `bytes` must hold a whole number of `point_size` wide points
fn read_points<G: ProjectiveCurve>(
    bytes: &[u8],
    point_size: usize,
    encoding: PointEncoding,
    group: &'static str,
) -> Result<Vec<G>, FormatError> {
    ark_std::cfg_chunks!(bytes, point_size)
        .enumerate()
        .map(|(index, chunk)| {
            read_point::<G::Affine>(chunk, encoding)
                .map(|point| point.into_projective())
                .map_err(|source| FormatError::Point {
                    group,
                    index,
                    source,
                })
        })
        .collect()
}

fn check_length(artifact: &'static str, expected: usize, found: usize) -> Result<(), FormatError> {
    if expected != found {
        return Err(FormatError::Length {
            artifact,
            expected,
            found,
        });
    }
    Ok(())
}

impl<E: CeremonyCurve> Accumulator<E> {
    // Powers of tau in G1, followed by the powers of tau in G2
    pub fn serialise(&self, encoding: PointEncoding) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_points(&self.tau_g1, encoding, &mut bytes);
        write_points(&self.tau_g2, encoding, &mut bytes);
        bytes
    }

    // We do not check the structure of the powers when deserialising, that is
    // the job of the verifier. What we do check, is that every point is on the
    // curve and in the correct subgroup
    pub fn deserialise(bytes: &[u8], parameters: &Parameters) -> Result<Self, CeremonyError> {
        parameters.validate()?;
        parameters.check_curve::<E>()?;
        check_length(
            "accumulator",
            parameters.accumulator_size::<E>(),
            bytes.len(),
        )?;

        let g1_size = parameters.g1_size::<E>();
        let g2_size = parameters.g2_size::<E>();
        let (g1_bytes, g2_bytes) = bytes.split_at(parameters.num_powers * g1_size);

        Ok(Accumulator {
            tau_g1: read_points(g1_bytes, g1_size, parameters.encoding, "G1")?,
            tau_g2: read_points(g2_bytes, g2_size, parameters.encoding, "G2")?,
        })
    }
}

impl<E: CeremonyCurve> PublicKey<E> {
    pub fn serialise(&self, encoding: PointEncoding) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_points(&[self.proof_commitment], encoding, &mut bytes);
        write_points(
            &[
                self.proof_of_knowledge.challenge,
                self.proof_of_knowledge.response,
            ],
            encoding,
            &mut bytes,
        );
        bytes
    }

    pub fn deserialise(bytes: &[u8], parameters: &Parameters) -> Result<Self, CeremonyError> {
        parameters.check_curve::<E>()?;
        check_length(
            "public key",
            parameters.public_key_size::<E>(),
            bytes.len(),
        )?;

        let g1_size = parameters.g1_size::<E>();
        let g2_size = parameters.g2_size::<E>();
        let (g1_bytes, g2_bytes) = bytes.split_at(g1_size);

        let commitment: Vec<E::G1Projective> =
            read_points(g1_bytes, g1_size, parameters.encoding, "G1")?;
        let pok: Vec<E::G2Projective> = read_points(g2_bytes, g2_size, parameters.encoding, "G2")?;

        Ok(PublicKey {
            proof_commitment: commitment[0],
            proof_of_knowledge: ProofOfKnowledge {
                challenge: pok[0],
                response: pok[1],
            },
        })
    }
}

impl<E: CeremonyCurve> Radix<E> {
    // Domain size as a little-endian u64, the Lagrange basis in G1, then in G2
    pub fn serialise(&self, encoding: PointEncoding) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.domain_size() as u64).to_le_bytes());
        write_points(&self.coeffs_g1, encoding, &mut bytes);
        write_points(&self.coeffs_g2, encoding, &mut bytes);
        bytes
    }

    pub fn deserialise(bytes: &[u8], parameters: &Parameters) -> Result<Self, CeremonyError> {
        parameters.validate()?;
        parameters.check_curve::<E>()?;
        if bytes.len() < RADIX_HEADER_SIZE {
            return Err(FormatError::Length {
                artifact: "result header",
                expected: RADIX_HEADER_SIZE,
                found: bytes.len(),
            }
            .into());
        }

        let (header, body) = bytes.split_at(RADIX_HEADER_SIZE);
        let mut header_bytes = [0u8; RADIX_HEADER_SIZE];
        header_bytes.copy_from_slice(header);
        let announced = u64::from_le_bytes(header_bytes);

        let domain_size = usize::try_from(announced)
            .ok()
            .filter(|size| size.is_power_of_two() && *size <= parameters.num_powers)
            .ok_or(FormatError::DomainHeader(announced))?;

        check_length(
            "result",
            parameters.radix_size::<E>(domain_size),
            bytes.len(),
        )?;

        let g1_size = parameters.g1_size::<E>();
        let g2_size = parameters.g2_size::<E>();
        let (g1_bytes, g2_bytes) = body.split_at(domain_size * g1_size);

        Ok(Radix {
            coeffs_g1: read_points(g1_bytes, g1_size, parameters.encoding, "G1")?,
            coeffs_g2: read_points(g2_bytes, g2_size, parameters.encoding, "G2")?,
        })
    }
}
