// The files exchanged between participants.
//
// challenge = accumulator
// response  = accumulator || public key
// result    = domain size || lagrange basis in G1 || lagrange basis in G2
//
// There are no delimiters, the boundaries follow from the ceremony parameters.
use crate::{
    accumulator::Accumulator,
    error::{CeremonyError, FormatError},
    keypair::PublicKey,
    parameters::{CeremonyCurve, Parameters},
    radix::Radix,
};

pub fn encode_challenge<E: CeremonyCurve>(
    accumulator: &Accumulator<E>,
    parameters: &Parameters,
) -> Result<Vec<u8>, CeremonyError> {
    accumulator.check_parameters(parameters)?;
    Ok(accumulator.serialise(parameters.encoding))
}

pub fn decode_challenge<E: CeremonyCurve>(
    bytes: &[u8],
    parameters: &Parameters,
) -> Result<Accumulator<E>, CeremonyError> {
    Accumulator::deserialise(bytes, parameters)
}

pub fn encode_response<E: CeremonyCurve>(
    accumulator: &Accumulator<E>,
    public_key: &PublicKey<E>,
    parameters: &Parameters,
) -> Result<Vec<u8>, CeremonyError> {
    let mut bytes = encode_challenge(accumulator, parameters)?;
    bytes.extend(public_key.serialise(parameters.encoding));
    Ok(bytes)
}

pub fn decode_response<E: CeremonyCurve>(
    bytes: &[u8],
    parameters: &Parameters,
) -> Result<(Accumulator<E>, PublicKey<E>), CeremonyError> {
    parameters.validate()?;
    parameters.check_curve::<E>()?;

    let expected = parameters.response_size::<E>();
    if bytes.len() != expected {
        return Err(FormatError::Length {
            artifact: "response",
            expected,
            found: bytes.len(),
        }
        .into());
    }

    let (accumulator_bytes, key_bytes) = bytes.split_at(parameters.accumulator_size::<E>());
    let accumulator = Accumulator::deserialise(accumulator_bytes, parameters)?;
    let public_key = PublicKey::deserialise(key_bytes, parameters)?;

    Ok((accumulator, public_key))
}

pub fn encode_result<E: CeremonyCurve>(
    radix: &Radix<E>,
    parameters: &Parameters,
) -> Result<Vec<u8>, CeremonyError> {
    parameters.check_curve::<E>()?;
    Ok(radix.serialise(parameters.encoding))
}

pub fn decode_result<E: CeremonyCurve>(
    bytes: &[u8],
    parameters: &Parameters,
) -> Result<Radix<E>, CeremonyError> {
    Radix::deserialise(bytes, parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::UsageError,
        keypair::PrivateKey,
        parameters::{Curve, PointEncoding},
    };
    use ark_bls12_381::Bls12_381;

    fn params(num_powers: usize) -> Parameters {
        Parameters::new(Curve::Bls12_381, num_powers, PointEncoding::Compressed).unwrap()
    }

    #[test]
    fn response_splits_at_the_accumulator_size() {
        let parameters = params(4);
        let before = Accumulator::<Bls12_381>::new(&parameters).unwrap();
        let mut after = before.clone();
        let public_key = after.update(&PrivateKey::from_u64(42).unwrap());

        let bytes = encode_response(&after, &public_key, &parameters).unwrap();
        assert_eq!(bytes.len(), parameters.response_size::<Bls12_381>());
        assert_eq!(
            &bytes[..parameters.accumulator_size::<Bls12_381>()],
            &encode_challenge(&after, &parameters).unwrap()[..]
        );

        let (decoded_acc, decoded_key) = decode_response::<Bls12_381>(&bytes, &parameters).unwrap();
        assert_eq!(decoded_acc, after);
        assert_eq!(decoded_key, public_key);
        assert!(Accumulator::verify_update(&before, &decoded_acc, &decoded_key));
    }

    #[test]
    fn challenge_is_not_a_response() {
        let parameters = params(4);
        let acc = Accumulator::<Bls12_381>::new(&parameters).unwrap();
        let challenge = encode_challenge(&acc, &parameters).unwrap();

        assert!(matches!(
            decode_response::<Bls12_381>(&challenge, &parameters),
            Err(CeremonyError::Format(FormatError::Length {
                artifact: "response",
                ..
            }))
        ));
        assert_eq!(decode_challenge::<Bls12_381>(&challenge, &parameters).unwrap(), acc);
    }

    #[test]
    fn encoding_checks_the_ceremony_size() {
        let acc = Accumulator::<Bls12_381>::new(&params(4)).unwrap();
        assert!(matches!(
            encode_challenge(&acc, &params(8)),
            Err(CeremonyError::Usage(UsageError::SizeMismatch { .. }))
        ));
    }

    #[test]
    fn result_roundtrip() {
        let parameters = params(8);
        let acc = Accumulator::<Bls12_381>::new(&parameters)
            .unwrap()
            .transform(&PrivateKey::from_u64(8).unwrap());
        let radix = Radix::from_accumulator(&acc, 3).unwrap();

        let bytes = encode_result(&radix, &parameters).unwrap();
        assert_eq!(&bytes[..8], &4u64.to_le_bytes());
        assert_eq!(decode_result::<Bls12_381>(&bytes, &parameters).unwrap(), radix);
    }
}
