// The protocol steps each party runs, and the checks which can be run once
// the ceremony has been completed.
use itertools::Itertools;
use rand::{CryptoRng, Rng};
use tracing::{debug, info, info_span};

use crate::{
    accumulator::Accumulator,
    error::CeremonyError,
    keypair::{PrivateKey, PublicKey},
    parameters::{CeremonyCurve, Parameters},
};

/// Creates the accumulator the first participant contributes to.
pub fn init_ceremony<E: CeremonyCurve>(
    parameters: &Parameters,
) -> Result<Accumulator<E>, CeremonyError> {
    let accumulator = Accumulator::new(parameters)?;
    info!(
        curve = %parameters.curve,
        num_powers = parameters.num_powers,
        "initialised ceremony"
    );
    Ok(accumulator)
}

/// Draws a fresh secret, applies it to `accumulator` and returns the updated
/// accumulator along with the public key proving the update.
///
/// The secret never leaves this function and is zeroized when it goes out of
/// scope.
pub fn contribute_randomness<E: CeremonyCurve, R: Rng + CryptoRng>(
    accumulator: &Accumulator<E>,
    rng: &mut R,
) -> (Accumulator<E>, PublicKey<E>) {
    let _span = info_span!("contribute", num_powers = accumulator.num_powers()).entered();

    let private_key = PrivateKey::rand(rng);
    let public_key = private_key.to_public(accumulator);
    let updated = accumulator.transform(&private_key);

    info!(digest = %hex::encode(updated.digest()), "contribution computed");
    (updated, public_key)
}

pub fn verify_contribution<E: CeremonyCurve>(
    before: &Accumulator<E>,
    after: &Accumulator<E>,
    public_key: &PublicKey<E>,
) -> bool {
    let _span = info_span!("verify", num_powers = before.num_powers()).entered();
    let ok = Accumulator::verify_update(before, after, public_key);
    info!(ok, "verified contribution");
    ok
}

pub struct Ceremony;

impl Ceremony {
    // Verifies a whole transcript. `accumulators` holds the starting accumulator
    // followed by the accumulator after each contribution, so there must be one
    // more accumulator than there are public keys
    pub fn verify<E: CeremonyCurve>(
        accumulators: &[Accumulator<E>],
        public_keys: &[PublicKey<E>],
    ) -> bool {
        if public_keys.is_empty() || accumulators.len() != public_keys.len() + 1 {
            debug!(
                accumulators = accumulators.len(),
                public_keys = public_keys.len(),
                "transcript has the wrong shape"
            );
            return false;
        }

        let transitions = accumulators.iter().tuple_windows().zip(public_keys);
        for (round, ((before, after), public_key)) in transitions.enumerate() {
            if !Accumulator::verify_update(before, after, public_key) {
                debug!(round, "contribution does not verify");
                return false;
            }
        }
        true
    }

    // Returns the position at which the public key contributed in the ceremony
    pub fn find_contribution<E: CeremonyCurve>(
        public_keys: &[PublicKey<E>],
        public_key: &PublicKey<E>,
    ) -> Option<usize> {
        public_keys.iter().position(|pk| pk == public_key)
    }

    pub fn verify_and_find_contribution<E: CeremonyCurve>(
        accumulators: &[Accumulator<E>],
        public_keys: &[PublicKey<E>],
        public_key: &PublicKey<E>,
    ) -> (bool, Option<usize>) {
        let ok = Ceremony::verify(accumulators, public_keys);
        let position = Ceremony::find_contribution(public_keys, public_key);
        (ok, position)
    }
}
