use ark_bls12_381::Bls12_381;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use powers_of_tau::{
    contribute_randomness, envelope, init_ceremony, verify_contribution, Curve, Parameters,
    PointEncoding,
};
use rand::thread_rng;

fn parameters() -> Parameters {
    Parameters::new(Curve::Bls12_381, 2usize.pow(10), PointEncoding::Compressed).unwrap()
}

fn contribute_algo(params: &Parameters, challenge: &[u8]) -> Vec<u8> {
    // Simulate deserialisation
    let acc = envelope::decode_challenge::<Bls12_381>(challenge, params).unwrap();

    let (acc, public_key) = contribute_randomness(&acc, &mut thread_rng());
    envelope::encode_response(&acc, &public_key, params).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let params = parameters();
    let acc = init_ceremony::<Bls12_381>(&params).unwrap();
    let challenge = envelope::encode_challenge(&acc, &params).unwrap();

    c.bench_function("contribute", |b| {
        b.iter(|| black_box(contribute_algo(&params, &challenge)))
    });

    let (after, public_key) = contribute_randomness(&acc, &mut thread_rng());
    c.bench_function("verify", |b| {
        b.iter(|| black_box(verify_contribution(&acc, &after, &public_key)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
