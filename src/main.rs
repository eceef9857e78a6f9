use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use ark_bls12_381::Bls12_381;
use ark_bn254::Bn254;
use clap::{Args, Parser, Subcommand};
use powers_of_tau::{
    contribute_randomness, envelope, init_ceremony,
    io::{read_artifact, write_artifact},
    parameters::DEFAULT_NUM_POWERS,
    verify_contribution, CeremonyCurve, CeremonyError, Curve, Parameters, PointEncoding, Radix,
};
use rand::rngs::OsRng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const EXIT_VERIFICATION_FAILED: u8 = 1;
// Same code clap uses for bad command lines
const EXIT_USAGE: u8 = 2;
const EXIT_FORMAT: u8 = 3;
const EXIT_IO: u8 = 4;

#[derive(Parser)]
#[command(
    name = "powers-of-tau",
    version,
    about = "Powers Of Tau, Trusted Setup Multi Party Computation Protocol (https://eprint.iacr.org/2017/1050)"
)]
struct Cli {
    #[command(flatten)]
    profile: ProfileArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ProfileArgs {
    /// JSON ceremony profile, replaces --curve, --powers and --encoding
    #[arg(long, global = true, value_name = "FILE")]
    profile: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = Curve::Bls12_381)]
    curve: Curve,

    /// Number of powers of tau, a power of two
    #[arg(long, global = true, default_value_t = DEFAULT_NUM_POWERS)]
    powers: usize,

    #[arg(long, global = true, value_enum, default_value_t = PointEncoding::Compressed)]
    encoding: PointEncoding,
}

#[derive(Subcommand)]
enum Command {
    /// Write the starting accumulator of a new ceremony
    Init {
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Contribute randomness to a challenge and write the response
    Contribute {
        #[arg(short, long, value_name = "FILE")]
        challenge: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Check that a response was computed from a challenge
    Verify {
        #[arg(short, long, value_name = "FILE")]
        challenge: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        response: PathBuf,
    },
    /// Convert the accumulator of a response into the Lagrange basis over a domain
    CreateRadix {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        #[arg(short = 'm', long = "domain-size", value_name = "SIZE")]
        domain_size: usize,
    },
}

enum Outcome {
    Done,
    Verified(bool),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(Outcome::Done) | Ok(Outcome::Verified(true)) => ExitCode::SUCCESS,
        Ok(Outcome::Verified(false)) => ExitCode::from(EXIT_VERIFICATION_FAILED),
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(ceremony_error) = cause.downcast_ref::<CeremonyError>() {
            return match ceremony_error {
                CeremonyError::Format(_) => EXIT_FORMAT,
                CeremonyError::Usage(_) => EXIT_USAGE,
            };
        }
        if cause.downcast_ref::<io::Error>().is_some() {
            return EXIT_IO;
        }
    }
    EXIT_USAGE
}

fn parameters(args: &ProfileArgs) -> Result<Parameters> {
    let parameters = match &args.profile {
        Some(path) => {
            let json = read_artifact(path)?;
            let json = String::from_utf8_lossy(&json);
            Parameters::from_json(&json)
                .with_context(|| format!("invalid profile `{}`", path.display()))?
        }
        None => Parameters::new(args.curve, args.powers, args.encoding)?,
    };
    Ok(parameters)
}

fn run(cli: Cli) -> Result<Outcome> {
    let parameters = parameters(&cli.profile)?;
    match parameters.curve {
        Curve::Bls12_381 => execute::<Bls12_381>(&cli.command, &parameters),
        Curve::Bn254 => execute::<Bn254>(&cli.command, &parameters),
    }
}

fn execute<E: CeremonyCurve>(command: &Command, parameters: &Parameters) -> Result<Outcome> {
    match command {
        Command::Init { output } => {
            let accumulator = init_ceremony::<E>(parameters)?;
            let challenge = envelope::encode_challenge(&accumulator, parameters)?;
            write_artifact(output, &[challenge.as_slice()])?;
            info!("wrote a fresh accumulator to `{}`", output.display());
        }
        Command::Contribute { challenge, output } => {
            let bytes = read_artifact(challenge)?;
            let before = envelope::decode_challenge::<E>(&bytes, parameters)
                .with_context(|| format!("malformed challenge `{}`", challenge.display()))?;

            let (after, public_key) = contribute_randomness(&before, &mut OsRng);

            let response = envelope::encode_response(&after, &public_key, parameters)?;
            write_artifact(output, &[response.as_slice()])?;
            info!("wrote the response to `{}`", output.display());
        }
        Command::Verify {
            challenge,
            response,
        } => {
            let challenge_bytes = read_artifact(challenge)?;
            let before = envelope::decode_challenge::<E>(&challenge_bytes, parameters)
                .with_context(|| format!("malformed challenge `{}`", challenge.display()))?;

            let response_bytes = read_artifact(response)?;
            let (after, public_key) = envelope::decode_response::<E>(&response_bytes, parameters)
                .with_context(|| format!("malformed response `{}`", response.display()))?;

            let ok = verify_contribution(&before, &after, &public_key);
            if ok {
                info!("the contribution is valid");
            } else {
                warn!("the contribution is NOT valid");
            }
            return Ok(Outcome::Verified(ok));
        }
        Command::CreateRadix {
            input,
            output,
            domain_size,
        } => {
            let bytes = read_artifact(input)?;
            let (accumulator, _) = envelope::decode_response::<E>(&bytes, parameters)
                .with_context(|| format!("malformed response `{}`", input.display()))?;

            let radix = Radix::from_accumulator(&accumulator, *domain_size)?;
            let result = envelope::encode_result(&radix, parameters)?;
            write_artifact(output, &[result.as_slice()])?;
            info!(
                "wrote a domain of {} elements to `{}`",
                radix.domain_size(),
                output.display()
            );
        }
    }
    Ok(Outcome::Done)
}
