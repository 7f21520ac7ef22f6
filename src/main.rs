// main.rs

use std::process::ExitCode;

use half::f16;
use log::{error, info};
use rand::Rng;

use near_check::layout::half_from_bits;
use near_check::{
    abs_error_for_sum, near_check_batched_refs, near_check_strided_batched, ElementKind,
    NearError,
};

const M: usize = 32;
const N: usize = 16;
const K: usize = 64;
const BATCH_COUNT: usize = 4;

fn random_matrix(rng: &mut impl Rng, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Column-major C = A * B for one batch, accumulated in f32.
fn gemm_f32(a: &[f32], b: &[f32]) -> Vec<f32> {
    let mut c = vec![0.0; M * N];
    for j in 0..N {
        for i in 0..M {
            c[i + j * M] = (0..K).map(|p| a[i + p * M] * b[p + j * K]).sum();
        }
    }
    c
}

/// Same product with half-precision inputs and accumulation, returned as the
/// raw binary16 words a device readback would hold.
fn gemm_f16_bits(a: &[f32], b: &[f32]) -> Vec<u16> {
    let mut c = vec![0u16; M * N];
    for j in 0..N {
        for i in 0..M {
            c[i + j * M] = (0..K).fold(f16::ZERO, |acc, p| {
                acc + f16::from_f32(a[i + p * M]) * f16::from_f32(b[p + j * K])
            })
            .to_bits();
        }
    }
    c
}

fn run() -> Result<(), NearError> {
    let mut rng = rand::thread_rng();
    let mut reference = Vec::with_capacity(M * N * BATCH_COUNT);
    let mut readback = Vec::with_capacity(M * N * BATCH_COUNT);

    for _ in 0..BATCH_COUNT {
        let a = random_matrix(&mut rng, M * K);
        let b = random_matrix(&mut rng, K * N);
        reference.extend(gemm_f32(&a, &b).into_iter().map(f16::from_f32));
        readback.extend(gemm_f16_bits(&a, &b));
    }
    let candidate = half_from_bits(&readback)?;

    let abs_error = abs_error_for_sum(ElementKind::Half, K);
    info!("comparing {BATCH_COUNT} batches of {M}x{N} (K={K}), abs_error={abs_error}");

    let stride = M * N;
    near_check_strided_batched(M, N, BATCH_COUNT, M, stride, &reference, candidate, abs_error)?
        .into_result()?;

    let reference_batches: Vec<&[f16]> = reference.chunks(stride).collect();
    let candidate_batches: Vec<&[f16]> = candidate.chunks(stride).collect();
    let report = near_check_batched_refs(
        M,
        N,
        BATCH_COUNT,
        M,
        &reference_batches,
        &candidate_batches,
        abs_error,
    )?
    .into_result()?;

    println!(
        "{} near check passed: {} elements within {}",
        report.kind(),
        report.checked(),
        report.bound()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("near check failed: {err}");
            ExitCode::FAILURE
        }
    }
}
