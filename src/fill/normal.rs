//! Normal and log-normal fills
//!
//! Same per-locale, per-chunk stream layout as the uniform fills, with values
//! drawn from `rand_distr` distributions instead of raw bits.

use super::fill_local_with;
use crate::distributed::{Cluster, DistArray};
use crate::error::{GenError, GenResult};
use rand_distr::{Distribution, LogNormal, StandardNormal};

/// Largest length a log-normal draw is truncated to (2^62), before the terminator byte
const MAX_LOGNORMAL_LENGTH: f64 = 4_611_686_018_427_387_904.0;

/// Fill `array` with draws from N(0, 1)
pub fn fill_standard_normal(cluster: &Cluster, array: &mut DistArray<f64>) -> GenResult<()> {
    let seed = cluster.next_seed();
    cluster.run_locales(array.local_chunks_mut(), |chunk| {
        fill_local_with(cluster, chunk, seed, |rng| StandardNormal.sample(rng));
        Ok(())
    })?;
    Ok(())
}

/// Fill `lengths` with log-normally distributed string slot lengths
///
/// Each slot is `floor(x) + 1` for `x ~ LogNormal(log_mean, log_std)`, the `+1`
/// reserving the terminator byte. Draws beyond 2^62 are truncated.
pub fn fill_lognormal_lengths(
    cluster: &Cluster,
    lengths: &mut DistArray<i64>,
    log_mean: f64,
    log_std: f64,
) -> GenResult<()> {
    let dist = LogNormal::new(log_mean, log_std)
        .map_err(|e| GenError::Argument(format!("invalid log-normal parameters: {}", e)))?;

    let seed = cluster.next_seed();
    cluster.run_locales(lengths.local_chunks_mut(), |chunk| {
        fill_local_with(cluster, chunk, seed, |rng| {
            let x: f64 = dist.sample(rng);
            lognormal_slot_length(x)
        });
        Ok(())
    })?;
    Ok(())
}

#[inline]
fn lognormal_slot_length(x: f64) -> i64 {
    if x.is_nan() {
        return 1;
    }
    (x.floor().min(MAX_LOGNORMAL_LENGTH) as i64) + 1
}
