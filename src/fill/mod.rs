//! Local fill engine
//!
//! Fills the elements a locale owns with independent pseudo-random draws and,
//! when the target range is non-empty (`a_max > a_min`), remaps each draw into
//! `[a_min, a_max)`. An empty or inverted range leaves the raw draws untouched.
//!
//! # Variants
//!
//! - **Signed** (`i64`): the raw draw is made non-negative first, then
//!   `value = raw % (a_max - a_min) + a_min`. `i64::MIN` has no positive
//!   counterpart; its absolute value saturates to `i64::MAX`.
//! - **Unsigned** (`u64`, `u8`): same modulus remap, no sign correction.
//! - **Float** (`f64`): raw draw in `[0, 1)`, interpolated as
//!   `a_min * (1 - raw) + a_max * raw` and kept strictly below `a_max`.
//!   Bounds must be finite.
//! - **Boolean**: raw draw only; there is nothing to remap.
//!
//! # Streams
//!
//! A locale splits its range into `chunk_size` blocks and fills them in
//! parallel on the cluster pool. Block `c` of locale `l` draws from the stream
//! `seed.for_locale(l).for_chunk(c)`, so output depends only on the seed, the
//! locale count and the chunk size.
//!
//! The engine performs no validation; that is the request boundary's job.

pub mod normal;

use crate::distributed::{Cluster, DistArray, LocalChunk};
use crate::error::GenResult;
use crate::util::seed::StreamSeed;
use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

/// Element kinds the fill engine can draw
pub trait RandomFill: Copy + Send + Sync + 'static {
    /// Draw one raw value
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Whether `[a_min, a_max)` asks for remapping
    fn needs_remap(a_min: Self, a_max: Self) -> bool;

    /// Map a raw draw into `[a_min, a_max)`; only called when `needs_remap`
    fn remap(raw: Self, a_min: Self, a_max: Self) -> Self;
}

impl RandomFill for i64 {
    #[inline]
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen::<i64>().saturating_abs()
    }

    #[inline]
    fn needs_remap(a_min: Self, a_max: Self) -> bool {
        a_max > a_min
    }

    #[inline]
    fn remap(raw: Self, a_min: Self, a_max: Self) -> Self {
        let modulus = a_max.abs_diff(a_min);
        // The offset is below the range width, so the wrapping add lands in range.
        a_min.wrapping_add((raw.unsigned_abs() % modulus) as i64)
    }
}

macro_rules! impl_unsigned_fill {
    ($($t:ty),*) => {
        $(
            impl RandomFill for $t {
                #[inline]
                fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
                    rng.gen::<$t>()
                }

                #[inline]
                fn needs_remap(a_min: Self, a_max: Self) -> bool {
                    a_max > a_min
                }

                #[inline]
                fn remap(raw: Self, a_min: Self, a_max: Self) -> Self {
                    a_min + raw % (a_max - a_min)
                }
            }
        )*
    };
}

impl_unsigned_fill!(u8, u64);

impl RandomFill for f64 {
    #[inline]
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen::<f64>()
    }

    #[inline]
    fn needs_remap(a_min: Self, a_max: Self) -> bool {
        a_max > a_min
    }

    /// Interpolates without forming `a_max - a_min`, which can overflow for
    /// finite bounds; rounding up to `a_max` is pulled back below it.
    #[inline]
    fn remap(raw: Self, a_min: Self, a_max: Self) -> Self {
        let value = a_min * (1.0 - raw) + a_max * raw;
        if value >= a_max {
            next_below(a_max).max(a_min)
        } else {
            value.max(a_min)
        }
    }
}

/// Largest finite `f64` strictly below `x` (`x` finite)
#[inline]
fn next_below(x: f64) -> f64 {
    if x == 0.0 {
        -f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else {
        f64::from_bits(x.to_bits() + 1)
    }
}

impl RandomFill for bool {
    #[inline]
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen::<bool>()
    }

    #[inline]
    fn needs_remap(_a_min: Self, _a_max: Self) -> bool {
        false
    }

    #[inline]
    fn remap(raw: Self, _a_min: Self, _a_max: Self) -> Self {
        raw
    }
}

/// Fill one locale's chunk, drawing each element with `draw`
///
/// Core loop shared by every fill: splits the chunk into `chunk_size` blocks,
/// each with its own stream, and runs them on the cluster pool.
pub fn fill_local_with<T, F>(cluster: &Cluster, chunk: LocalChunk<'_, T>, seed: StreamSeed, draw: F)
where
    T: Send,
    F: Fn(&mut Xoshiro256PlusPlus) -> T + Sync,
{
    let locale_seed = seed.for_locale(chunk.locale());
    let chunk_size = cluster.chunk_size();
    let data = chunk.data;

    cluster.install(|| {
        data.par_chunks_mut(chunk_size)
            .enumerate()
            .for_each(|(block, values)| {
                let mut rng = locale_seed.for_chunk(block).rng();
                for value in values.iter_mut() {
                    *value = draw(&mut rng);
                }
            });
    });
}

/// Fill one locale's chunk with raw draws, remapped into `[a_min, a_max)` when non-empty
pub fn fill_local<T: RandomFill>(cluster: &Cluster, chunk: LocalChunk<'_, T>, a_min: T, a_max: T, seed: StreamSeed) {
    if T::needs_remap(a_min, a_max) {
        fill_local_with(cluster, chunk, seed, |rng| T::remap(T::draw(rng), a_min, a_max));
    } else {
        fill_local_with(cluster, chunk, seed, |rng| T::draw(rng));
    }
}

/// Fill every locale's part of `array`, each locale in parallel
pub fn fill_random<T: RandomFill>(cluster: &Cluster, array: &mut DistArray<T>, a_min: T, a_max: T) -> GenResult<()> {
    let seed = cluster.next_seed();
    cluster.run_locales(array.local_chunks_mut(), |chunk| {
        fill_local(cluster, chunk, a_min, a_max, seed);
        Ok(())
    })?;
    Ok(())
}

/// Set every element of `array` to `value`, each locale writing its own part
pub fn fill_constant<T: Copy + Send + Sync>(cluster: &Cluster, array: &mut DistArray<T>, value: T) -> GenResult<()> {
    cluster.run_locales(array.local_chunks_mut(), |chunk| {
        chunk.data.fill(value);
        Ok(())
    })?;
    Ok(())
}
