//! Segmented random strings
//!
//! A segmented string array is two distributed arrays:
//!
//! - `segs` (`i64`, one per string): byte offset where string `i` starts
//! - `vals` (`u8`, one per byte): every string's characters followed by a
//!   zero terminator, back to back
//!
//! # Layout pipeline
//!
//! 1. Fill slot lengths (characters + terminator) per locale
//! 2. Collective: exclusive scan of the lengths gives `segs`, and the
//!    cluster-wide sum gives the byte count
//! 3. Allocate `vals` and fill every byte from the character class
//! 4. Write each terminator at `segs[i] + len[i] - 1`
//!
//! Step 2 is the only synchronization point. Step 4 is a scatter keyed by
//! computed offsets: each string-owning locale routes terminator positions to
//! the locale owning those bytes, which performs the write.

pub mod charclass;

pub use charclass::CharClass;

use crate::distributed::collective::scan_group;
use crate::distributed::{Cluster, DistArray, LocalChunk, LocalView};
use crate::error::{GenError, GenResult};
use crate::fill::normal::fill_lognormal_lengths;
use crate::fill::{fill_constant, fill_random};
use crossbeam::channel::{self, Receiver, Sender};

/// Variable-length byte strings stored as offsets plus a flat byte buffer
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedStrings {
    segs: DistArray<i64>,
    vals: DistArray<u8>,
}

impl SegmentedStrings {
    /// Wrap an offsets array and its byte buffer
    ///
    /// `segs` must be an exclusive scan of slot lengths that ends within `vals`.
    pub fn from_parts(segs: DistArray<i64>, vals: DistArray<u8>) -> Self {
        Self { segs, vals }
    }

    /// Number of strings
    pub fn len(&self) -> usize {
        self.segs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// Total bytes, terminators included
    pub fn num_bytes(&self) -> usize {
        self.vals.len()
    }

    pub fn segs(&self) -> &DistArray<i64> {
        &self.segs
    }

    pub fn vals(&self) -> &DistArray<u8> {
        &self.vals
    }

    /// Byte range of string `i`, terminator included
    fn slot_range(&self, i: usize) -> Option<std::ops::Range<usize>> {
        let start = *self.segs.get(i)? as usize;
        let end = match self.segs.get(i + 1) {
            Some(&next) => next as usize,
            None => self.vals.len(),
        };
        Some(start..end)
    }

    /// Slot of string `i`, terminator included
    pub fn slot(&self, i: usize) -> Option<&[u8]> {
        self.slot_range(i).map(|r| &self.vals.as_slice()[r])
    }

    /// Characters of string `i`, without the terminator
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        self.slot(i).map(|slot| &slot[..slot.len().saturating_sub(1)])
    }

    /// Slot lengths recovered from the offsets
    pub fn slot_lengths(&self) -> Vec<i64> {
        (0..self.len())
            .filter_map(|i| self.slot_range(i).map(|r| (r.end - r.start) as i64))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Strings decoded as UTF-8, invalid bytes replaced
    pub fn to_strings_lossy(&self) -> Vec<String> {
        self.iter().map(|s| String::from_utf8_lossy(s).into_owned()).collect()
    }
}

/// Generate `n` random strings with `min_len..max_len` characters
///
/// Slot lengths (characters plus terminator) are drawn from
/// `[min_len + 1, max_len + 1)`. When `min_len == max_len` that range is
/// empty and every slot is `min_len + 1` bytes.
///
/// Fails with [`GenError::Argument`] before allocating anything if `n < 0`,
/// `min_len < 0` or `max_len < min_len`.
pub fn new_random_strings(
    cluster: &Cluster,
    n: i64,
    min_len: i64,
    max_len: i64,
    char_class: CharClass,
) -> GenResult<SegmentedStrings> {
    if n < 0 || min_len < 0 || max_len < min_len {
        return Err(GenError::Argument(format!(
            "require n >= 0, min_len >= 0, max_len >= min_len (n={}, min_len={}, max_len={})",
            n, min_len, max_len
        )));
    }
    let low = min_len
        .checked_add(1)
        .ok_or_else(|| GenError::Argument(format!("min_len {} too large", min_len)))?;
    let high = max_len
        .checked_add(1)
        .ok_or_else(|| GenError::Argument(format!("max_len {} too large", max_len)))?;
    let n = to_len(n)?;

    let mut lengths: DistArray<i64> = DistArray::new(n, cluster.num_locales())?;
    cluster.timed("fill lengths", || {
        if high > low {
            fill_random(cluster, &mut lengths, low, high)
        } else {
            fill_constant(cluster, &mut lengths, low)
        }
    })?;

    layout(cluster, &lengths, char_class)
}

/// Generate `n` random strings with log-normally distributed lengths
///
/// Character counts are `floor(x)` for `x ~ LogNormal(log_mean, log_std)`.
/// Fails with [`GenError::Argument`] if `n < 0`, `log_std <= 0`, or either
/// parameter is not finite.
pub fn new_random_strings_lognormal(
    cluster: &Cluster,
    n: i64,
    log_mean: f64,
    log_std: f64,
    char_class: CharClass,
) -> GenResult<SegmentedStrings> {
    if n < 0 || !log_mean.is_finite() || !log_std.is_finite() || log_std <= 0.0 {
        return Err(GenError::Argument(format!(
            "require n >= 0, finite log_mean, log_std > 0 (n={}, log_mean={}, log_std={})",
            n, log_mean, log_std
        )));
    }
    let n = to_len(n)?;

    let mut lengths: DistArray<i64> = DistArray::new(n, cluster.num_locales())?;
    cluster.timed("fill lengths", || fill_lognormal_lengths(cluster, &mut lengths, log_mean, log_std))?;

    layout(cluster, &lengths, char_class)
}

fn to_len(n: i64) -> GenResult<usize> {
    usize::try_from(n).map_err(|_| GenError::Argument(format!("size {} not addressable", n)))
}

/// Lay out strings of the given slot lengths
fn layout(cluster: &Cluster, lengths: &DistArray<i64>, char_class: CharClass) -> GenResult<SegmentedStrings> {
    let mut segs: DistArray<i64> = DistArray::new(lengths.len(), lengths.num_locales())?;
    let total = cluster.timed("segment scan", || scan_offsets(cluster, lengths, &mut segs))?;
    let num_bytes = usize::try_from(total)
        .map_err(|_| GenError::Overflow(format!("total byte count {} not addressable", total)))?;

    if cluster.debug() {
        eprintln!(
            "DEBUG: Strings: {} strings, {} bytes over {} locales",
            lengths.len(),
            num_bytes,
            lengths.num_locales()
        );
    }

    let mut vals: DistArray<u8> = DistArray::new(num_bytes, lengths.num_locales())?;
    let (low, high) = char_class.bounds();
    cluster.timed("fill characters", || fill_random(cluster, &mut vals, low, high))?;
    cluster.timed("write terminators", || write_terminators(cluster, lengths, &segs, &mut vals))?;

    Ok(SegmentedStrings { segs, vals })
}

/// Exclusive scan of `lengths` into `segs` across the cluster
///
/// Each locale scans its own elements, contributes its local total to the
/// collective, and adds the returned base. Returns the cluster-wide sum.
pub fn scan_offsets(cluster: &Cluster, lengths: &DistArray<i64>, segs: &mut DistArray<i64>) -> GenResult<i64> {
    if lengths.domain() != segs.domain() {
        return Err(GenError::Argument("lengths and offsets are partitioned differently".to_string()));
    }

    let (coordinator, endpoints) = scan_group(lengths.num_locales());
    let inputs: Vec<_> = lengths
        .local_views()
        .into_iter()
        .zip(segs.local_chunks_mut())
        .zip(endpoints)
        .map(|((lengths, segs), endpoint)| (lengths, segs, endpoint))
        .collect();

    let (_, total) = cluster.run_locales_with(
        inputs,
        |(lengths, segs, mut endpoint)| {
            let mut running: i64 = 0;
            for (seg, &len) in segs.data.iter_mut().zip(lengths.data) {
                *seg = running;
                running = running.checked_add(len).ok_or_else(|| {
                    GenError::Overflow(format!("segment offsets overflow on locale {}", lengths.locale()))
                })?;
            }

            let reply = endpoint.exclusive_scan(running)?;
            // base + local prefix never exceeds the checked cluster total
            for seg in segs.data.iter_mut() {
                *seg += reply.base;
            }
            Ok(reply.total)
        },
        || coordinator.run(),
    )?;

    Ok(total)
}

/// Per-locale inputs for the terminator scatter
struct TerminatorTask<'a> {
    lengths: LocalView<'a, i64>,
    segs: LocalView<'a, i64>,
    bytes: LocalChunk<'a, u8>,
    inbox: Receiver<Vec<usize>>,
    outboxes: Vec<Sender<Vec<usize>>>,
}

/// Zero the last byte of every slot
///
/// String-owning locales compute terminator positions and send them, batched
/// per destination, to the byte-owning locales, which write their own chunk.
fn write_terminators(
    cluster: &Cluster,
    lengths: &DistArray<i64>,
    segs: &DistArray<i64>,
    vals: &mut DistArray<u8>,
) -> GenResult<()> {
    let byte_domain = vals.domain();
    let num_locales = vals.num_locales();
    let (senders, receivers): (Vec<_>, Vec<_>) = (0..num_locales).map(|_| channel::unbounded()).unzip();

    let tasks: Vec<TerminatorTask<'_>> = lengths
        .local_views()
        .into_iter()
        .zip(segs.local_views())
        .zip(vals.local_chunks_mut())
        .zip(receivers)
        .map(|(((lengths, segs), bytes), inbox)| TerminatorTask {
            lengths,
            segs,
            bytes,
            inbox,
            outboxes: senders.clone(),
        })
        .collect();
    drop(senders);

    cluster.run_locales(tasks, |task| {
        let TerminatorTask { lengths, segs, bytes, inbox, outboxes } = task;

        let mut batches: Vec<Vec<usize>> = vec![Vec::new(); outboxes.len()];
        for (&seg, &len) in segs.data.iter().zip(lengths.data) {
            let pos = (seg + len - 1) as usize;
            batches[byte_domain.locale_of(pos)].push(pos);
        }
        for (locale, (outbox, batch)) in outboxes.iter().zip(batches).enumerate() {
            if !batch.is_empty() {
                outbox
                    .send(batch)
                    .map_err(|_| GenError::Cluster(format!("locale {} stopped receiving terminators", locale)))?;
            }
        }
        drop(outboxes);

        // Ends once every locale has dropped its outboxes
        let subdomain = bytes.subdomain;
        for batch in inbox.iter() {
            for pos in batch {
                if !subdomain.contains(pos) {
                    return Err(GenError::Cluster(format!(
                        "terminator {} routed to locale {} which owns {:?}",
                        pos,
                        subdomain.locale,
                        subdomain.range()
                    )));
                }
                bytes.data[pos - subdomain.start] = 0;
            }
        }
        Ok(())
    })?;

    Ok(())
}
