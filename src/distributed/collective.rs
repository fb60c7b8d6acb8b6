//! Cluster-wide exclusive scan and sum
//!
//! The only cross-locale synchronization in the generator. It is an explicit
//! two-step protocol between the locales and a coordinator:
//!
//! ```text
//! Locale l                         Coordinator
//!     |                                |
//!     |-- CONTRIBUTE(l, local_total) ->|   (waits for every locale)
//!     |                                |
//!     |<---- SCAN(base_l, total) ------|   base_l = sum of totals of locales < l
//! ```
//!
//! Each locale first computes a local exclusive prefix over its own elements,
//! contributes its local total, then blocks until the coordinator replies with
//! its base offset. Adding the base to the local prefix gives the global
//! exclusive scan in global index order; `total` is the cluster-wide sum.
//!
//! A locale that leaves without contributing (error or panic) sends
//! `WITHDRAW` from its endpoint's `Drop`. The coordinator then fails and drops
//! every reply channel, which releases the locales still blocked on a reply.

use crate::error::{GenError, GenResult};
use crossbeam::channel::{self, Receiver, Sender};

/// Locale → coordinator message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectiveMessage {
    /// Local total of one locale
    Contribute { locale: usize, local_total: i64 },
    /// Locale left before contributing
    Withdraw { locale: usize },
}

/// Coordinator → locale reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReply {
    /// Sum of the totals of all lower-numbered locales
    pub base: i64,
    /// Sum over the whole cluster
    pub total: i64,
}

/// Coordinator side of one collective
#[derive(Debug)]
pub struct ScanCoordinator {
    inbox: Receiver<CollectiveMessage>,
    replies: Vec<Sender<ScanReply>>,
}

/// Locale side of one collective
#[derive(Debug)]
pub struct ScanEndpoint {
    locale: usize,
    outbox: Sender<CollectiveMessage>,
    reply: Receiver<ScanReply>,
    contributed: bool,
}

/// Create the coordinator and one endpoint per locale
pub fn scan_group(num_locales: usize) -> (ScanCoordinator, Vec<ScanEndpoint>) {
    let (outbox, inbox) = channel::unbounded();
    let mut replies = Vec::with_capacity(num_locales);
    let mut endpoints = Vec::with_capacity(num_locales);

    for locale in 0..num_locales {
        let (reply_tx, reply_rx) = channel::bounded(1);
        replies.push(reply_tx);
        endpoints.push(ScanEndpoint {
            locale,
            outbox: outbox.clone(),
            reply: reply_rx,
            contributed: false,
        });
    }

    (ScanCoordinator { inbox, replies }, endpoints)
}

impl ScanCoordinator {
    /// Gather every contribution, then reply to each locale
    ///
    /// Blocks until all locales have contributed. Returns the cluster-wide total.
    pub fn run(self) -> GenResult<i64> {
        let num_locales = self.replies.len();
        let mut totals: Vec<Option<i64>> = vec![None; num_locales];

        for _ in 0..num_locales {
            let msg = self
                .inbox
                .recv()
                .map_err(|_| GenError::Cluster("collective inbox closed before all locales contributed".to_string()))?;

            match msg {
                CollectiveMessage::Contribute { locale, local_total } => {
                    let slot = totals.get_mut(locale).ok_or_else(|| {
                        GenError::Cluster(format!("contribution from unknown locale {}", locale))
                    })?;
                    if slot.is_some() {
                        return Err(GenError::Cluster(format!("locale {} contributed twice", locale)));
                    }
                    *slot = Some(local_total);
                }
                CollectiveMessage::Withdraw { locale } => {
                    return Err(GenError::Cluster(format!("locale {} withdrew from the collective", locale)));
                }
            }
        }

        let mut bases = Vec::with_capacity(num_locales);
        let mut running: i64 = 0;
        for (locale, total) in totals.iter().enumerate() {
            bases.push(running);
            let local_total = total.unwrap_or(0);
            running = running.checked_add(local_total).ok_or_else(|| {
                GenError::Overflow(format!("cluster-wide sum overflows at locale {}", locale))
            })?;
        }

        for (reply, base) in self.replies.iter().zip(bases) {
            reply
                .send(ScanReply { base, total: running })
                .map_err(|_| GenError::Cluster("locale dropped before receiving its scan result".to_string()))?;
        }

        Ok(running)
    }
}

impl ScanEndpoint {
    pub fn locale(&self) -> usize {
        self.locale
    }

    /// Contribute `local_total` and wait for this locale's base offset
    ///
    /// This is a blocking barrier: it returns only after every locale has
    /// contributed.
    pub fn exclusive_scan(&mut self, local_total: i64) -> GenResult<ScanReply> {
        self.outbox
            .send(CollectiveMessage::Contribute { locale: self.locale, local_total })
            .map_err(|_| GenError::Cluster("collective coordinator is gone".to_string()))?;
        self.contributed = true;

        self.reply
            .recv()
            .map_err(|_| GenError::Cluster(format!("locale {} got no scan result", self.locale)))
    }
}

impl Drop for ScanEndpoint {
    fn drop(&mut self) {
        if !self.contributed {
            let _ = self.outbox.send(CollectiveMessage::Withdraw { locale: self.locale });
        }
    }
}
