//! Distributed array storage
//!
//! A [`DistArray`] holds one flat buffer plus the [`BlockDomain`] that assigns
//! each element to a locale. Locales never index the flat buffer directly: they
//! receive a [`LocalChunk`] that borrows exactly their own subdomain, so the
//! "only the owner writes" rule is enforced by the borrow checker.

use super::domain::{BlockDomain, Subdomain};
use crate::error::{GenError, GenResult};

/// Logical 1-D array partitioned across locales
#[derive(Debug, Clone, PartialEq)]
pub struct DistArray<T> {
    domain: BlockDomain,
    data: Vec<T>,
}

/// Mutable view of the elements owned by one locale
#[derive(Debug)]
pub struct LocalChunk<'a, T> {
    pub subdomain: Subdomain,
    pub data: &'a mut [T],
}

/// Read-only view of the elements owned by one locale
#[derive(Debug, Clone, Copy)]
pub struct LocalView<'a, T> {
    pub subdomain: Subdomain,
    pub data: &'a [T],
}

impl<T: Clone + Default> DistArray<T> {
    /// Allocate a default-initialized array of `len` elements
    ///
    /// Fails with [`GenError::Allocation`] when the buffer cannot be reserved.
    pub fn new(len: usize, num_locales: usize) -> GenResult<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            GenError::Allocation(format!(
                "{} elements of {} bytes: {}",
                len,
                std::mem::size_of::<T>(),
                e
            ))
        })?;
        data.resize(len, T::default());
        Ok(Self {
            domain: BlockDomain::new(len, num_locales),
            data,
        })
    }
}

impl<T> DistArray<T> {
    /// Wrap existing data, partitioned over `num_locales`
    pub fn from_vec(data: Vec<T>, num_locales: usize) -> Self {
        Self {
            domain: BlockDomain::new(data.len(), num_locales),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn domain(&self) -> BlockDomain {
        self.domain
    }

    pub fn num_locales(&self) -> usize {
        self.domain.num_locales()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// One read-only view per locale, in locale order
    pub fn local_views(&self) -> Vec<LocalView<'_, T>> {
        self.domain
            .subdomains()
            .map(|subdomain| LocalView {
                subdomain,
                data: &self.data[subdomain.range()],
            })
            .collect()
    }

    /// One mutable chunk per locale, in locale order
    ///
    /// The chunks are disjoint, so they can be moved to separate locale threads.
    pub fn local_chunks_mut(&mut self) -> Vec<LocalChunk<'_, T>> {
        let domain = self.domain;
        let mut rest: &mut [T] = &mut self.data;
        let mut chunks = Vec::with_capacity(domain.num_locales());
        for subdomain in domain.subdomains() {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(subdomain.len());
            chunks.push(LocalChunk { subdomain, data: head });
            rest = tail;
        }
        chunks
    }
}

impl<'a, T> LocalChunk<'a, T> {
    pub fn locale(&self) -> usize {
        self.subdomain.locale
    }
}

impl<'a, T> LocalView<'a, T> {
    pub fn locale(&self) -> usize {
        self.subdomain.locale
    }
}
