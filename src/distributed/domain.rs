//! Block partitioning of a logical index space
//!
//! A logical array of `len` elements is split into one contiguous subdomain per
//! locale. Locale `l` of `L` owns `[len*l/L, len*(l+1)/L)`, so subdomain sizes
//! differ by at most one element and their union is exactly `[0, len)`.
//!
//! The partitioning is a pure function of `(len, num_locales)`. Two arrays with
//! the same length and locale count always line up element for element, which
//! is what lets segment offsets be computed against the lengths array and then
//! used to address the byte buffer.

use std::ops::Range;

/// Contiguous block distribution over `num_locales` locales
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDomain {
    len: usize,
    num_locales: usize,
}

/// The global index range owned by one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subdomain {
    /// Owning locale
    pub locale: usize,
    /// First owned global index
    pub start: usize,
    /// One past the last owned global index
    pub end: usize,
}

impl BlockDomain {
    /// Partition `len` indices over `num_locales` locales
    ///
    /// A locale count of zero is treated as one.
    pub fn new(len: usize, num_locales: usize) -> Self {
        Self {
            len,
            num_locales: num_locales.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_locales(&self) -> usize {
        self.num_locales
    }

    #[inline]
    fn boundary(&self, locale: usize) -> usize {
        ((self.len as u128 * locale as u128) / self.num_locales as u128) as usize
    }

    /// Subdomain owned by `locale`
    ///
    /// # Panics
    ///
    /// Panics if `locale >= num_locales`.
    pub fn subdomain(&self, locale: usize) -> Subdomain {
        assert!(
            locale < self.num_locales,
            "locale {} out of range ({} locales)",
            locale,
            self.num_locales
        );
        Subdomain {
            locale,
            start: self.boundary(locale),
            end: self.boundary(locale + 1),
        }
    }

    /// All subdomains in locale order
    pub fn subdomains(&self) -> impl Iterator<Item = Subdomain> + '_ {
        (0..self.num_locales).map(move |l| self.subdomain(l))
    }

    /// Locale owning global index `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn locale_of(&self, index: usize) -> usize {
        assert!(index < self.len, "index {} out of range (len {})", index, self.len);
        let mut locale = ((index as u128 * self.num_locales as u128) / self.len as u128) as usize;
        locale = locale.min(self.num_locales - 1);
        while self.boundary(locale) > index {
            locale -= 1;
        }
        while self.boundary(locale + 1) <= index {
            locale += 1;
        }
        locale
    }
}

impl Subdomain {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdomains_cover_exactly_once() {
        for len in [0usize, 1, 2, 7, 100, 1001] {
            for locales in 1..=9 {
                let domain = BlockDomain::new(len, locales);
                let mut next = 0;
                for sub in domain.subdomains() {
                    assert_eq!(sub.start, next);
                    assert!(sub.end >= sub.start);
                    next = sub.end;
                }
                assert_eq!(next, len);
            }
        }
    }

    #[test]
    fn test_subdomain_sizes_balanced() {
        let domain = BlockDomain::new(10, 4);
        let sizes: Vec<usize> = domain.subdomains().map(|s| s.len()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 10);
        let min = *sizes.iter().min().unwrap();
        let max = *sizes.iter().max().unwrap();
        assert!(max - min <= 1);
    }

    #[test]
    fn test_more_locales_than_elements() {
        let domain = BlockDomain::new(3, 8);
        let non_empty = domain.subdomains().filter(|s| !s.is_empty()).count();
        assert_eq!(non_empty, 3);
    }

    #[test]
    fn test_locale_of_matches_subdomain() {
        for len in [1usize, 5, 13, 64] {
            for locales in 1..=6 {
                let domain = BlockDomain::new(len, locales);
                for index in 0..len {
                    let locale = domain.locale_of(index);
                    assert!(domain.subdomain(locale).contains(index));
                }
            }
        }
    }

    #[test]
    fn test_zero_locales_treated_as_one() {
        let domain = BlockDomain::new(5, 0);
        assert_eq!(domain.num_locales(), 1);
        assert_eq!(domain.subdomain(0).range(), 0..5);
    }

    #[test]
    #[should_panic]
    fn test_subdomain_out_of_range() {
        BlockDomain::new(5, 2).subdomain(2);
    }
}
