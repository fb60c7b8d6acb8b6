//! Request boundary
//!
//! Entry points a dispatcher calls: arguments arrive as sizes, dtype names and
//! string-encoded bounds, are validated here, and are handed to the typed fill
//! or string engine. Results are registered in a [`SymbolTable`] and described
//! by a textual reply.

pub mod symbols;

pub use symbols::{Entry, SymbolTable};

use crate::distributed::{Cluster, DistArray};
use crate::error::{GenError, GenResult};
use crate::fill::normal::fill_standard_normal;
use crate::fill::{fill_random, RandomFill};
use crate::strings::{new_random_strings, new_random_strings_lognormal, CharClass, SegmentedStrings};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element kinds a random array can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Int64,
    UInt64,
    Float64,
    Bool,
    UInt8,
}

impl Dtype {
    pub const ALL: [Dtype; 5] = [Dtype::Int64, Dtype::UInt64, Dtype::Float64, Dtype::Bool, Dtype::UInt8];

    pub fn name(self) -> &'static str {
        match self {
            Dtype::Int64 => "int64",
            Dtype::UInt64 => "uint64",
            Dtype::Float64 => "float64",
            Dtype::Bool => "bool",
            Dtype::UInt8 => "uint8",
        }
    }

    /// Bytes per element
    pub fn item_size(self) -> usize {
        match self {
            Dtype::Int64 | Dtype::UInt64 | Dtype::Float64 => 8,
            Dtype::Bool | Dtype::UInt8 => 1,
        }
    }
}

impl FromStr for Dtype {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dtype::ALL
            .into_iter()
            .find(|dtype| dtype.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GenError::UnknownDtype(s.to_string()))
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A generated numeric array of any supported dtype
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedArray {
    Int64(DistArray<i64>),
    UInt64(DistArray<u64>),
    Float64(DistArray<f64>),
    Bool(DistArray<bool>),
    UInt8(DistArray<u8>),
}

impl GeneratedArray {
    pub fn dtype(&self) -> Dtype {
        match self {
            GeneratedArray::Int64(_) => Dtype::Int64,
            GeneratedArray::UInt64(_) => Dtype::UInt64,
            GeneratedArray::Float64(_) => Dtype::Float64,
            GeneratedArray::Bool(_) => Dtype::Bool,
            GeneratedArray::UInt8(_) => Dtype::UInt8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            GeneratedArray::Int64(a) => a.len(),
            GeneratedArray::UInt64(a) => a.len(),
            GeneratedArray::Float64(a) => a.len(),
            GeneratedArray::Bool(a) => a.len(),
            GeneratedArray::UInt8(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Random numeric array request; bounds are parsed per dtype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomArrayRequest {
    pub size: i64,
    pub dtype: Dtype,
    pub low: String,
    pub high: String,
}

/// How string lengths are drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LengthDistribution {
    /// Character counts in `[min_len, max_len]`
    Uniform { min_len: i64, max_len: i64 },
    /// Character counts `floor(x)`, `x ~ LogNormal(log_mean, log_std)`
    LogNormal { log_mean: f64, log_std: f64 },
}

/// Random segmented strings request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomStringsRequest {
    pub size: i64,
    pub lengths: LengthDistribution,
    pub char_class: CharClass,
}

/// Any request the boundary understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    RandomArray(RandomArrayRequest),
    Uniform { size: i64, low: f64, high: f64 },
    StandardNormal { size: i64 },
    RandomStrings(RandomStringsRequest),
}

/// Reply to a handled request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Name the result was registered under
    pub name: String,
    /// Textual reply, `created ...` per component
    pub text: String,
}

/// Parse one bound for an element kind
trait ParseBound: Sized {
    fn parse_bound(value: &str) -> GenResult<Self>;
}

macro_rules! impl_parse_bound {
    ($($t:ty => $name:expr),*) => {
        $(
            impl ParseBound for $t {
                fn parse_bound(value: &str) -> GenResult<Self> {
                    value.trim().parse::<$t>().map_err(|_| GenError::Parse {
                        value: value.to_string(),
                        dtype: $name,
                    })
                }
            }
        )*
    };
}

impl_parse_bound!(i64 => "int64", u64 => "uint64", u8 => "uint8");

impl ParseBound for f64 {
    fn parse_bound(value: &str) -> GenResult<Self> {
        let bound: f64 = value.trim().parse().map_err(|_| GenError::Parse {
            value: value.to_string(),
            dtype: "float64",
        })?;
        check_finite(bound)
    }
}

fn check_finite(bound: f64) -> GenResult<f64> {
    if bound.is_finite() {
        Ok(bound)
    } else {
        Err(GenError::Argument(format!("float64 bounds must be finite, got {}", bound)))
    }
}

impl ParseBound for bool {
    fn parse_bound(value: &str) -> GenResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(GenError::Parse {
                value: value.to_string(),
                dtype: "bool",
            }),
        }
    }
}

fn check_size(size: i64) -> GenResult<usize> {
    if size < 0 {
        return Err(GenError::Argument(format!("size must be non-negative, got {}", size)));
    }
    usize::try_from(size).map_err(|_| GenError::Argument(format!("size {} not addressable", size)))
}

fn typed_array<T>(cluster: &Cluster, len: usize, low: &str, high: &str) -> GenResult<DistArray<T>>
where
    T: RandomFill + ParseBound + PartialOrd + Default + fmt::Display,
{
    let a_min = T::parse_bound(low)?;
    let a_max = T::parse_bound(high)?;
    if !(a_max >= a_min) {
        return Err(GenError::Argument(format!("high ({}) must be >= low ({})", a_max, a_min)));
    }

    let mut array: DistArray<T> = DistArray::new(len, cluster.num_locales())?;
    cluster.timed("fill array", || fill_random(cluster, &mut array, a_min, a_max))?;
    Ok(array)
}

/// Generate a random numeric array
///
/// Fails with [`GenError::Argument`] on a negative size or `high < low`, and
/// with [`GenError::Parse`] when a bound is not a value of the dtype. With
/// `high == low` the raw draws are returned.
pub fn random_array(cluster: &Cluster, request: &RandomArrayRequest) -> GenResult<GeneratedArray> {
    let len = check_size(request.size)?;
    let (low, high) = (request.low.as_str(), request.high.as_str());

    if cluster.debug() {
        eprintln!(
            "DEBUG: random_array: size={} dtype={} low={} high={}",
            len, request.dtype, low, high
        );
    }

    Ok(match request.dtype {
        Dtype::Int64 => GeneratedArray::Int64(typed_array(cluster, len, low, high)?),
        Dtype::UInt64 => GeneratedArray::UInt64(typed_array(cluster, len, low, high)?),
        Dtype::Float64 => GeneratedArray::Float64(typed_array(cluster, len, low, high)?),
        Dtype::Bool => GeneratedArray::Bool(typed_array(cluster, len, low, high)?),
        Dtype::UInt8 => GeneratedArray::UInt8(typed_array(cluster, len, low, high)?),
    })
}

/// Uniform float64 values in `[low, high)`
pub fn uniform(cluster: &Cluster, size: i64, low: f64, high: f64) -> GenResult<DistArray<f64>> {
    let len = check_size(size)?;
    let (low, high) = (check_finite(low)?, check_finite(high)?);
    if high < low {
        return Err(GenError::Argument(format!("high ({}) must be >= low ({})", high, low)));
    }
    let mut array: DistArray<f64> = DistArray::new(len, cluster.num_locales())?;
    cluster.timed("fill array", || fill_random(cluster, &mut array, low, high))?;
    Ok(array)
}

/// Float64 array of standard normal draws
pub fn standard_normal(cluster: &Cluster, size: i64) -> GenResult<DistArray<f64>> {
    let len = check_size(size)?;
    let mut array: DistArray<f64> = DistArray::new(len, cluster.num_locales())?;
    cluster.timed("fill normal", || fill_standard_normal(cluster, &mut array))?;
    Ok(array)
}

/// Generate random segmented strings
pub fn random_strings(cluster: &Cluster, request: &RandomStringsRequest) -> GenResult<SegmentedStrings> {
    if cluster.debug() {
        eprintln!(
            "DEBUG: random_strings: size={} lengths={:?} class={}",
            request.size, request.lengths, request.char_class
        );
    }

    match request.lengths {
        LengthDistribution::Uniform { min_len, max_len } => {
            new_random_strings(cluster, request.size, min_len, max_len, request.char_class)
        }
        LengthDistribution::LogNormal { log_mean, log_std } => {
            new_random_strings_lognormal(cluster, request.size, log_mean, log_std, request.char_class)
        }
    }
}

/// Run a request and register its result
///
/// Nothing is registered when generation fails.
pub fn handle(cluster: &Cluster, symbols: &mut SymbolTable, request: &Request) -> GenResult<Reply> {
    let entry = match request {
        Request::RandomArray(req) => Entry::Array(random_array(cluster, req)?),
        Request::Uniform { size, low, high } => {
            Entry::Array(GeneratedArray::Float64(uniform(cluster, *size, *low, *high)?))
        }
        Request::StandardNormal { size } => Entry::Array(GeneratedArray::Float64(standard_normal(cluster, *size)?)),
        Request::RandomStrings(req) => Entry::Strings(random_strings(cluster, req)?),
    };

    let name = symbols.register(entry);
    let text = symbols
        .reply(&name)
        .ok_or_else(|| GenError::Cluster(format!("{} missing right after registration", name)))?;
    Ok(Reply { name, text })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array_request(size: i64, dtype: Dtype, low: &str, high: &str) -> RandomArrayRequest {
        RandomArrayRequest {
            size,
            dtype,
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    #[test]
    fn test_dtype_names() {
        for dtype in Dtype::ALL {
            assert_eq!(dtype.name().parse::<Dtype>().unwrap(), dtype);
        }
        assert!(matches!("str".parse::<Dtype>(), Err(GenError::UnknownDtype(_))));
        assert_eq!(Dtype::Int64.item_size(), 8);
        assert_eq!(Dtype::Bool.item_size(), 1);
    }

    #[test]
    fn test_random_int64_in_range() {
        let cluster = Cluster::seeded(3, 1).unwrap();
        let array = random_array(&cluster, &array_request(1000, Dtype::Int64, "-10", "10")).unwrap();
        match array {
            GeneratedArray::Int64(a) => assert!(a.iter().all(|&v| (-10..10).contains(&v))),
            other => panic!("unexpected {:?}", other.dtype()),
        }
    }

    #[test]
    fn test_random_uint8_and_bool() {
        let cluster = Cluster::seeded(2, 2).unwrap();
        let bytes = random_array(&cluster, &array_request(100, Dtype::UInt8, "10", "20")).unwrap();
        assert_eq!(bytes.dtype(), Dtype::UInt8);
        assert_eq!(bytes.len(), 100);

        let bools = random_array(&cluster, &array_request(100, Dtype::Bool, "false", "1")).unwrap();
        assert_eq!(bools.dtype(), Dtype::Bool);
    }

    #[test]
    fn test_negative_size_rejected() {
        let cluster = Cluster::with_locales(2).unwrap();
        let result = random_array(&cluster, &array_request(-1, Dtype::Int64, "0", "1"));
        assert!(matches!(result, Err(GenError::Argument(_))));
        assert!(matches!(standard_normal(&cluster, -5), Err(GenError::Argument(_))));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let cluster = Cluster::with_locales(2).unwrap();
        let result = random_array(&cluster, &array_request(4, Dtype::Float64, "2.0", "1.0"));
        assert!(matches!(result, Err(GenError::Argument(_))));
        assert!(matches!(uniform(&cluster, 4, 1.0, f64::NAN), Err(GenError::Argument(_))));
    }

    #[test]
    fn test_non_finite_float_bounds_rejected() {
        let cluster = Cluster::with_locales(2).unwrap();
        for (low, high) in [("0", "inf"), ("-inf", "0"), ("-infinity", "inf"), ("NaN", "1")] {
            let result = random_array(&cluster, &array_request(4, Dtype::Float64, low, high));
            assert!(matches!(result, Err(GenError::Argument(_))), "{} .. {}", low, high);
        }
        assert!(matches!(uniform(&cluster, 4, 0.0, f64::INFINITY), Err(GenError::Argument(_))));
    }

    #[test]
    fn test_float_bounds_near_ulp_and_wide() {
        let cluster = Cluster::seeded(3, 6).unwrap();
        for (low, high) in [("1e16", "10000000000000002"), ("-1e308", "1e308")] {
            let array = random_array(&cluster, &array_request(10_000, Dtype::Float64, low, high)).unwrap();
            let (lo, hi): (f64, f64) = (low.parse().unwrap(), high.parse().unwrap());
            match array {
                GeneratedArray::Float64(a) => assert!(a.iter().all(|&v| v.is_finite() && v >= lo && v < hi)),
                other => panic!("unexpected {:?}", other.dtype()),
            }
        }
    }

    #[test]
    fn test_huge_size_is_an_allocation_error() {
        let cluster = Cluster::with_locales(2).unwrap();
        let result = random_array(&cluster, &array_request(4_000_000_000_000_000_000, Dtype::Int64, "0", "1"));
        assert!(matches!(result, Err(GenError::Allocation(_))));
    }

    #[test]
    fn test_handle_uniform() {
        let cluster = Cluster::seeded(2, 7).unwrap();
        let mut symbols = SymbolTable::new();
        let request = Request::Uniform { size: 6, low: -1.0, high: 1.0 };
        let reply = handle(&cluster, &mut symbols, &request).unwrap();
        assert_eq!(reply.text, "created id_1 float64 6 1 (6) 8");
        match symbols.get(&reply.name) {
            Some(Entry::Array(GeneratedArray::Float64(a))) => assert!(a.iter().all(|&v| (-1.0..1.0).contains(&v))),
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_bound() {
        let cluster = Cluster::with_locales(2).unwrap();
        let result = random_array(&cluster, &array_request(4, Dtype::UInt64, "-1", "5"));
        assert_eq!(
            result.unwrap_err(),
            GenError::Parse {
                value: "-1".to_string(),
                dtype: "uint64"
            }
        );
        let result = random_array(&cluster, &array_request(4, Dtype::Bool, "yes", "1"));
        assert!(matches!(result, Err(GenError::Parse { dtype: "bool", .. })));
    }

    #[test]
    fn test_uniform_bounds() {
        let cluster = Cluster::seeded(4, 3).unwrap();
        let array = uniform(&cluster, 2000, -1.0, 1.0).unwrap();
        assert!(array.iter().all(|&v| (-1.0..1.0).contains(&v)));
    }

    #[test]
    fn test_handle_registers_array() {
        let cluster = Cluster::seeded(2, 4).unwrap();
        let mut symbols = SymbolTable::new();
        let request = Request::RandomArray(array_request(10, Dtype::Int64, "0", "5"));
        let reply = handle(&cluster, &mut symbols, &request).unwrap();
        assert_eq!(reply.name, "id_1");
        assert_eq!(reply.text, "created id_1 int64 10 1 (10) 8");
        assert_eq!(symbols.len(), 1);
    }

    #[test]
    fn test_handle_registers_strings() {
        let cluster = Cluster::seeded(2, 5).unwrap();
        let mut symbols = SymbolTable::new();
        let request = Request::RandomStrings(RandomStringsRequest {
            size: 5,
            lengths: LengthDistribution::Uniform { min_len: 2, max_len: 2 },
            char_class: CharClass::Numeric,
        });
        let reply = handle(&cluster, &mut symbols, &request).unwrap();
        assert_eq!(
            reply.text,
            "created id_1.segs int64 5 1 (5) 8+created id_1.vals uint8 15 1 (15) 1"
        );
    }

    #[test]
    fn test_failed_request_registers_nothing() {
        let cluster = Cluster::with_locales(2).unwrap();
        let mut symbols = SymbolTable::new();
        let request = Request::RandomStrings(RandomStringsRequest {
            size: 5,
            lengths: LengthDistribution::Uniform { min_len: 4, max_len: 2 },
            char_class: CharClass::Uppercase,
        });
        assert!(handle(&cluster, &mut symbols, &request).is_err());
        assert!(symbols.is_empty());
    }
}
