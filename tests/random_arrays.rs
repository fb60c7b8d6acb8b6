//! Random numeric arrays through the request boundary

use distrand::request::{handle, random_array, GeneratedArray, RandomArrayRequest, Request, SymbolTable};
use distrand::{Cluster, Dtype, GenError};

fn request(size: i64, dtype: Dtype, low: &str, high: &str) -> RandomArrayRequest {
    RandomArrayRequest {
        size,
        dtype,
        low: low.to_string(),
        high: high.to_string(),
    }
}

#[test]
fn remapped_values_stay_in_range() {
    let cluster = Cluster::seeded(4, 21).unwrap();

    match random_array(&cluster, &request(5000, Dtype::Int64, "-100", "-90")).unwrap() {
        GeneratedArray::Int64(a) => assert!(a.iter().all(|&v| (-100..-90).contains(&v))),
        other => panic!("wrong dtype {}", other.dtype()),
    }
    match random_array(&cluster, &request(5000, Dtype::UInt64, "7", "8")).unwrap() {
        GeneratedArray::UInt64(a) => assert!(a.iter().all(|&v| v == 7)),
        other => panic!("wrong dtype {}", other.dtype()),
    }
    match random_array(&cluster, &request(5000, Dtype::Float64, "10", "20")).unwrap() {
        GeneratedArray::Float64(a) => assert!(a.iter().all(|&v| (10.0..20.0).contains(&v))),
        other => panic!("wrong dtype {}", other.dtype()),
    }
    match random_array(&cluster, &request(5000, Dtype::UInt8, "48", "58")).unwrap() {
        GeneratedArray::UInt8(a) => assert!(a.iter().all(|b| b.is_ascii_digit())),
        other => panic!("wrong dtype {}", other.dtype()),
    }
}

#[test]
fn equal_bounds_return_raw_draws() {
    let cluster = Cluster::seeded(2, 22).unwrap();
    match random_array(&cluster, &request(5000, Dtype::Int64, "3", "3")).unwrap() {
        GeneratedArray::Int64(a) => {
            assert!(a.iter().all(|&v| v >= 0));
            assert!(a.iter().any(|&v| v > 1_000_000));
        }
        other => panic!("wrong dtype {}", other.dtype()),
    }
}

#[test]
fn float_values_stay_below_high() {
    let cluster = Cluster::seeded(4, 26).unwrap();
    for (low, high) in [("1e16", "10000000000000002"), ("-1e308", "1e308"), ("0", "1e-300")] {
        let (lo, hi): (f64, f64) = (low.parse().unwrap(), high.parse().unwrap());
        match random_array(&cluster, &request(10_000, Dtype::Float64, low, high)).unwrap() {
            GeneratedArray::Float64(a) => assert!(a.iter().all(|&v| v.is_finite() && v >= lo && v < hi)),
            other => panic!("wrong dtype {}", other.dtype()),
        }
    }
}

#[test]
fn infinite_float_bounds_rejected() {
    let cluster = Cluster::with_locales(2).unwrap();
    assert!(matches!(
        random_array(&cluster, &request(10, Dtype::Float64, "0", "inf")),
        Err(GenError::Argument(_))
    ));
}

#[test]
fn oversized_request_fails_cleanly() {
    let cluster = Cluster::with_locales(2).unwrap();
    let mut symbols = SymbolTable::new();
    let oversized = Request::RandomArray(request(4_000_000_000_000_000_000, Dtype::UInt64, "0", "0"));
    assert!(matches!(handle(&cluster, &mut symbols, &oversized), Err(GenError::Allocation(_))));
    assert!(symbols.is_empty());
}

#[test]
fn empty_array() {
    let cluster = Cluster::seeded(3, 23).unwrap();
    let array = random_array(&cluster, &request(0, Dtype::Float64, "0", "1")).unwrap();
    assert!(array.is_empty());
}

#[test]
fn argument_errors() {
    let cluster = Cluster::with_locales(2).unwrap();
    assert!(matches!(
        random_array(&cluster, &request(-3, Dtype::Int64, "0", "1")),
        Err(GenError::Argument(_))
    ));
    assert!(matches!(
        random_array(&cluster, &request(3, Dtype::Int64, "5", "1")),
        Err(GenError::Argument(_))
    ));
    assert!(matches!(
        random_array(&cluster, &request(3, Dtype::Int64, "one", "2")),
        Err(GenError::Parse { dtype: "int64", .. })
    ));
    assert!(matches!(
        random_array(&cluster, &request(3, Dtype::UInt8, "0", "300")),
        Err(GenError::Parse { dtype: "uint8", .. })
    ));
}

#[test]
fn locale_count_does_not_change_length_or_range() {
    for locales in [1, 3, 8, 33] {
        let cluster = Cluster::seeded(locales, 24).unwrap();
        let array = random_array(&cluster, &request(100, Dtype::Int64, "0", "4")).unwrap();
        assert_eq!(array.len(), 100);
        match array {
            GeneratedArray::Int64(a) => {
                assert_eq!(a.num_locales(), locales);
                assert!(a.iter().all(|&v| (0..4).contains(&v)));
            }
            other => panic!("wrong dtype {}", other.dtype()),
        }
    }
}

#[test]
fn standard_normal_through_handle() {
    let cluster = Cluster::seeded(2, 25).unwrap();
    let mut symbols = SymbolTable::new();
    let reply = handle(&cluster, &mut symbols, &Request::StandardNormal { size: 12 }).unwrap();
    assert_eq!(reply.text, "created id_1 float64 12 1 (12) 8");

    let reply = handle(&cluster, &mut symbols, &Request::RandomArray(request(3, Dtype::Bool, "0", "1"))).unwrap();
    assert_eq!(reply.text, "created id_2 bool 3 1 (3) 1");
    assert_eq!(symbols.len(), 2);
}
