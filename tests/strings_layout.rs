//! Segmented string layout across cluster shapes

use distrand::config::{ClusterConfig, RuntimeConfig};
use distrand::request::{handle, LengthDistribution, RandomStringsRequest, Request, SymbolTable};
use distrand::request::Entry;
use distrand::strings::{new_random_strings, new_random_strings_lognormal};
use distrand::{CharClass, Cluster, GenError, SegmentedStrings};

fn cluster(locales: usize, chunk_size: usize, seed: u64) -> Cluster {
    let config = ClusterConfig {
        locales,
        threads: 2,
        chunk_size,
    };
    let runtime = RuntimeConfig {
        seed: Some(seed),
        debug: false,
    };
    Cluster::new(&config, &runtime).unwrap()
}

fn check_structure(strings: &SegmentedStrings, char_class: CharClass) {
    let segs = strings.segs().as_slice();
    let vals = strings.vals().as_slice();
    let lengths = strings.slot_lengths();

    assert_eq!(lengths.len(), segs.len());
    let mut expected = 0i64;
    for (i, &seg) in segs.iter().enumerate() {
        assert_eq!(seg, expected, "offset {} breaks the exclusive scan", i);
        expected += lengths[i];
    }
    assert_eq!(expected as usize, vals.len());

    for (i, slot) in (0..strings.len()).map(|i| (i, strings.slot(i).unwrap())) {
        assert_eq!(*slot.last().unwrap(), 0, "string {} missing terminator", i);
        assert!(slot[..slot.len() - 1].iter().all(|&b| char_class.contains(b)));
    }
}

#[test]
fn layout_holds_for_every_cluster_shape() {
    for locales in [1, 2, 5, 16] {
        for chunk_size in [1, 7, 4096] {
            let cluster = cluster(locales, chunk_size, 9);
            let strings = new_random_strings(&cluster, 257, 0, 6, CharClass::Lowercase).unwrap();
            assert!(strings.slot_lengths().iter().all(|&l| (1..=7).contains(&l)));
            check_structure(&strings, CharClass::Lowercase);
        }
    }
}

#[test]
fn every_class_respects_its_range() {
    let cluster = cluster(3, 64, 10);
    for class in CharClass::ALL {
        let strings = new_random_strings(&cluster, 100, 1, 30, class).unwrap();
        check_structure(&strings, class);
    }
}

#[test]
fn classes_without_zero_have_one_zero_per_string() {
    let cluster = cluster(4, 32, 11);
    let strings = new_random_strings(&cluster, 1000, 0, 10, CharClass::Printable).unwrap();
    let zeros = strings.vals().iter().filter(|&&b| b == 0).count();
    assert_eq!(zeros, 1000);
}

#[test]
fn fixed_length_example() {
    let cluster = cluster(2, 4096, 12);
    let strings = new_random_strings(&cluster, 5, 2, 2, CharClass::Numeric).unwrap();
    assert_eq!(strings.segs().as_slice(), &[0, 3, 6, 9, 12]);
    for s in strings.to_strings_lossy() {
        assert_eq!(s.len(), 2);
        assert!(s.chars().all(|c| c.is_ascii_digit()));
    }
}

#[test]
fn same_seed_same_strings() {
    let a = new_random_strings(&cluster(3, 16, 13), 500, 0, 20, CharClass::Uppercase).unwrap();
    let b = new_random_strings(&cluster(3, 16, 13), 500, 0, 20, CharClass::Uppercase).unwrap();
    assert_eq!(a, b);

    let c = new_random_strings(&cluster(3, 16, 14), 500, 0, 20, CharClass::Uppercase).unwrap();
    assert_ne!(a, c);
}

#[test]
fn lognormal_strings_are_well_formed() {
    let cluster = cluster(4, 128, 15);
    let strings = new_random_strings_lognormal(&cluster, 2000, 2.0, 0.25, CharClass::Lowercase).unwrap();
    check_structure(&strings, CharClass::Lowercase);
    let mean = strings.iter().map(|s| s.len()).sum::<usize>() as f64 / strings.len() as f64;
    // median exp(2) ~ 7.4
    assert!(mean > 5.0 && mean < 10.0, "mean length {}", mean);
}

#[test]
fn invalid_requests_register_nothing() {
    let cluster = cluster(2, 16, 16);
    let mut symbols = SymbolTable::new();
    for lengths in [
        LengthDistribution::Uniform { min_len: -1, max_len: 2 },
        LengthDistribution::Uniform { min_len: 3, max_len: 2 },
        LengthDistribution::LogNormal { log_mean: 1.0, log_std: 0.0 },
    ] {
        let request = Request::RandomStrings(RandomStringsRequest {
            size: 10,
            lengths,
            char_class: CharClass::Uppercase,
        });
        let err = handle(&cluster, &mut symbols, &request).unwrap_err();
        assert!(matches!(err, GenError::Argument(_)));
    }
    assert!(symbols.is_empty());
}

#[test]
fn registered_strings_match_reply() {
    let cluster = cluster(3, 16, 17);
    let mut symbols = SymbolTable::new();
    let request = Request::RandomStrings(RandomStringsRequest {
        size: 40,
        lengths: LengthDistribution::Uniform { min_len: 1, max_len: 5 },
        char_class: CharClass::Uppercase,
    });
    let reply = handle(&cluster, &mut symbols, &request).unwrap();
    let strings = match symbols.get(&reply.name) {
        Some(Entry::Strings(strings)) => strings,
        other => panic!("unexpected entry {:?}", other),
    };
    let expected = format!(
        "created {0}.segs int64 40 1 (40) 8+created {0}.vals uint8 {1} 1 ({1}) 1",
        reply.name,
        strings.num_bytes()
    );
    assert_eq!(reply.text, expected);
}
