// Round-trip and boundary tests for the block cipher transform
// Covers label limits, capacity tightness, suffix rejection and corruption

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use subdomain_encoding::{
    packing, padding, AesCipher, BlockCipherTransform, DomainName, SubdomainError,
    MAX_DOMAIN_NAME_LEN, MAX_LABEL_LEN,
};

const KEY: &[u8; 32] = b"change this password to a secret";

fn transform(base: &str) -> BlockCipherTransform<AesCipher> {
    BlockCipherTransform::new(
        DomainName::parse(base).expect("valid base domain"),
        AesCipher::new(KEY).expect("valid AES key"),
    )
}

fn long_base() -> String {
    // 63 + 1 + 63 + 1 + 63 = 191 characters
    vec!["a".repeat(63), "b".repeat(63), "c".repeat(63)].join(".")
}

fn bases() -> Vec<String> {
    vec![
        "test.com".to_string(),
        "tunnel.example.com".to_string(),
        "x.io".to_string(),
        long_base(),
    ]
}

/// Every label within limits and generated labels only use [A-Z2-7]
fn assert_valid_name(name: &str, base: &str) {
    assert!(name.len() <= MAX_DOMAIN_NAME_LEN, "{} is {} chars", name, name.len());
    for label in name.split('.') {
        assert!(!label.is_empty() && label.len() <= MAX_LABEL_LEN, "bad label {:?}", label);
    }

    let payload = name
        .strip_suffix(base)
        .and_then(|p| p.strip_suffix('.'))
        .expect("name ends with base domain");
    assert!(payload
        .bytes()
        .all(|b| b == b'.' || b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b)));
}

#[test]
fn test_hello_world_scenario() {
    let transform = transform("test.com");
    let name = transform.encode(b"Hello World!").expect("encode");

    let (label, rest) = name.split_once('.').unwrap();
    assert_eq!(label.len(), 26);
    assert_eq!(rest, "test.com");
    assert_eq!(name, "AKFBHAWBJRHPUXCR5DEPSOJJOM.test.com");

    assert_eq!(transform.decode(&name).expect("decode"), b"Hello World!");
}

#[test]
fn test_random_round_trip_all_sizes() {
    let mut rng = StdRng::seed_from_u64(0x41414141);

    for base in bases() {
        let transform = transform(&base);
        let max = transform.max_payload_bytes();
        assert!(max > 0, "no capacity below {}", base);

        for size in 0..=max {
            let mut buf = vec![0u8; size];
            rng.fill_bytes(&mut buf);

            let name = transform.encode(&buf).expect("encode must succeed");
            assert_valid_name(&name, &base);
            assert_eq!(transform.decode(&name).expect("decode must succeed"), buf);
        }
    }
}

#[test]
fn test_capacity_is_tight() {
    for base in bases() {
        let transform = transform(&base);
        let base_len = transform.base_domain().len();
        let max = transform.max_payload_bytes();

        let name = transform.encode(&vec![0xFF; max]).expect("max payload fits");
        assert!(name.len() <= MAX_DOMAIN_NAME_LEN);

        // One more byte needs another block, which cannot be packed
        let over = packing::encoded_len(padding::padded_len(max + 1, 16));
        assert!(packing::plan_labels(over, base_len, 16).is_none(), "{}", base);

        assert!(matches!(
            transform.encode(&vec![0xFF; max + 1]),
            Err(SubdomainError::PayloadTooLarge { .. })
        ));
    }
}

#[test]
fn test_known_capacities() {
    assert_eq!(transform("test.com").max_payload_bytes(), 143);
    assert_eq!(transform("tunnel.example.com").max_payload_bytes(), 127);
}

#[test]
fn test_full_name_layout() {
    let transform = transform("test.com");
    let name = transform.encode(&[0x42; 143]).unwrap();

    let lengths: Vec<usize> = name.split('.').map(str::len).collect();
    assert_eq!(lengths, vec![48, 48, 48, 48, 39, 4, 3]);
    assert_eq!(name.len(), 244);
}

#[test]
fn test_encoding_is_deterministic() {
    let transform = transform("test.com");
    let payload = b"same input, same key";

    assert_eq!(transform.encrypt(payload).unwrap(), transform.encrypt(payload).unwrap());
    assert_eq!(transform.encode(payload).unwrap(), transform.encode(payload).unwrap());
}

#[test]
fn test_different_keys_differ() {
    let a = transform("test.com");
    let b = BlockCipherTransform::new(
        DomainName::parse("test.com").unwrap(),
        AesCipher::new(&[0u8; 32]).unwrap(),
    );

    let name = a.encode(b"Hello World!").unwrap();
    assert_ne!(name, b.encode(b"Hello World!").unwrap());
    // Wrong key decodes to garbage or bad padding, never the original
    match b.decode(&name) {
        Ok(bytes) => assert_ne!(bytes, b"Hello World!"),
        Err(err) => assert!(matches!(err, SubdomainError::PaddingError(_))),
    }
}

#[test]
fn test_mismatched_suffix_rejected_first() {
    let transform = transform("test.com");
    let name = transform.encode(b"payload").unwrap();
    let prefix = name.strip_suffix(".test.com").unwrap();

    // Garbage payload too: the suffix check must win
    for candidate in [
        format!("{}.example.com", prefix),
        format!("{}.test.org", prefix),
        format!("{}.test.com.au", prefix),
        "!!!not-base32!!!.example.com".to_string(),
        "A.bad".to_string(),
    ] {
        assert!(
            matches!(
                transform.decode(&candidate),
                Err(SubdomainError::DomainMismatchError { .. })
            ),
            "{}",
            candidate
        );
    }
}

#[test]
fn test_single_character_corruption() {
    let transform = transform("test.com");
    let original = b"Hello World!";
    let name = transform.encode(original).unwrap();
    let label_len = name.find('.').unwrap();

    for i in 0..label_len {
        let mut corrupted = name.clone().into_bytes();
        corrupted[i] = if corrupted[i] == b'A' { b'B' } else { b'A' };
        let corrupted = String::from_utf8(corrupted).unwrap();

        // No integrity tag: garbage is allowed, the original is not
        match transform.decode(&corrupted) {
            Ok(bytes) => assert_ne!(bytes, original, "position {}", i),
            Err(err) => assert!(
                matches!(
                    err,
                    SubdomainError::DecodingError(_) | SubdomainError::PaddingError(_)
                ),
                "position {}: {}",
                i,
                err
            ),
        }
    }
}

#[test]
fn test_truncated_name() {
    let transform = transform("test.com");
    let name = transform.encode(&[7u8; 100]).unwrap();

    // Drop the first label: fewer blocks or a broken base-32 length
    let (_, rest) = name.split_once('.').unwrap();
    assert!(matches!(
        transform.decode(rest),
        Err(SubdomainError::ConfigurationError(_))
            | Err(SubdomainError::DecodingError(_))
            | Err(SubdomainError::PaddingError(_))
    ));
}

#[test]
fn test_shared_across_threads() {
    let transform = std::sync::Arc::new(transform("test.com"));
    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let transform = std::sync::Arc::clone(&transform);
            std::thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(i as u64);
                let len = rng.gen_range(0..=143);
                let payload: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
                let name = transform.encode(&payload).unwrap();
                assert_eq!(transform.decode(&name).unwrap(), payload);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
