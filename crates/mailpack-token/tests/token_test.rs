use mailpack_token::{decode, decode_at, encode, encode_at, get_life};

const HOUR: u64 = 3600;

#[test]
fn test_round_trip_now() {
    for (secret, key, life) in [
        ("hunter2", "saltvalue", 3600),
        ("", "k", 1),
        ("pässwörd ✓", "ключ", 86400),
        ("a much longer mailbox password that wraps onto several base64 lines once encoded", "k", 604800),
    ] {
        let now = 1_650_000_000;
        let token = encode_at(secret, key, life, now).unwrap();
        assert_eq!(decode_at(&token, key, now).unwrap(), secret);
    }
}

#[test]
fn test_round_trip_wall_clock() {
    // A one-week window makes crossing a bucket edge mid-test vanishingly rare.
    let token = encode("hunter2", "saltvalue", 7 * 24 * HOUR).unwrap();
    assert_eq!(decode(&token, "saltvalue").unwrap(), "hunter2");
}

#[test]
fn test_get_life() {
    for life in [1, 59, 3600, 604800, u32::MAX as u64] {
        let token = encode_at("secret", "key", life, 1_700_000_000).unwrap();
        assert_eq!(get_life(&token).unwrap(), life);
    }
}

#[test]
fn test_decode_within_same_hour() {
    let minted = 1_700_000_000;
    let token = encode_at("hunter2", "saltvalue", HOUR, minted).unwrap();

    // 1_700_000_000 sits 800s into its hour bucket
    assert_eq!(decode_at(&token, "saltvalue", minted + 2000).unwrap(), "hunter2");
    assert_eq!(decode_at(&token, "saltvalue", minted - 800).unwrap(), "hunter2");
}

#[test]
fn test_interoperates_with_existing_tokens() {
    // Minted by the existing publisher for ("hunter2", "saltvalue", 3600) at 1_700_000_000
    let token = "Yn9kfm94OHwzNjAw";
    assert_eq!(decode_at(token, "saltvalue", 1_700_000_000).unwrap(), "hunter2");
    assert_eq!(get_life(token).unwrap(), HOUR);
    assert_eq!(encode_at("hunter2", "saltvalue", HOUR, 1_700_000_000).unwrap(), token);
}

#[test]
fn test_decode_after_two_hours_is_garbage() {
    let minted = 1_700_000_000;
    let token = encode_at("hunter2", "saltvalue", HOUR, minted).unwrap();

    let expired = decode_at(&token, "saltvalue", minted + 2 * HOUR).unwrap();
    assert_ne!(expired, "hunter2");
    assert_eq!(expired, "jwlvgp0");
}

#[test]
fn test_wrong_key_is_garbage() {
    let token = encode_at("hunter2", "saltvalue", HOUR, 1_700_000_000).unwrap();
    assert_ne!(decode_at(&token, "pepper", 1_700_000_000).unwrap(), "hunter2");
}
