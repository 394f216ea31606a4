// Label packing for encoded payloads
//
// Decides how encoded text is cut into labels below a base domain, and how
// many plaintext bytes fit into one name. Encode and the capacity query share
// `plan_labels`, so the capacity is exactly what encode can pack.

use crate::domain_name::{MAX_DOMAIN_NAME_LEN, MAX_LABEL_LEN};
use data_encoding::BASE32_NOPAD;

/// Characters per full label: the largest multiple of `block_size` <= 63
pub fn label_capacity(block_size: usize) -> usize {
    (MAX_LABEL_LEN / block_size) * block_size
}

/// Base-32 (no padding) length of `len` bytes, `ceil(len * 8 / 5)`
pub fn encoded_len(len: usize) -> usize {
    BASE32_NOPAD.encode_len(len)
}

/// Label lengths, leftmost label first, for `encoded_len` characters placed
/// below a base domain rendered in `base_len` characters
///
/// Each label takes `min(remaining, label_capacity)` characters. Returns
/// `None` when the text cannot fit.
pub fn plan_labels(encoded_len: usize, base_len: usize, block_size: usize) -> Option<Vec<usize>> {
    let capacity = label_capacity(block_size);
    let mut current = base_len;
    let mut remaining = encoded_len;
    let mut plan = Vec::new();

    while remaining > 0 {
        let separator = usize::from(current > 0);
        let room = MAX_DOMAIN_NAME_LEN.checked_sub(current + separator)?;

        // Every remaining character needs room, so a label that does not
        // fit whole means the text does not fit at all
        let take = remaining.min(capacity);
        if take > room {
            return None;
        }

        plan.push(take);
        current += separator + take;
        remaining -= take;
    }

    Some(plan)
}

/// Largest plaintext length whose padded, encoded form fits one name
///
/// Padding always adds at least one byte, so `n` blocks carry at most
/// `n * block_size - 1` bytes. Zero when not even one block fits.
pub fn max_payload_bytes(base_len: usize, block_size: usize) -> usize {
    if block_size == 0 || block_size > MAX_LABEL_LEN {
        return 0;
    }

    let mut blocks = 0;
    while plan_labels(encoded_len((blocks + 1) * block_size), base_len, block_size).is_some() {
        blocks += 1;
    }

    (blocks * block_size).saturating_sub(1)
}

/// Cut `text` into labels following `plan`
pub fn split_labels<'a>(text: &'a str, plan: &[usize]) -> Vec<&'a str> {
    let mut labels = Vec::with_capacity(plan.len());
    let mut start = 0;
    for &len in plan {
        labels.push(&text[start..start + len]);
        start += len;
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_capacity() {
        assert_eq!(label_capacity(16), 48);
        assert_eq!(label_capacity(8), 56);
        assert_eq!(label_capacity(1), 63);
        assert_eq!(label_capacity(32), 32);
        assert_eq!(label_capacity(63), 63);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(16), 26);
        assert_eq!(encoded_len(5), 8);
        assert_eq!(encoded_len(144), 231);
    }

    #[test]
    fn test_plan_single_block() {
        // "test.com" is 8 characters
        assert_eq!(plan_labels(26, 8, 16), Some(vec![26]));
    }

    #[test]
    fn test_plan_full_name() {
        // 9 AES blocks: 231 chars in 48-char labels, 8 + 5 + 231 = 244
        assert_eq!(plan_labels(231, 8, 16), Some(vec![48, 48, 48, 48, 39]));
        // 10 blocks: 256 chars never fit
        assert_eq!(plan_labels(256, 8, 16), None);
    }

    #[test]
    fn test_plan_room_boundary() {
        // 200 + 1 + 52 = 253
        assert_eq!(plan_labels(52, 200, 4), Some(vec![52]));
        assert_eq!(plan_labels(53, 200, 4), None);
        // 190 + 1 + 60 = 251, then 2 chars would need 3
        assert_eq!(plan_labels(62, 190, 4), None);
        assert_eq!(plan_labels(61, 190, 4), Some(vec![60, 1]));
    }

    #[test]
    fn test_plan_without_base() {
        assert_eq!(plan_labels(26, 0, 16), Some(vec![26]));
        assert_eq!(plan_labels(100, 0, 16), Some(vec![48, 48, 4]));
    }

    #[test]
    fn test_max_payload_bytes() {
        assert_eq!(max_payload_bytes("test.com".len(), 16), 143);
        assert_eq!(max_payload_bytes("tunnel.example.com".len(), 16), 127);
        assert_eq!(max_payload_bytes(0, 16), 143);
        assert_eq!(max_payload_bytes("test.com".len(), 8), 143);
        assert_eq!(max_payload_bytes("test.com".len(), 63), 125);
        assert_eq!(max_payload_bytes("test.com".len(), 64), 0);
        assert_eq!(max_payload_bytes("test.com".len(), 0), 0);
        assert_eq!(max_payload_bytes(250, 16), 0);
    }

    #[test]
    fn test_split_labels() {
        let text = "ABCDEFGHIJ";
        assert_eq!(split_labels(text, &[4, 4, 2]), vec!["ABCD", "EFGH", "IJ"]);
    }
}
