/// Four dot-separated canonical decimal octets, e.g. `203.0.113.7`.
///
/// Leading zeros, signs and surrounding whitespace are rejected.
pub fn is_ipv4(candidate: &str) -> bool {
    let parts: Vec<&str> = candidate.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    parts
        .iter()
        .all(|part| matches!(part.parse::<u8>(), Ok(n) if n.to_string() == *part))
}

/// Loose check: at least one colon and no dot.
///
/// This is not full IPv6 grammar validation. It keeps IPv4 answers (and
/// IPv4-mapped forms) out of the `ipv6` slot and accepts everything else that
/// looks colon-separated.
pub fn is_ipv6(candidate: &str) -> bool {
    candidate.contains(':') && !candidate.contains('.')
}
