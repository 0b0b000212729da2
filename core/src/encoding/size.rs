/// Exact padded Base64 length of `n` raw bytes: `ceil(n / 3) * 4`.
#[inline]
pub fn calculate_base64_size(n: u64) -> u64 {
    n.div_ceil(3) * 4
}
