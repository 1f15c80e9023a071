//! Polynomial rolling hash used to derive per-column seeds.

const BASE: i128 = 53;
const MODULUS: i128 = 28_871_271_685_163;

/// `Σ codepoint(c_i) · 53^i mod 28871271685163`.
///
/// Stable across releases; changing it changes every generated value.
pub fn hash_seed_string(input: &str) -> i64 {
    let mut hash: i128 = 0;
    let mut power: i128 = 1;
    for c in input.chars() {
        hash = (hash + (c as i128) * power) % MODULUS;
        power = (power * BASE) % MODULUS;
    }
    hash as i64
}

/// Seed of a single column: `seed + hash("table.column")`.
pub fn column_seed(seed: i64, table: &str, column: &str) -> i64 {
    seed.wrapping_add(hash_seed_string(&format!("{table}.{column}")))
}

/// Seed of a keyed group (composite unique key, foreign-key signature).
pub fn group_seed(seed: i64, key: &str) -> i64 {
    seed.wrapping_add(hash_seed_string(key))
}
