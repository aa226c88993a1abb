use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        for id in ["emp-1", "dept-Engineering", "company-Acme", ""] {
            let first = stable_pair(id);
            let second = stable_pair(id);
            assert_eq!(first, second);
            assert!((-1.0..=1.0).contains(&first.0));
            assert!((-1.0..=1.0).contains(&first.1));
        }
    }
}
