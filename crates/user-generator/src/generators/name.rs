//! Person name generators.

use super::sanitize;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::Rng;

/// Generate a random first name.
pub fn first_name<R: Rng>(rng: &mut R) -> String {
    let value: String = FirstName().fake_with_rng(rng);
    sanitize(&value)
}

/// Generate a random last name.
pub fn last_name<R: Rng>(rng: &mut R) -> String {
    let value: String = LastName().fake_with_rng(rng);
    sanitize(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_names_are_not_empty() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            assert!(!first_name(&mut rng).is_empty());
            assert!(!last_name(&mut rng).is_empty());
        }
    }

    #[test]
    fn test_names_are_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(3);
        let mut rng2 = StdRng::seed_from_u64(3);
        assert_eq!(first_name(&mut rng1), first_name(&mut rng2));
        assert_eq!(last_name(&mut rng1), last_name(&mut rng2));
    }
}
