//! Email address generator.
//!
//! Addresses take the form `first.last{index}@provider`. The record index in
//! the local part keeps addresses unique across the whole load.

use fake::faker::internet::en::FreeEmailProvider;
use fake::Fake;
use rand::Rng;

/// Generate an email address for the given name and record index.
pub fn email_address<R: Rng>(rng: &mut R, first_name: &str, last_name: &str, index: u64) -> String {
    let provider: String = FreeEmailProvider().fake_with_rng(rng);
    let local = format!("{}.{}", local_part(first_name), local_part(last_name));
    let local = local.trim_matches('.');
    if local.is_empty() {
        format!("user{index}@{provider}")
    } else {
        format!("{local}{index}@{provider}")
    }
}

fn local_part(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_email_address_format() {
        let mut rng = StdRng::seed_from_u64(42);
        let email = email_address(&mut rng, "Mary Ann", "O'Neil", 17);

        assert!(email.starts_with("maryann.oneil17@"), "got {email}");
        assert_eq!(email.matches('@').count(), 1);
    }

    #[test]
    fn test_email_address_without_usable_name() {
        let mut rng = StdRng::seed_from_u64(42);
        let email = email_address(&mut rng, "", "'", 3);
        assert!(email.starts_with("user3@"), "got {email}");
    }
}
