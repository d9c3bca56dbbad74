//! Order code generation

use jiff::civil::Date;
use rand::Rng;
use sqlx::{Postgres, Transaction};

use grosir::codes::{SUFFIX_ALPHABET, SUFFIX_LEN, order_code};

use crate::domain::orders::PgOrdersRepository;

const MAX_ATTEMPTS: usize = 5;

/// Random code suffix drawn from [`SUFFIX_ALPHABET`].
pub(crate) fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| char::from(SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())]))
        .collect()
}

/// A code for an order placed on `day` that no live order uses yet.
pub(crate) async fn unused_order_code(
    tx: &mut Transaction<'_, Postgres>,
    orders: &PgOrdersRepository,
    day: Date,
) -> Result<String, sqlx::Error> {
    let mut code = order_code(day, &random_suffix(&mut rand::thread_rng()));

    for _ in 1..MAX_ATTEMPTS {
        if !orders.code_exists(tx, &code).await? {
            break;
        }

        code = order_code(day, &random_suffix(&mut rand::thread_rng()));
    }

    // a remaining clash surfaces as a unique violation on insert
    Ok(code)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn suffix_uses_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let suffix = random_suffix(&mut rng);

            assert_eq!(suffix.len(), SUFFIX_LEN);
            assert!(
                suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)),
                "unexpected character in {suffix}"
            );
        }
    }

    #[test]
    fn suffixes_vary() {
        let mut rng = StdRng::seed_from_u64(11);

        assert_ne!(random_suffix(&mut rng), random_suffix(&mut rng));
    }
}
