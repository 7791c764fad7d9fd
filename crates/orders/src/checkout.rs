//! Pure checkout rules: request validation, ownership checks, pricing.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use gamevault_core::{DomainError, GameId, Money};
use gamevault_vouchers::Voucher;

use crate::transaction::TransactionLine;

/// Validate the requested game set: non-empty, no duplicates.
pub fn validate_game_ids(game_ids: &[GameId]) -> Result<(), DomainError> {
    if game_ids.is_empty() {
        return Err(DomainError::validation("at least one game is required"));
    }

    let mut seen = HashSet::with_capacity(game_ids.len());
    for id in game_ids {
        if !seen.insert(id) {
            return Err(DomainError::validation(format!(
                "game {id} is listed more than once"
            )));
        }
    }
    Ok(())
}

/// Fail the whole request if the buyer already owns any requested game
/// (all-or-nothing; partial purchase is not permitted).
pub fn ensure_unowned(
    requested: &[TransactionLine],
    owned: &HashSet<GameId>,
) -> Result<(), DomainError> {
    for line in requested {
        if owned.contains(&line.game_id) {
            return Err(DomainError::already_owned(format!(
                "game {} was already purchased",
                line.game_id
            )));
        }
    }
    Ok(())
}

/// Compute the order total: sum of current prices, with the voucher discount
/// (if any) applied to the pre-discount sum and rounded half-up to the minor
/// unit.
///
/// The voucher is only *checked* here; incrementing its use count is part of
/// the store's atomic commit.
pub fn price_order(
    lines: &[TransactionLine],
    voucher: Option<&Voucher>,
    now: DateTime<Utc>,
) -> Result<Money, DomainError> {
    let subtotal = Money::sum(lines.iter().map(|l| l.unit_price))?;

    let Some(voucher) = voucher else {
        return Ok(subtotal);
    };

    voucher
        .check_redeemable(now)
        .map_err(|rej| DomainError::invalid_voucher(rej.to_string()))?;

    subtotal.apply_discount_percent(voucher.discount_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gamevault_core::VoucherId;

    fn line(cents: u64) -> TransactionLine {
        TransactionLine {
            game_id: GameId::new(),
            unit_price: Money::from_cents(cents),
        }
    }

    fn voucher(percent: u8, uses: u32, max_uses: u32, expires_in: Duration) -> Voucher {
        let now = Utc::now();
        Voucher {
            id: VoucherId::new(),
            code: "HALF".to_string(),
            discount_percent: percent,
            max_uses,
            uses,
            expires_at: now + expires_in,
            created_at: now,
        }
    }

    #[test]
    fn empty_game_set_is_rejected() {
        let err = validate_game_ids(&[]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn duplicate_game_ids_are_rejected() {
        let id = GameId::new();
        let err = validate_game_ids(&[id, id]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn distinct_game_ids_pass() {
        assert!(validate_game_ids(&[GameId::new(), GameId::new()]).is_ok());
    }

    #[test]
    fn owned_game_fails_whole_request() {
        let lines = vec![line(1000), line(2000)];
        let owned: HashSet<GameId> = [lines[1].game_id].into();
        let err = ensure_unowned(&lines, &owned).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyOwned(_)));
    }

    #[test]
    fn unowned_games_pass() {
        let lines = vec![line(1000)];
        assert!(ensure_unowned(&lines, &HashSet::new()).is_ok());
    }

    #[test]
    fn total_without_voucher_is_plain_sum() {
        let lines = vec![line(1000), line(2000)];
        let total = price_order(&lines, None, Utc::now()).unwrap();
        assert_eq!(total, Money::from_cents(3000));
    }

    #[test]
    fn half_voucher_halves_the_sum() {
        // Worked example: $10.00 + $20.00 at 50% -> $15.00.
        let lines = vec![line(1000), line(2000)];
        let v = voucher(50, 0, 5, Duration::days(1));
        let total = price_order(&lines, Some(&v), Utc::now()).unwrap();
        assert_eq!(total, Money::from_cents(1500));
    }

    #[test]
    fn expired_voucher_fails_pricing() {
        let lines = vec![line(1000)];
        let v = voucher(50, 0, 5, Duration::seconds(-1));
        let err = price_order(&lines, Some(&v), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidVoucher(_)));
    }

    #[test]
    fn exhausted_voucher_fails_pricing() {
        let lines = vec![line(1000)];
        let v = voucher(50, 5, 5, Duration::days(1));
        let err = price_order(&lines, Some(&v), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidVoucher(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            #[test]
            fn subtotal_is_sum_of_prices(prices in proptest::collection::vec(0u64..10_000_000, 1..20)) {
                let lines: Vec<TransactionLine> = prices.iter().map(|&c| line(c)).collect();
                let total = price_order(&lines, None, Utc::now()).unwrap();
                prop_assert_eq!(total.cents(), prices.iter().sum::<u64>());
            }

            #[test]
            fn discount_never_increases_total(
                prices in proptest::collection::vec(0u64..10_000_000, 1..20),
                percent in 1u8..=100,
            ) {
                let lines: Vec<TransactionLine> = prices.iter().map(|&c| line(c)).collect();
                let v = voucher(percent, 0, 10, Duration::days(1));
                let discounted = price_order(&lines, Some(&v), Utc::now()).unwrap();
                let full = price_order(&lines, None, Utc::now()).unwrap();
                prop_assert!(discounted <= full);
            }

            #[test]
            fn discount_rounds_half_up_on_pre_discount_sum(
                prices in proptest::collection::vec(0u64..10_000_000, 1..20),
                percent in 1u8..=100,
            ) {
                let lines: Vec<TransactionLine> = prices.iter().map(|&c| line(c)).collect();
                let subtotal: u64 = prices.iter().sum();
                let v = voucher(percent, 0, 10, Duration::days(1));
                let total = price_order(&lines, Some(&v), Utc::now()).unwrap();

                let expected_discount =
                    (u128::from(subtotal) * u128::from(percent) + 50) / 100;
                prop_assert_eq!(
                    u128::from(total.cents()),
                    u128::from(subtotal) - expected_discount
                );
            }
        }
    }
}
