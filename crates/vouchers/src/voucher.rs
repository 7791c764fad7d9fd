use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gamevault_core::{DomainError, VoucherId};

/// A promotional code granting a percentage discount.
///
/// # Invariants
/// - Codes are unique per store (enforced by the storage layer).
/// - `uses` is incremented by exactly one per successful purchase that
///   references the voucher, never by anything else.
/// - A voucher with `uses >= max_uses` or past `expires_at` is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: VoucherId,
    pub code: String,
    pub discount_percent: u8,
    pub max_uses: u32,
    pub uses: u32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Why a voucher cannot be redeemed right now.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VoucherRejection {
    #[error("voucher has expired")]
    Expired,

    #[error("voucher redemption limit reached")]
    Exhausted,
}

impl Voucher {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_exhausted(&self) -> bool {
        self.uses >= self.max_uses
    }

    /// Check redeemability without mutating anything; the use-count increment
    /// happens inside the store's purchase commit.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), VoucherRejection> {
        if self.is_expired(now) {
            return Err(VoucherRejection::Expired);
        }
        if self.is_exhausted() {
            return Err(VoucherRejection::Exhausted);
        }
        Ok(())
    }
}

/// Validated voucher-creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVoucher {
    pub code: String,
    pub discount_percent: u8,
    pub max_uses: u32,
    pub expires_at: DateTime<Utc>,
}

impl NewVoucher {
    pub fn new(
        code: impl Into<String>,
        discount_percent: u8,
        max_uses: u32,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let code = code.into().trim().to_uppercase();
        if code.is_empty() {
            return Err(DomainError::validation("voucher code must not be empty"));
        }
        if discount_percent == 0 || discount_percent > 100 {
            return Err(DomainError::validation(
                "discount percent must be between 1 and 100",
            ));
        }
        if max_uses == 0 {
            return Err(DomainError::validation("max uses must be at least 1"));
        }

        Ok(Self {
            code,
            discount_percent,
            max_uses,
            expires_at,
        })
    }

    pub fn into_voucher(self, now: DateTime<Utc>) -> Voucher {
        Voucher {
            id: VoucherId::new(),
            code: self.code,
            discount_percent: self.discount_percent,
            max_uses: self.max_uses,
            uses: 0,
            expires_at: self.expires_at,
            created_at: now,
        }
    }
}
