//! `gamevault-vouchers` — promotional discount codes.

pub mod voucher;

pub use voucher::{NewVoucher, Voucher, VoucherRejection};
