pub mod pricing;
pub mod checkout;
