pub mod check;
pub mod export;
pub mod record_ops;
pub mod search;
