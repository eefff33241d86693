pub mod export;
pub mod record;
