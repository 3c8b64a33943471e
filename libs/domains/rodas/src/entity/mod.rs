//! SeaORM entities for the rodas tables.

pub mod age_bracket;
pub mod organizer;
pub mod roda;
pub mod roda_age_bracket;
