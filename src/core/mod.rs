pub mod baseline;
pub mod energy_model;
pub mod financials;
pub mod measure;
pub mod savings;
pub mod units;
