use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Forecast year {forecast} must be after base year {base}")]
    InvalidYears { base: i32, forecast: i32 },

    #[error("Invalid analysis limit '{name}': {value}")]
    InvalidLimit { name: &'static str, value: f64 },
}
