//! Domain error types.

/// Top-level error type for bolsa.
#[derive(Debug, thiserror::Error)]
pub enum BolsaError {
    #[error("unknown strategy \"{name}\"")]
    UnknownStrategy { name: String },

    #[error("insufficient data for {strategy}: have {bars} bars, need {minimum}")]
    InsufficientData {
        strategy: String,
        bars: usize,
        minimum: usize,
    },

    #[error("start date must be before end date")]
    InvalidDateRange,

    #[error("price series is empty")]
    EmptyPriceSeries,

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("starting capital must be positive, got {value}")]
    InvalidCapital { value: f64 },

    #[error("commission rate must be in [0, 1), got {value}")]
    InvalidCommission { value: f64 },

    #[error("data error for {symbol}: {reason}")]
    Data { symbol: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BolsaError> for std::process::ExitCode {
    fn from(err: &BolsaError) -> Self {
        let code: u8 = match err {
            BolsaError::Io(_) => 1,
            BolsaError::ConfigParse { .. } | BolsaError::ConfigInvalid { .. } => 2,
            BolsaError::Data { .. } => 3,
            BolsaError::UnknownStrategy { .. } => 4,
            BolsaError::InsufficientData { .. }
            | BolsaError::EmptyPriceSeries
            | BolsaError::InvalidSeries { .. }
            | BolsaError::InvalidDateRange
            | BolsaError::InvalidCapital { .. }
            | BolsaError::InvalidCommission { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
