/// Error types for the yield/price service.
/// The calculator reports precise causes; the submission boundary collapses
/// every failure into a single input-error outcome for the user.
#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("input error: {0}")]
    Input(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("session store error: {0}")]
    Session(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CalcError {
    fn from(e: std::io::Error) -> Self {
        CalcError::Io(e.to_string())
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
