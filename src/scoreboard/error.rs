/// Failures at the scoreboard boundary
///
/// None of these reach the simulation loop: the session logs them and moves
/// on, and the host reports them as a plain `success: false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreboardError {
    /// Malformed username or score payload
    InputRejected(String),
    /// The service could not be reached
    NetworkUnavailable(String),
    /// The service answered with something unexpected
    Protocol(String),
}

impl std::fmt::Display for ScoreboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputRejected(m) => write!(f, "input rejected: {m}"),
            Self::NetworkUnavailable(m) => write!(f, "network unavailable: {m}"),
            Self::Protocol(m) => write!(f, "protocol error: {m}"),
        }
    }
}

impl std::error::Error for ScoreboardError {}
