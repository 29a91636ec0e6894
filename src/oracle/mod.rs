pub mod gemini;
pub mod prompt;
pub mod response;
pub mod traits;
pub mod types;

pub use gemini::GeminiOracle;
pub use traits::ScoringOracle;
pub use types::{OracleParams, OracleScore};
