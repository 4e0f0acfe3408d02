//! The JSON level container consumed by the driver.
//!
//! Levels travel as plain JSON; recorded solutions are embedded as base64
//! `(input, hold)` byte pairs so a container stays a single line-friendly
//! document.

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use gridlock_core::{Direction, LevelData, LevelOutcome, SolutionData, SolutionStep};
use serde::{Deserialize, Serialize};

/// A level description plus an optional embedded recording.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct LevelContainer {
    /// The level description itself.
    pub(crate) level: LevelData,
    /// The recording to replay against the level, if any.
    #[serde(default)]
    pub(crate) solution: Option<SolutionContainer>,
}

/// An embedded recording and the RNG state it assumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct SolutionContainer {
    /// Base64-encoded `(input, hold)` byte pairs.
    pub(crate) moves: String,
    /// Blob RNG seed the recording was made with.
    #[serde(default)]
    pub(crate) blob_mod_seed: Option<u8>,
    /// Initial random-force-floor direction.
    #[serde(default)]
    pub(crate) rff_direction: Option<Direction>,
    /// The outcome the recording is expected to reproduce.
    #[serde(default)]
    pub(crate) expected_outcome: Option<LevelOutcome>,
}

/// Errors that can occur while decoding an embedded recording.
#[derive(Debug)]
pub(crate) enum SolutionDecodeError {
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The byte stream did not consist of `(input, hold)` pairs.
    OddLength(usize),
}

impl fmt::Display for SolutionDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode the solution payload: {error}")
            }
            Self::OddLength(length) => write!(
                f,
                "solution byte stream has odd length {length}, expected (input, hold) pairs"
            ),
        }
    }
}

impl Error for SolutionDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::OddLength(_) => None,
        }
    }
}

/// Decodes the embedded recording into solution data.
pub(crate) fn decode_solution(
    container: &SolutionContainer,
) -> Result<SolutionData, SolutionDecodeError> {
    let bytes = STANDARD_NO_PAD
        .decode(container.moves.as_bytes())
        .map_err(SolutionDecodeError::InvalidEncoding)?;
    if bytes.len() % 2 != 0 {
        return Err(SolutionDecodeError::OddLength(bytes.len()));
    }
    let steps = bytes
        .chunks_exact(2)
        .map(|pair| SolutionStep::new(pair[0], pair[1]))
        .collect();
    Ok(SolutionData {
        steps,
        blob_mod_seed: container.blob_mod_seed,
        rff_direction: container.rff_direction,
        expected_outcome: container.expected_outcome.clone(),
    })
}

/// Encodes solution steps into the container's base64 payload form.
pub(crate) fn encode_solution(steps: &[SolutionStep]) -> String {
    let mut bytes = Vec::with_capacity(steps.len() * 2);
    for step in steps {
        bytes.push(step.input);
        bytes.push(step.hold);
    }
    STANDARD_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_payload_round_trips() {
        let steps = vec![
            SolutionStep::new(0x02, 12),
            SolutionStep::new(0x00, 3),
            SolutionStep::new(0x06, SolutionStep::HOLD_FOREVER),
        ];
        let container = SolutionContainer {
            moves: encode_solution(&steps),
            blob_mod_seed: Some(0x42),
            rff_direction: None,
            expected_outcome: None,
        };
        let decoded = decode_solution(&container).expect("payload decodes");
        assert_eq!(decoded.steps, steps);
        assert_eq!(decoded.blob_mod_seed, Some(0x42));
    }

    #[test]
    fn odd_payloads_are_rejected() {
        let container = SolutionContainer {
            moves: STANDARD_NO_PAD.encode([0x01u8, 0x02, 0x03]),
            blob_mod_seed: None,
            rff_direction: None,
            expected_outcome: None,
        };
        assert!(matches!(
            decode_solution(&container),
            Err(SolutionDecodeError::OddLength(3))
        ));
    }
}
