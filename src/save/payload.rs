//! Text encoding for engine save blobs
//!
//! Blobs are stored as comma-separated decimal bytes (`"12,0,255"`) so they
//! survive text-only storage and can be exported as plain files. The empty
//! string is the "no save" sentinel.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("byte {position} is not a decimal value in 0..=255: {value:?}")]
    InvalidByte { position: usize, value: String },
}

pub fn encode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn decode(text: &str) -> Result<Vec<u8>, PayloadError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .enumerate()
        .map(|(position, part)| {
            part.trim().parse::<u8>().map_err(|_| PayloadError::InvalidByte {
                position,
                value: part.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_format() {
        assert_eq!(encode(&[12, 0, 255]), "12,0,255");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_decode_every_byte_value() {
        let all: Vec<u8> = (0..=255).collect();
        assert_eq!(decode(&encode(&all)).unwrap(), all);
    }

    #[test]
    fn test_empty_is_no_save() {
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
        assert_eq!(decode("  \n").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_tolerates_trailing_newline() {
        // Exported files picked up by text editors often gain one
        assert_eq!(decode("1,2,3\n").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = decode("1,256,3").unwrap_err();
        assert_eq!(
            err,
            PayloadError::InvalidByte {
                position: 1,
                value: "256".to_string()
            }
        );
        assert!(decode("1,,3").is_err());
        assert!(decode("a").is_err());
    }
}
