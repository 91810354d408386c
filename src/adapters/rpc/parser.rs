use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing 0x prefix: {0}")]
    MissingPrefix(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

const WEI_PER_GWEI: f64 = 1_000_000_000.0;

fn hex_digits(quantity: &str) -> ParseResult<&str> {
    let digits = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .ok_or_else(|| ParseError::MissingPrefix(quantity.to_string()))?;

    if digits.is_empty() {
        return Err(ParseError::Parse("Empty quantity".to_string()));
    }

    Ok(digits)
}

/// Parse a JSON-RPC hex quantity such as `0x1a`
pub fn parse_quantity(quantity: &str) -> ParseResult<u64> {
    let digits = hex_digits(quantity)?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| ParseError::Parse(format!("{}: {}", quantity, e)))
}

/// Parse a hex quantity that may exceed 64 bits (wei amounts)
pub fn parse_quantity_u128(quantity: &str) -> ParseResult<u128> {
    let digits = hex_digits(quantity)?;
    u128::from_str_radix(digits, 16)
        .map_err(|e| ParseError::Parse(format!("{}: {}", quantity, e)))
}

/// Encode a block number as a hex quantity
pub fn to_quantity(value: u64) -> String {
    format!("{:#x}", value)
}

pub fn wei_to_gwei(wei: u128) -> f64 {
    wei as f64 / WEI_PER_GWEI
}

/// Mean seconds per block between two block timestamps `blocks` apart
pub fn average_block_time(newest_timestamp: u64, oldest_timestamp: u64, blocks: u64) -> f64 {
    if blocks == 0 {
        return 0.0;
    }
    newest_timestamp.saturating_sub(oldest_timestamp) as f64 / blocks as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1a").unwrap(), 26);
        assert_eq!(parse_quantity("0X1A").unwrap(), 26);
    }

    #[test]
    fn test_parse_quantity_rejects_malformed() {
        assert!(matches!(parse_quantity("1a"), Err(ParseError::MissingPrefix(_))));
        assert!(matches!(parse_quantity("0x"), Err(ParseError::Parse(_))));
        assert!(matches!(parse_quantity("0xzz"), Err(ParseError::Parse(_))));
    }

    #[test]
    fn test_parse_large_quantity() {
        let wei = parse_quantity_u128("0x56bc75e2d63100000").unwrap();
        assert_eq!(wei, 100_000_000_000_000_000_000);
        assert!(parse_quantity("0x56bc75e2d63100000").is_err());
    }

    #[test]
    fn test_to_quantity() {
        assert_eq!(to_quantity(0), "0x0");
        assert_eq!(to_quantity(255), "0xff");
    }

    #[test]
    fn test_wei_to_gwei() {
        assert_eq!(wei_to_gwei(1_500_000_000), 1.5);
        assert_eq!(wei_to_gwei(0), 0.0);
    }

    #[test]
    fn test_average_block_time() {
        assert_eq!(average_block_time(1_100, 1_000, 50), 2.0);
        assert_eq!(average_block_time(1_000, 1_000, 0), 0.0);
        assert_eq!(average_block_time(900, 1_000, 10), 0.0);
    }
}
