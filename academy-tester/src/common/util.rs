use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("no seeds given")]
    Empty,
    #[error("seed '{0}' is not an unsigned integer")]
    Invalid(String),
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a comma list of decimal or `0x`-prefixed hexadecimal seeds.
pub fn parse_seeds(s: &str) -> Result<Vec<u64>, SeedError> {
    let seeds = split_csv(s)
        .into_iter()
        .map(|token| {
            let parsed = token.strip_prefix("0x").map_or_else(
                || token.parse::<u64>(),
                |hex| u64::from_str_radix(&hex.replace('_', ""), 16),
            );
            parsed.map_err(|_| SeedError::Invalid(token.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if seeds.is_empty() {
        return Err(SeedError::Empty);
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn parse_seeds_accepts_decimal_and_hex() {
        assert_eq!(parse_seeds("1337, 0xC0_FFEE"), Ok(vec![1337, 0x00C0_FFEE]));
    }

    #[test]
    fn parse_seeds_rejects_garbage_and_empty() {
        assert_eq!(
            parse_seeds("12,abc"),
            Err(SeedError::Invalid("abc".to_string()))
        );
        assert_eq!(parse_seeds(" , "), Err(SeedError::Empty));
    }
}
