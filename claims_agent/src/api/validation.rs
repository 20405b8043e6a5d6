//! Query parameter validation for the tool routes

use crate::api::errors::ValidationError;
use crate::config::ChainRegistry;
use ethers::types::{Address, U256};
use ethers::utils::parse_ether;
use std::collections::HashMap;

const ETHER_DECIMALS: usize = 18;

/// Validate EVM-style address format and parse it
pub fn validate_address(field: &str, address: &str) -> Result<Address, ValidationError> {
    let invalid = |message: &str| ValidationError::new(field, message.to_string(), Some(address));

    let Some(hex_part) = address.strip_prefix("0x") else {
        return Err(invalid("Address must start with '0x'"));
    };

    if address.len() != 42 {
        return Err(invalid("Address must be 42 characters long (including '0x')"));
    }

    if !is_valid_hex(hex_part) {
        return Err(invalid("Address contains invalid hex characters"));
    }

    address
        .parse::<Address>()
        .map_err(|e| ValidationError::new(field, format!("Invalid address: {}", e), Some(address)))
}

/// Validate a chain id against the configured registry
pub fn validate_chain_id(value: &str, registry: &ChainRegistry) -> Result<u64, ValidationError> {
    let chain_id = validate_number("chainId", value)?;
    if !registry.supports(chain_id) {
        return Err(ValidationError::new(
            "chainId",
            format!("Unsupported chain id: {}", chain_id),
            Some(value),
        ));
    }
    Ok(chain_id)
}

/// Non-negative integer
pub fn validate_number(field: &str, value: &str) -> Result<u64, ValidationError> {
    value.trim().parse::<u64>().map_err(|_| {
        ValidationError::new(
            field,
            format!("Invalid number '{}' in parameter '{}'", value, field),
            Some(value),
        )
    })
}

/// Comma-separated list of non-negative integers, e.g. `1,2,3`
pub fn validate_number_list(field: &str, value: &str) -> Result<Vec<u64>, ValidationError> {
    value
        .split(',')
        .map(|item| {
            item.trim().parse::<u64>().map_err(|_| {
                ValidationError::new(
                    field,
                    format!("Invalid number '{}' in parameter '{}'", item, field),
                    Some(value),
                )
            })
        })
        .collect()
}

/// Positive decimal token amount, converted to wei (18 decimals)
pub fn validate_ether_amount(field: &str, value: &str) -> Result<U256, ValidationError> {
    let invalid = |message: String| ValidationError::new(field, message, Some(value));
    let trimmed = value.trim();

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        return Err(invalid(format!("Invalid amount '{}'", value)));
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(invalid(format!(
            "Amount '{}' has more than {} decimal places",
            value, ETHER_DECIMALS
        )));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    };

    let wei = parse_ether(normalized).map_err(|e| invalid(format!("Invalid amount '{}': {}", value, e)))?;
    if wei.is_zero() {
        return Err(invalid("Amount must be greater than zero".to_string()));
    }
    Ok(wei)
}

fn is_valid_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Typed access to the raw query string of a tool request
pub struct QueryParams<'a> {
    params: &'a HashMap<String, String>,
}

impl<'a> QueryParams<'a> {
    pub fn new(params: &'a HashMap<String, String>) -> Self {
        Self { params }
    }

    pub fn required(&self, name: &str) -> Result<&'a str, ValidationError> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                ValidationError::new(name, format!("Missing required parameter: {}", name), None)
            })
    }

    pub fn address(&self, name: &str) -> Result<Address, ValidationError> {
        validate_address(name, self.required(name)?)
    }

    pub fn chain_id(&self, registry: &ChainRegistry) -> Result<u64, ValidationError> {
        validate_chain_id(self.required("chainId")?, registry)
    }

    pub fn number(&self, name: &str) -> Result<u64, ValidationError> {
        validate_number(name, self.required(name)?)
    }

    pub fn number_list(&self, name: &str) -> Result<Vec<u64>, ValidationError> {
        validate_number_list(name, self.required(name)?)
    }

    pub fn ether_amount(&self, name: &str) -> Result<U256, ValidationError> {
        validate_ether_amount(name, self.required(name)?)
    }
}
