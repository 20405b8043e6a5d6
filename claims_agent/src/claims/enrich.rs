use super::{ClaimRecord, EnrichedClaimRecord};

/// Base Sepolia. The only chain whose vesting schedule is expressed in days.
pub const TEST_NETWORK_CHAIN_ID: u64 = 84532;

pub const CLAIM_TYPE_NAMES: [&str; 6] = [
    "Unlocked", "Investor", "Team", "Advisor", "Treasury", "PreSale",
];

pub const UNKNOWN_CLAIM_TYPE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingDurations {
    pub cliff: u32,
    pub vest: u32,
}

const fn durations(cliff: u32, vest: u32) -> VestingDurations {
    VestingDurations { cliff, vest }
}

/// Indexed by claim type, parallel to [`CLAIM_TYPE_NAMES`].
pub const CLAIM_DURATIONS: [VestingDurations; 6] = [
    durations(0, 0),
    durations(12, 24),
    durations(12, 28),
    durations(12, 18),
    durations(0, 36),
    durations(0, 36),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Day,
    Month,
}

impl DurationUnit {
    /// Stored durations are unit-less; the test network runs the same
    /// schedule in days so it can be exercised quickly.
    pub fn for_chain(chain_id: u64) -> Self {
        if chain_id == TEST_NETWORK_CHAIN_ID {
            DurationUnit::Day
        } else {
            DurationUnit::Month
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Day => "day",
            DurationUnit::Month => "month",
        }
    }
}

pub fn claim_type_name(claim_type: u32) -> &'static str {
    CLAIM_TYPE_NAMES
        .get(claim_type as usize)
        .copied()
        .unwrap_or(UNKNOWN_CLAIM_TYPE)
}

/// Out-of-range claim types vest immediately: `{cliff: 0, vest: 0}`.
pub fn vesting_durations(claim_type: u32) -> VestingDurations {
    CLAIM_DURATIONS
        .get(claim_type as usize)
        .copied()
        .unwrap_or(durations(0, 0))
}

pub fn format_duration(amount: u32, unit: DurationUnit) -> String {
    let suffix = if amount == 1 { "" } else { "s" };
    format!("{} {}{}", amount, unit.as_str(), suffix)
}

pub fn enrich(record: ClaimRecord, chain_id: u64, claimed: bool) -> EnrichedClaimRecord {
    let unit = DurationUnit::for_chain(chain_id);
    let VestingDurations { cliff, vest } = vesting_durations(record.claim_type);

    EnrichedClaimRecord {
        claim_type_name: claim_type_name(record.claim_type),
        cliff: format_duration(cliff, unit),
        vesting: format_duration(vest, unit),
        claimed,
        record,
    }
}
