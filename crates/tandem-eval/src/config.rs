pub const ENV_FUEL: &str = "TANDEM_FUEL";
pub const ENV_LOG: &str = "TANDEM_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

pub fn env_u64_nonzero(name: &str) -> Option<u64> {
    std::env::var(name).ok().as_deref().and_then(parse_u64_nonzero)
}

fn parse_u64_nonzero(v: &str) -> Option<u64> {
    v.trim().parse::<u64>().ok().filter(|&v| v != 0)
}

/// Fuel budget: command line, then plan, then `TANDEM_FUEL`. `None` means
/// unlimited.
pub fn resolve_fuel(cli: Option<u64>, plan: Option<u64>) -> Option<u64> {
    cli.or(plan).or_else(|| env_u64_nonzero(ENV_FUEL))
}
