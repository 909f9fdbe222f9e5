//! Provider listing command handler.

use super::fetch::load_config;
use courier::{CourierResult, ProviderLimits};
use std::path::Path;

/// Handle `courier providers`.
pub fn list_providers(config_path: Option<&Path>) -> CourierResult<()> {
    let config = load_config(config_path)?;

    println!(
        "Retry delay: {} ms, timeout: {} ms, user agent: {}",
        config.retry.delay_ms, config.transport.timeout_ms, config.transport.user_agent
    );
    println!("{:-<80}", "");
    for name in config.provider_names() {
        if let Some(limits) = config.limits(name) {
            println!("{:<20} {}", name, describe(limits));
        }
    }
    println!("{:-<80}", "");
    println!("Total: {} providers", config.providers.len());

    Ok(())
}

fn describe(limits: &ProviderLimits) -> String {
    if limits.is_unlimited() {
        return "unlimited".to_string();
    }

    let mut parts = Vec::new();
    if let Some(max) = limits.max_concurrent {
        parts.push(format!("{} concurrent", max));
    }
    if let (Some(amount), Some(interval)) = (limits.refresh_amount(), limits.refresh_interval_ms) {
        parts.push(format!("{} per {} ms", amount, interval));
    }
    if let Some(min_time) = limits.min_time_ms {
        parts.push(format!("{} ms apart", min_time));
    }
    parts.join(", ")
}
