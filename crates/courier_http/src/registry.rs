//! Per-provider routing of requests through their rate limiters.

use crate::{RequestExecutor, RetryPolicy, Transport};
use courier_core::{Normalized, RequestDescriptor};
use courier_error::{CourierError, CourierResult};
use courier_rate_limit::{CourierConfig, RateLimiter, UsageStats};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Owns the retry policy and one rate limiter per configured provider.
///
/// Build one at startup and share it with every provider integration.
///
/// # Example
///
/// ```rust,no_run
/// use courier_core::RequestDescriptor;
/// use courier_http::ProviderRegistry;
/// use courier_rate_limit::CourierConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = ProviderRegistry::from_config(&CourierConfig::load()?)?;
///
/// let request = RequestDescriptor::get("https://api.github.com/repos/rust-lang/rust")
///     .abort_status(404)
///     .build()?;
///
/// match registry.request("github", &request).await? {
///     Some(result) => println!("{}", result.to_json()),
///     None => println!("not found"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProviderRegistry {
    policy: RetryPolicy,
    limiters: HashMap<String, Arc<RateLimiter>>,
}

impl ProviderRegistry {
    /// Build a registry that talks to the network through reqwest.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a provider's
    /// limits are invalid.
    pub fn from_config(config: &CourierConfig) -> CourierResult<Self> {
        let executor = RequestExecutor::from_config(&config.transport)?;
        Self::with_executor(config, executor)
    }

    /// Build a registry over a custom transport.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider's limits are invalid.
    pub fn with_transport(
        config: &CourierConfig,
        transport: Arc<dyn Transport>,
    ) -> CourierResult<Self> {
        let executor = RequestExecutor::new(transport, config.transport.user_agent.clone());
        Self::with_executor(config, executor)
    }

    #[instrument(skip_all, fields(providers = config.providers.len()))]
    fn with_executor(config: &CourierConfig, executor: RequestExecutor) -> CourierResult<Self> {
        let limiters = config
            .providers
            .iter()
            .map(|(name, limits)| -> CourierResult<_> {
                Ok((name.clone(), Arc::new(RateLimiter::new(name, limits)?)))
            })
            .collect::<CourierResult<HashMap<_, _>>>()?;

        info!(
            providers = limiters.len(),
            retry_delay_ms = config.retry.delay_ms,
            "Provider registry ready"
        );

        Ok(Self {
            policy: RetryPolicy::from_config(executor, &config.retry),
            limiters,
        })
    }

    /// Send a request on behalf of `provider`.
    ///
    /// Waits for the provider's limiter when one is configured; requests for
    /// other providers go out immediately. `Ok(None)` means the response
    /// status was one of the descriptor's abort statuses.
    ///
    /// # Errors
    ///
    /// Returns the classified HTTP failure left after the retry policy ran.
    #[instrument(skip(self, descriptor), fields(url = %descriptor.url()))]
    pub async fn request(
        &self,
        provider: &str,
        descriptor: &RequestDescriptor,
    ) -> CourierResult<Option<Normalized>> {
        match self.limiters.get(provider) {
            Some(limiter) => {
                limiter
                    .schedule(|| async {
                        self.policy
                            .execute(descriptor)
                            .await
                            .map_err(CourierError::from)
                    })
                    .await
            }
            None => {
                debug!("No limiter configured, sending directly");
                Ok(self.policy.execute(descriptor).await?)
            }
        }
    }

    /// Usage statistics for one provider.
    pub fn stats(&self, provider: &str) -> Option<UsageStats> {
        self.limiters.get(provider).map(|limiter| limiter.stats())
    }

    /// Usage statistics for every configured provider, by name.
    pub fn all_stats(&self) -> BTreeMap<String, UsageStats> {
        self.limiters
            .iter()
            .map(|(name, limiter)| (name.clone(), limiter.stats()))
            .collect()
    }

    /// The limiter for a provider.
    pub fn limiter(&self, provider: &str) -> Option<&Arc<RateLimiter>> {
        self.limiters.get(provider)
    }

    /// Configured provider names, sorted.
    pub fn providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.limiters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The retry policy shared by every provider.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}
