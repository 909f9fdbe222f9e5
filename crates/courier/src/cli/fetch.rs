//! One-off request command handler.

use super::commands::FetchArgs;
use courier::{
    BuilderError, BuilderErrorKind, CourierConfig, CourierResult, JsonError, ProviderRegistry,
    RequestBody, RequestDescriptor, ResponseMode,
};
use serde_json::Value as JsonValue;
use std::path::Path;
use tracing::{debug, instrument};

/// Load configuration from an explicit file, or the layered defaults.
pub(crate) fn load_config(path: Option<&Path>) -> CourierResult<CourierConfig> {
    match path {
        Some(path) => CourierConfig::from_file(path),
        None => CourierConfig::load(),
    }
}

/// Handle `courier fetch`.
#[instrument(skip_all, fields(url = %args.url))]
pub async fn run_fetch(args: FetchArgs, verbose: bool) -> CourierResult<()> {
    let config = load_config(args.config.as_deref())?;
    let registry = ProviderRegistry::from_config(&config)?;
    let descriptor = build_descriptor(&args)?;

    let result = match &args.provider {
        Some(provider) => registry.request(provider, &descriptor).await?,
        None => {
            debug!("No provider given, skipping rate limiting");
            registry.policy().execute(&descriptor).await?
        }
    };

    let output = result.map(|r| r.to_json()).unwrap_or(JsonValue::Null);
    let rendered = serde_json::to_string_pretty(&output).map_err(JsonError::from)?;
    println!("{}", rendered);

    let stats = args.provider.as_deref().and_then(|p| registry.stats(p));
    if let Some(stats) = stats.filter(|_| verbose) {
        let rendered = serde_json::to_string_pretty(&stats).map_err(JsonError::from)?;
        eprintln!("Usage stats: {}", rendered);
    }

    Ok(())
}

fn build_descriptor(args: &FetchArgs) -> CourierResult<RequestDescriptor> {
    let mut builder = RequestDescriptor::builder();
    builder
        .method(args.method)
        .url(args.url.as_str())
        .abort_statuses(args.abort_statuses.iter().copied());

    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        builder.header(name, value);
    }

    if let Some(body) = &args.json {
        let value: JsonValue = serde_json::from_str(body).map_err(JsonError::from)?;
        builder.body(RequestBody::Json(value));
    }

    if args.envelope {
        builder.response_mode(ResponseMode::Envelope);
    }

    Ok(builder.build()?)
}

fn parse_header(raw: &str) -> Result<(&str, &str), BuilderError> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(BuilderError::new(BuilderErrorKind::ValidationFailed(
            format!("expected header 'Name: value', got '{}'", raw),
        ))),
    }
}
