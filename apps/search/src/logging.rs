//! Logging and span export for the search binary
//!
//! Log lines go to stderr; stdout carries the search result. A log file and
//! OTLP span export are opt-in through `[logging]`. Exported spans carry the
//! active search backend (and the index for Elasticsearch) as resource
//! attributes.

use std::path::Path;
use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{Config as TraceConfig, Sampler, TracerProvider};
use opentelemetry_sdk::Resource;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::{Config, SearchBackend};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keep alive until the process exits: flushes the log file and pending
/// spans when dropped.
pub struct TelemetryGuard {
    _file_guard: Option<WorkerGuard>,
    exporting: bool,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if self.exporting {
            global::shutdown_tracer_provider();
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `logging.level`.
pub fn init_logging(config: &Config) -> anyhow::Result<TelemetryGuard> {
    let logging = &config.logging;
    let mut layers: Vec<BoxedLayer> = vec![console_layer(logging.json)];

    let file_guard = match &logging.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            layers.push(file_layer(logging.json, writer));
            Some(guard)
        }
        None => None,
    };

    // Export failures fall back to local logs only
    let mut otel_error = None;
    let mut exporting = false;
    if logging.opentelemetry_enabled {
        match init_tracer_provider(config) {
            Ok(provider) => {
                let tracer = provider.tracer("storefront-search");
                layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
                global::set_tracer_provider(provider);
                exporting = true;
            }
            Err(e) => otel_error = Some(e),
        }
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&logging.level)));

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    if let Some(e) = otel_error {
        tracing::warn!(error = %e, "OpenTelemetry export disabled");
    }
    tracing::debug!(
        backend = config.search.backend.as_str(),
        exporting,
        log_file = ?logging.file,
        "Logging initialized"
    );

    Ok(TelemetryGuard {
        _file_guard: file_guard,
        exporting,
    })
}

fn filter_directives(level: &str) -> String {
    // sqlx logs every statement at info
    format!("storefront_search={level},storefront_model={level},sqlx=warn,reqwest=warn,hyper=warn")
}

fn console_layer(json: bool) -> BoxedLayer {
    if json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer().with_target(true).with_writer(std::io::stderr).boxed()
    }
}

fn file_layer(json: bool, writer: NonBlocking) -> BoxedLayer {
    if json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer().with_ansi(false).with_writer(writer).boxed()
    }
}

/// Appending writer for `path`, one file for every run
fn file_writer(path: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("logging.file has no file name: {}", path.display()))?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)?;

    Ok(tracing_appender::non_blocking(
        tracing_appender::rolling::never(directory, file_name),
    ))
}

fn build_resource_attributes(config: &Config) -> Resource {
    let logging = &config.logging;
    let version = logging
        .service_version
        .clone()
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    let mut attributes = vec![
        KeyValue::new("service.name", logging.service_name.clone()),
        KeyValue::new("service.version", version),
        KeyValue::new(
            "deployment.environment",
            logging.deployment_environment.clone(),
        ),
        KeyValue::new("storefront.search.backend", config.search.backend.as_str()),
    ];
    if config.search.backend == SearchBackend::Elasticsearch {
        attributes.push(KeyValue::new(
            "storefront.elasticsearch.index",
            config.elasticsearch.index.clone(),
        ));
    }

    Resource::new(attributes)
}

fn sampler(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(ratio)))
    }
}

/// Batch OTLP exporter over gRPC
fn init_tracer_provider(config: &Config) -> anyhow::Result<TracerProvider> {
    let logging = &config.logging;
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(&logging.otlp_endpoint)
        .with_timeout(Duration::from_secs(logging.otlp_timeout_seconds))
        .build_span_exporter()
        .map_err(|e| anyhow::anyhow!("Failed to create OTLP exporter: {e}"))?;

    let trace_config = TraceConfig::default()
        .with_sampler(sampler(logging.trace_sample_ratio))
        .with_resource(build_resource_attributes(config));

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_config(trace_config)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::{Key, Value};

    #[test]
    fn resource_names_backend_and_index() {
        let mut config = Config::default();
        config.search.backend = SearchBackend::Elasticsearch;
        let resource = build_resource_attributes(&config);

        assert_eq!(
            resource.get(Key::new("storefront.search.backend")),
            Some(Value::from("elasticsearch"))
        );
        assert_eq!(
            resource.get(Key::new("storefront.elasticsearch.index")),
            Some(Value::from("storefront_products"))
        );
    }

    #[test]
    fn dbal_resource_has_no_index() {
        let resource = build_resource_attributes(&Config::default());
        assert_eq!(
            resource.get(Key::new("storefront.search.backend")),
            Some(Value::from("dbal"))
        );
        assert!(resource
            .get(Key::new("storefront.elasticsearch.index"))
            .is_none());
    }

    #[test]
    fn filter_applies_level_to_own_crates_only() {
        let directives = filter_directives("debug");
        assert!(directives.starts_with("storefront_search=debug,storefront_model=debug"));
        assert!(directives.contains("sqlx=warn"));
    }

    #[test]
    fn sample_ratio_picks_sampler() {
        assert!(matches!(sampler(1.0), Sampler::AlwaysOn));
        assert!(matches!(sampler(0.0), Sampler::AlwaysOff));
        assert!(matches!(sampler(0.25), Sampler::ParentBased(_)));
    }
}
