use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use once_cell::sync::Lazy;
use prometheus::{Encoder, Opts, TextEncoder};

/// Register additional metrics of our own structs by using this registry instance.
static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry(prometheus::Registry::new()));

pub static CMD_START_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("command_start", Opts::new("command_start_usage_total", "count of /start invocations"))
});
pub static CMD_HELP_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("command_help", Opts::new("command_help_usage_total", "count of /help invocations"))
});
pub static CMD_STATUS_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("command_status", Opts::new("command_status_usage_total", "count of /status invocations"))
});
pub static CMD_TOP_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("command_top", Opts::new("command_top_usage_total", "count of /top invocations"))
});
pub static CMD_COUNTRY_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("command_country", Opts::new("command_country_usage_total", "count of /country invocations"))
});
pub static CMD_NEWS_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("command_news", Opts::new("command_news_usage_total", "count of /news invocations"))
});
pub static CMD_MUTE_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("command_mute", Opts::new("command_mute_usage_total", "count of /mute and /unmute invocations"))
});
pub static POLL_CYCLES_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("poll_cycles", Opts::new("poll_cycles_total", "count of completed fetch-reconcile-alert cycles"))
});
pub static ALERT_DELIVERY: Lazy<ComplexCommandCounters> = Lazy::new(|| {
    let opts = Opts::new("alert_delivery_total", "count of alert fan-outs and per-recipient deliveries");
    ComplexCommandCounters {
        invoked: Counter::new("alert_delivery (fanout)", opts.clone().const_label("state", "fanout")),
        finished: Counter::new("alert_delivery (delivered)", opts.const_label("state", "delivered")),
    }
});
pub static DELIVERY_ERRORS_COUNTER: Lazy<Counter> = Lazy::new(|| {
    Counter::new("delivery_errors", Opts::new("delivery_errors_total", "count of per-recipient delivery failures"))
});

pub fn init() -> axum::Router {
    let prometheus = REGISTRY
        .register(&CMD_START_COUNTER)
        .register(&CMD_HELP_COUNTER)
        .register(&CMD_STATUS_COUNTER)
        .register(&CMD_TOP_COUNTER)
        .register(&CMD_COUNTRY_COUNTER)
        .register(&CMD_NEWS_COUNTER)
        .register(&CMD_MUTE_COUNTER)
        .register(&POLL_CYCLES_COUNTER)
        .register(&ALERT_DELIVERY.invoked)
        .register(&ALERT_DELIVERY.finished)
        .register(&DELIVERY_ERRORS_COUNTER)
        .unwrap();

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    axum::Router::new()
        .route("/metrics", get(|| async move {
            let mut buffer = vec![];
            let metrics = prometheus.gather();
            TextEncoder::new().encode(&metrics, &mut buffer).unwrap();
            let custom_metrics = String::from_utf8(buffer).unwrap();

            metric_handle.render() + custom_metrics.as_str()
        }))
        .layer(prometheus_layer)
}

pub struct Counter {
    inner: prometheus::Counter,
    name: String
}
pub struct ComplexCommandCounters {
    invoked: Counter,
    finished: Counter,
}
struct Registry(prometheus::Registry);

impl Counter {
    fn new(name: &str, opts: Opts) -> Counter {
        let c = prometheus::Counter::with_opts(opts)
            .unwrap_or_else(|e| panic!("unable to create {name} counter: {e}"));
        Counter { inner: c, name: name.to_string() }
    }

    pub fn inc(&self) {
        self.inner.inc()
    }
}

impl ComplexCommandCounters {
    pub fn invoked(&self) {
        self.invoked.inc()
    }

    pub fn finished(&self) {
        self.finished.inc()
    }
}

impl Registry {
    fn register(&self, counter: &Counter) -> &Self {
        self.0.register(Box::new(counter.inner.clone()))
            .unwrap_or_else(|e| panic!("unable to register the {} counter: {e}", counter.name));
        self
    }

    fn unwrap(&self) -> prometheus::Registry {
        self.0.clone()
    }
}
