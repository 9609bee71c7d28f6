//! Tracing subscriber setup: console formatter and initialisation.
use tracing::Level;

/// Environment variable holding an [`tracing_subscriber::EnvFilter`]
/// directive that overrides the `--verbose` level.
pub const LOG_ENV: &str = "VEX_LOG";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Render one console line for an event at `level`.
///
/// Info lines are the bare message so vex's own output (like `Removing
/// '...'`) reads as plain text.
pub(super) fn format_line(level: Level, msg: &str) -> String {
    match level {
        Level::ERROR => format!("error: {msg}"),
        Level::WARN => format!("warning: {msg}"),
        Level::INFO => msg.to_string(),
        _ => format!("[*] {msg}"),
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits vex-style console
/// output.
struct VexFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for VexFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{}",
            format_line(*event.metadata().level(), &extractor.message)
        )
    }
}

/// Build the console filter: `directive` (from [`LOG_ENV`]) when it parses,
/// otherwise `debug` or `info` depending on `verbose`.
pub(super) fn console_filter(verbose: bool, directive: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr; everything else goes to stdout.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, directive: Option<&str>) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(VexFormatter)
        .with_writer(make_writer)
        .with_filter(console_filter(verbose, directive));

    tracing_subscriber::registry().with(console_layer).init();
}
