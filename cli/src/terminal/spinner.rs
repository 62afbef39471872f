use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

/// Runs `work` under a spinner that stays below any log lines it emits.
///
/// The span is handed to `work` so it can update the message as it goes.
pub fn with_spinner<R>(message: &str, work: impl FnOnce(&Span) -> R) -> R {
    let span = info_span!("build", indicatif.pb_show = true);
    span.pb_set_style(&spinner_style());
    span.pb_set_message(message);
    span.in_scope(|| work(&span))
}

pub fn set_message(span: &Span, message: &str) {
    span.pb_set_message(message);
}
