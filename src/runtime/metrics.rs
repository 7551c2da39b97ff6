use std::{collections::BTreeMap, time::Duration};

/// Cumulative elapsed time per literal command text.
///
/// Keys are the text as typed, so `echo hi` and `echo  hi` are tracked
/// separately. Totals only grow for the lifetime of the session.
#[derive(Debug, Default, Clone)]
pub struct Metrics {
    totals: BTreeMap<String, Duration>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, command: &str, elapsed: Duration) {
        *self.totals.entry(command.to_string()).or_default() += elapsed;
    }

    pub fn total(&self, command: &str) -> Option<Duration> {
        self.totals.get(command).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Duration)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
