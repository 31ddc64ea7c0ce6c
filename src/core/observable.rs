//=========================================================================
// Observable Value
//=========================================================================
//
// A value whose setter can report changes to a sink chosen at
// construction. The stock sink writes `label: old → new` to the log.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;

use log::debug;

//=== Change Sink =========================================================

/// Receives `(label, old, new)` whenever an observed value changes.
pub type ChangeSink<T> = fn(&str, &T, &T);

fn log_change<T: Debug>(label: &str, old: &T, new: &T) {
    debug!(target: "observable", "{}: {:?} → {:?}", label, old, new);
}

/// Returns the stock sink that logs changes at debug level.
pub fn log_sink<T: Debug>() -> ChangeSink<T> {
    log_change::<T>
}

//=== Observable ==========================================================

/// Value wrapper with an optional change sink.
#[derive(Debug, Clone)]
pub struct Observable<T> {
    value: T,
    label: &'static str,
    sink: Option<ChangeSink<T>>,
}

impl<T> Observable<T> {
    /// Wraps `value` without any sink.
    pub fn new(label: &'static str, value: T) -> Self {
        Self { value, label, sink: None }
    }

    /// Wraps `value` and reports changes to `sink`.
    pub fn with_sink(label: &'static str, value: T, sink: ChangeSink<T>) -> Self {
        Self { value, label, sink: Some(sink) }
    }

    /// Returns the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Label passed to the sink.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Replaces (or removes) the change sink.
    pub fn set_sink(&mut self, sink: Option<ChangeSink<T>>) {
        self.sink = sink;
    }

    /// Returns `true` if a sink is attached.
    pub fn is_observed(&self) -> bool {
        self.sink.is_some()
    }
}

impl<T: Debug> Observable<T> {
    /// Wraps `value` and logs every change.
    pub fn logged(label: &'static str, value: T) -> Self {
        Self::with_sink(label, value, log_sink::<T>())
    }
}

impl<T: PartialEq> Observable<T> {
    /// Stores `value`, notifying the sink if it differs from the old one.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }

        let old = std::mem::replace(&mut self.value, value);
        if let Some(sink) = self.sink {
            sink(self.label, &old, &self.value);
        }
        true
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
