use anyhow::{bail, Result};
use tracing::info;

use std::collections::BTreeMap;

use crate::{error::Error, output::Output, records::Record};

/// Something that can reduce a sequence of records to a report.
///
/// Any function or closure taking `&[Record]` and returning
/// `Result<Output>` is a handler.
pub trait Handler {
    /// Computes the report over all of `records`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if a record lacks something the report needs.
    fn compute(&self, records: &[Record]) -> Result<Output>;
}

impl<F> Handler for F
where
    F: Fn(&[Record]) -> Result<Output>,
{
    fn compute(&self, records: &[Record]) -> Result<Output> {
        self(records)
    }
}

/// Maps report names to their handlers.
///
/// Build one with [`Registry::new`] and [`Registry::register`] (or take the
/// built-in reports from [`Registry::builtin`](crate::Registry::builtin)),
/// then run reports with [`Registry::dispatch`].
///
/// # Examples
///
/// ```
/// # use ratings::{Output, Record, Registry, Value};
/// let mut registry = Registry::new();
/// registry
///     .register("row-count", |records: &[Record]| -> anyhow::Result<Output> {
///         Ok(Output::new("Report", "Value").with("rows", Value::Count(records.len())))
///     })
///     .unwrap();
/// let output = registry.dispatch("row-count", &[Record::default()]).unwrap();
/// assert_eq!(output.get("rows"), Some(&Value::Count(1)));
/// ```
#[derive(Default)]
pub struct Registry {
    handlers: BTreeMap<String, Box<dyn Handler>>,
}

impl Registry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handler` under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if a report called `name` is already registered.
    pub fn register(&mut self, name: &str, handler: impl Handler + 'static) -> Result<()> {
        if self.handlers.contains_key(name) {
            bail!("report {name:?} is already registered");
        }
        self.handlers.insert(name.to_string(), Box::new(handler));
        Ok(())
    }

    /// Returns the registered report names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Runs the report called `name` over `records`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownReport`] if no report called `name` is
    /// registered, or any error from the report's handler.
    pub fn dispatch(&self, name: &str, records: &[Record]) -> Result<Output> {
        let Some(handler) = self.handlers.get(name) else {
            return Err(Error::UnknownReport {
                name: name.to_string(),
                known: self.names().map(String::from).collect(),
            }
            .into());
        };
        info!(report = name, records = records.len(), "running report");
        handler.compute(records)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::output::Value;

    fn count_rows(records: &[Record]) -> Result<Output> {
        Ok(Output::new("Report", "Value").with("rows", Value::Count(records.len())))
    }

    #[test]
    fn dispatch_fn_runs_registered_handler() {
        let mut registry = Registry::new();
        registry.register("count", count_rows).unwrap();
        let records = vec![Record::default(), Record::default()];
        let output = registry.dispatch("count", &records).unwrap();
        assert_eq!(output.get("rows"), Some(&Value::Count(2)));
    }

    #[test]
    fn dispatch_fn_returns_unknown_report_without_running_any_handler() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let mut registry = Registry::new();
        registry
            .register("count", move |records: &[Record]| -> Result<Output> {
                seen.set(seen.get() + 1);
                count_rows(records)
            })
            .unwrap();
        let err = registry.dispatch("bogus", &[]).unwrap_err();
        let Some(Error::UnknownReport { name, known }) = err.downcast_ref::<Error>() else {
            panic!("wrong error: {err}");
        };
        assert_eq!(name, "bogus");
        assert_eq!(known, &vec!["count".to_string()]);
        assert_eq!(calls.get(), 0, "handler should not have run");
    }

    #[test]
    fn register_fn_makes_new_report_dispatchable_alongside_existing_ones() {
        let mut registry = Registry::new();
        registry.register("count", count_rows).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["count"]);
        registry
            .register("constant", |_: &[Record]| -> Result<Output> {
                Ok(Output::new("Report", "Value").with("answer", Value::Number(42.0)))
            })
            .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["constant", "count"]);
        let output = registry.dispatch("constant", &[]).unwrap();
        assert_eq!(output.get("answer"), Some(&Value::Number(42.0)));
        let output = registry.dispatch("count", &[Record::default()]).unwrap();
        assert_eq!(output.get("rows"), Some(&Value::Count(1)));
    }

    #[test]
    fn register_fn_rejects_duplicate_name() {
        let mut registry = Registry::new();
        registry.register("count", count_rows).unwrap();
        assert!(registry.register("count", count_rows).is_err());
    }

    #[test]
    fn handler_errors_propagate_from_dispatch() {
        let mut registry = Registry::new();
        registry
            .register("failing", |_: &[Record]| -> Result<Output> {
                Err(Error::Value {
                    location: "record".into(),
                    reason: "bad".into(),
                }
                .into())
            })
            .unwrap();
        let err = registry.dispatch("failing", &[]).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Value { .. })));
    }
}
