// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dispatcher: look up an operation, collect its arguments, run its handler,
// and turn whatever happens into an ExecutionReport.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{info, instrument, warn};

use crate::collect::{ArgumentCollector, ArgumentSource};
use crate::config::ToolConfig;
use crate::error::{Result, UftError};
use crate::registry::{Invocation, Outcome, Registry};
use crate::report::ExecutionReport;
use crate::types::{Category, FileTarget};

/// Single error-classification boundary between callers and handlers.
pub struct Dispatcher<'r> {
    registry: &'r Registry,
    config: ToolConfig,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r Registry, config: ToolConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Run one operation. Never panics and never returns an error: every
    /// failure ends up in the report.
    #[instrument(skip(self, target, source), fields(path = %target.path.display()))]
    pub fn execute(
        &self,
        category: Category,
        operation_id: &str,
        target: &FileTarget,
        source: &mut dyn ArgumentSource,
    ) -> ExecutionReport {
        match self.run(category, operation_id, target, source) {
            Ok(outcome) => {
                info!(outputs = outcome.outputs.len(), "operation succeeded");
                ExecutionReport::succeeded(operation_id, category, outcome)
            }
            Err(err) => {
                warn!(error = %err, kind = %err.kind(), "operation failed");
                ExecutionReport::failed(operation_id, category, &err)
            }
        }
    }

    fn run(
        &self,
        category: Category,
        operation_id: &str,
        target: &FileTarget,
        source: &mut dyn ArgumentSource,
    ) -> Result<Outcome> {
        let operation = self.registry.find(category, operation_id)?;
        // Nothing touches the filesystem until every argument is valid.
        let args = ArgumentCollector::collect(operation.descriptor.parameters, source)?;
        let invocation = Invocation {
            target,
            args: &args,
            config: &self.config,
        };
        let handler = operation.handler;
        catch_unwind(AssertUnwindSafe(|| handler(&invocation)))
            .unwrap_or_else(|payload| Err(UftError::Panicked(panic_message(payload.as_ref()))))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::MapSource;
    use crate::error::{ErrorKind, FailureCause};
    use crate::registry::Operation;
    use crate::types::ParameterSpec;
    use std::cell::Cell;

    thread_local! {
        static CALLS: Cell<u32> = const { Cell::new(0) };
    }

    fn counting(inv: &Invocation<'_>) -> Result<Outcome> {
        CALLS.with(|c| c.set(c.get() + 1));
        let width = inv.args.int("width")?;
        Ok(Outcome::written(inv.path(), format!("resized to {width}")))
    }

    fn failing(inv: &Invocation<'_>) -> Result<Outcome> {
        Err(UftError::io_at(
            inv.path(),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ))
    }

    fn exploding(_: &Invocation<'_>) -> Result<Outcome> {
        panic!("decoder blew up");
    }

    const WIDTH: &[ParameterSpec] = &[ParameterSpec::int("width", "Width").range(1.0, 10_000.0)];

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register_all(&[
                Operation::new(Category::Image, "resize", "Resize", WIDTH, counting),
                Operation::new(Category::Image, "missing", "Missing", &[], failing),
                Operation::new(Category::Image, "panic", "Panic", &[], exploding),
            ])
            .unwrap();
        registry
    }

    fn target() -> FileTarget {
        FileTarget::new("photo.png").unwrap()
    }

    #[test]
    fn success_reports_outputs() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, ToolConfig::default());
        let mut source = MapSource::new().with("width", "64");
        let report = dispatcher.execute(Category::Image, "resize", &target(), &mut source);
        assert!(report.success, "{}", report.message);
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.message, "resized to 64");
    }

    #[test]
    fn invalid_argument_never_reaches_handler() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, ToolConfig::default());
        CALLS.with(|c| c.set(0));
        let mut source = MapSource::new().with("width", "0");
        let report = dispatcher.execute(Category::Image, "resize", &target(), &mut source);
        assert_eq!(report.error_kind, Some(ErrorKind::InvalidArgument));
        assert_eq!(CALLS.with(Cell::get), 0);
    }

    #[test]
    fn unknown_operation_is_reported() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, ToolConfig::default());
        let report = dispatcher.execute(Category::Image, "sharpen", &target(), &mut MapSource::new());
        assert_eq!(report.error_kind, Some(ErrorKind::UnknownOperation));
    }

    #[test]
    fn handler_errors_are_classified() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, ToolConfig::default());
        let report = dispatcher.execute(Category::Image, "missing", &target(), &mut MapSource::new());
        assert_eq!(report.error_kind, Some(ErrorKind::NotFound));
    }

    #[test]
    fn handler_panics_become_reports() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry, ToolConfig::default());
        let report = dispatcher.execute(Category::Image, "panic", &target(), &mut MapSource::new());
        assert_eq!(
            report.error_kind,
            Some(ErrorKind::HandlerFailure(FailureCause::Panic))
        );
        assert!(report.message.contains("decoder blew up"));
    }
}
