// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// uft core: file categories, the operation registry, argument collection,
// dispatch and execution reports shared by every crate.

pub mod collect;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod external;
pub mod human_errors;
pub mod paths;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod types;

pub use collect::{ArgumentCollector, ArgumentSource, FlagSource, MapSource};
pub use config::{ToolConfig, WriteMode};
pub use dispatch::Dispatcher;
pub use error::{ErrorKind, FailureCause, Result, UftError, ValidationReason};
pub use registry::{Handler, Invocation, Operation, OperationDescriptor, Outcome, Registry};
pub use report::ExecutionReport;
pub use resolver::CategoryResolver;
pub use types::*;
