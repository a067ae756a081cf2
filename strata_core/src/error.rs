// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by every strata crate.

extern crate alloc;

use alloc::string::String;

use crate::id::{AxisId, SubplotId};
use crate::layer::LayerId;

/// Result alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while building or drawing a chart.
///
/// Configuration errors are not recovered locally: they abort the pass that raised them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A string could not be parsed as an axis id (`x`, `x2`, `y13`, ...).
    #[error("invalid axis id `{0}`")]
    InvalidAxisId(String),
    /// A string could not be parsed as a subplot id (`xy`, `x2y3`, ...).
    #[error("invalid subplot id `{0}`")]
    InvalidSubplotId(String),
    /// An axis id was looked up but is not part of the current layout.
    #[error("axis `{0}` does not exist in the current layout")]
    UnknownAxis(AxisId),
    /// A subplot id was looked up but is not part of the current layout.
    #[error("subplot `{0}` does not exist in the current layout")]
    UnknownSubplot(SubplotId),
    /// A layer id refers to a node that has been removed from the layer tree.
    #[error("layer {0:?} no longer exists")]
    StaleLayer(LayerId),
    /// A trace names a trace type that has no registered module.
    #[error("trace {index} uses unregistered trace type `{trace_type}`")]
    UnknownTraceType {
        /// Index of the offending trace in declaration order.
        index: usize,
        /// The unregistered trace type name.
        trace_type: String,
    },
    /// A trace module failed while drawing into its layer.
    #[error("plot module `{module}` failed: {message}")]
    Plot {
        /// Name of the failing module.
        module: String,
        /// Module-provided description.
        message: String,
    },
}
