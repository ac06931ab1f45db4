//! Export of voxel regions to DanWorld files
//!
//! This crate walks a selection of a [`BlockSource`], builds the chunk grid
//! of a [`DanWorld`](dan_format::DanWorld) and manages the per-user world
//! projects that describe what to export.

pub mod exporter;
pub mod source;
pub mod workspace;

pub use exporter::{ExportReport, Exporter, VOID_MATERIAL};
pub use source::{BlockSource, BlockState, SparseSource};
pub use workspace::{encode_extra, ProjectEntry, WorldStatus, Workspace};

use dan_core::error::DanError;

/// Result type for export operations
pub type ExportResult<T> = Result<T, DanError>;
