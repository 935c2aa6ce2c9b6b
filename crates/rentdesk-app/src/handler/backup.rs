//! User-initiated backup and restore

use std::path::PathBuf;

use rentdesk_common::FileDialog;
use rentdesk_store::DataSet;

use crate::model::{AppContext, OperationResult};

/// Archive `data` together with every stored document
pub fn backup(ctx: &AppContext, data: &DataSet, dialog: &dyn FileDialog) -> OperationResult<PathBuf> {
    OperationResult::from_result(
        "backup",
        rentdesk_backup::backup(data, ctx.documents(), dialog),
    )
}

/// Restore documents from an archive and return its data set
///
/// The data set is not persisted; the caller decides when to save it.
pub fn restore(ctx: &AppContext, dialog: &dyn FileDialog) -> OperationResult<DataSet> {
    OperationResult::from_result("restore", rentdesk_backup::restore(ctx.documents(), dialog))
}
