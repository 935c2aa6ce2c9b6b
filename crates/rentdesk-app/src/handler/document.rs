//! Document upload and viewing

use rentdesk_common::{FileDialog, RentalError};
use rentdesk_store::StoredDocument;

use crate::model::{AppContext, OperationResult};

/// Ask for a file and copy it into the document store
pub fn upload_document(ctx: &AppContext, dialog: &dyn FileDialog) -> OperationResult<StoredDocument> {
    let result = dialog
        .open_path("Upload Document", &[])
        .ok_or_else(|| RentalError::UserCanceled("Upload".to_string()))
        .and_then(|source| ctx.documents().store(&source));
    OperationResult::from_result("upload-document", result)
}

pub fn open_document(ctx: &AppContext, file_id: &str) -> OperationResult<()> {
    OperationResult::from_result("open-document", ctx.documents().open(file_id, ctx.shell()))
}
