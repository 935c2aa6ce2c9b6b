//! Contract template designation and generation

use std::path::PathBuf;

use rentdesk_common::FileDialog;
use rentdesk_store::Tenant;

use crate::model::{AppContext, OperationResult};

pub fn designate_template(
    ctx: &AppContext,
    tenant_id: &str,
    document_id: &str,
) -> OperationResult<Tenant> {
    OperationResult::from_result(
        "designate-template",
        rentdesk_contract::designate_template(ctx.data_store(), tenant_id, document_id),
    )
}

pub fn generate_contract(
    ctx: &AppContext,
    tenant_id: &str,
    dialog: &dyn FileDialog,
) -> OperationResult<PathBuf> {
    OperationResult::from_result(
        "generate-contract",
        rentdesk_contract::generate(
            ctx.data_store(),
            ctx.documents(),
            tenant_id,
            &ctx.contract_options(),
            dialog,
        ),
    )
}
