//! Contract generation for a tenant
//!
//! Resolves the tenant's designated template from the document store, fills
//! its merge fields and asks the host where to save the result.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use rentdesk_common::{DEFAULT_DATE_FORMAT, FileDialog, RentalError, Result};
use rentdesk_store::fs::write_atomic;
use rentdesk_store::{DataSet, DataStore, DocumentStore, Tenant};
use tracing::{error, info};

use crate::fields::MergeFields;
use crate::template::DocxTemplate;

/// Rendering options for generated contracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractOptions {
    /// chrono format string used for every date field
    pub date_format: String,
}

impl Default for ContractOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// A rendered contract not yet written anywhere
#[derive(Debug, Clone)]
pub struct RenderedContract {
    pub tenant_name: String,
    pub bytes: Vec<u8>,
}

impl RenderedContract {
    /// File name offered by the save dialog
    pub fn default_file_name(&self) -> String {
        contract_file_name(&self.tenant_name)
    }
}

fn tenant_not_found(tenant_id: &str) -> RentalError {
    RentalError::NotFound(format!("tenant '{}'", tenant_id))
}

/// `contract-<name>.docx` with characters that are invalid in file names replaced
pub fn contract_file_name(tenant_name: &str) -> String {
    let name: String = tenant_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if name.is_empty() {
        "contract.docx".to_string()
    } else {
        format!("contract-{}.docx", name)
    }
}

/// Point a tenant at the document to use as its contract template
pub fn designate_template(store: &DataStore, tenant_id: &str, document_id: &str) -> Result<Tenant> {
    let tenant = store.update(|data| {
        let tenant = data
            .find_tenant_mut(tenant_id)
            .ok_or_else(|| tenant_not_found(tenant_id))?;
        tenant.set_contract_template_id(document_id);
        Ok(tenant.clone())
    })?;
    info!(tenant_id = %tenant_id, document_id = %document_id, "Contract template designated");
    Ok(tenant)
}

/// Render the contract for `tenant_id` as of `today`
pub fn render_contract(
    data: &DataSet,
    documents: &DocumentStore,
    tenant_id: &str,
    options: &ContractOptions,
    today: NaiveDate,
) -> Result<RenderedContract> {
    let tenant = data
        .find_tenant(tenant_id)
        .ok_or_else(|| tenant_not_found(tenant_id))?;

    let template_id = tenant
        .contract_template_id()
        .ok_or_else(|| RentalError::NoTemplate(tenant.name()))?;

    let template = DocxTemplate::open(&documents.path_of(&template_id)?)?;
    let property = tenant
        .property_id()
        .and_then(|id| data.find_property(&id));
    let fields = MergeFields::for_tenant(tenant, property, today, &options.date_format)?;

    let bytes = template.render(&fields)?;
    Ok(RenderedContract {
        tenant_name: tenant.name(),
        bytes,
    })
}

/// Generate a contract and save it where the user chooses
///
/// The document is rendered before the dialog is shown so template problems
/// are reported without prompting.
pub fn generate(
    store: &DataStore,
    documents: &DocumentStore,
    tenant_id: &str,
    options: &ContractOptions,
    dialog: &dyn FileDialog,
) -> Result<PathBuf> {
    let data = store.load();
    let contract = render_contract(&data, documents, tenant_id, options, Local::now().date_naive())
        .inspect_err(|e| {
            if e.is_diagnostic() {
                error!(tenant_id = %tenant_id, error = %e, "Failed to render contract");
            }
        })?;

    let path = dialog
        .save_path("Save Generated Contract", &contract.default_file_name())
        .ok_or_else(|| RentalError::UserCanceled("Contract generation".to_string()))?;

    write_atomic(&path, &contract.bytes)?;
    info!(tenant_id = %tenant_id, path = %path.display(), "Contract generated");
    Ok(path)
}
