//! RentDesk Contract - Lease contracts generated from DOCX templates
//!
//! - [`DocxTemplate`]: placeholder scanning and rendering
//! - [`MergeFields`]: tenant and property values keyed by field name
//! - [`generate`]: resolve a tenant's template, render it and save the result

pub mod fields;
pub mod generator;
pub mod template;

pub use fields::{FIELD_NAMES, MergeFields};
pub use generator::{
    ContractOptions, RenderedContract, contract_file_name, designate_template, generate,
    render_contract,
};
pub use template::DocxTemplate;
