//! Primary data load and save

use rentdesk_store::DataSet;

use crate::model::{AppContext, OperationResult};

/// Saved data, or an empty data set when there is none
pub fn load_data(ctx: &AppContext) -> OperationResult<DataSet> {
    OperationResult::ok(ctx.data_store().load())
}

pub fn save_data(ctx: &AppContext, data: &DataSet) -> OperationResult<()> {
    OperationResult::from_result("save-data", ctx.data_store().save(data))
}
