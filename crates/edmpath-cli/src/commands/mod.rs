//! CLI command implementations.

pub mod schema;
pub mod template;
pub mod translate;

use anyhow::Result;
use edmpath::{EdmModel, sample};

use crate::SampleModel;

/// Builds the selected sample model.
pub fn load_model(model: SampleModel) -> Result<EdmModel> {
    let model = match model {
        SampleModel::Customers => sample::customer_order_model()?,
        SampleModel::Open => sample::open_type_model()?,
    };
    Ok(model)
}
