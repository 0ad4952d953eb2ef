mod data;
mod encoder;
mod error;
mod model;
pub mod schema;
mod solver;
mod split;
mod stats;

pub use data::{DataError, LabeledTable};
pub use encoder::{OneHotEncoder, UnknownPolicy};
pub use error::MlError;
pub use model::LinearRegression;
pub use schema::Schema;
pub use split::{Split, train_test_split};
pub use stats::{RegressionStats, r_squared};
