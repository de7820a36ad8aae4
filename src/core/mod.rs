pub mod arithmetic;
pub mod extract;
pub mod resolver;

pub use crate::domain::model::{Expression, Resolution, Strategy};
pub use crate::domain::ports::{ConfigProvider, TextGenerator};
pub use crate::utils::error::Result;
