pub mod models;
pub mod prompt;
pub mod render;

pub use models::create_model;

pub mod prelude {
    pub use crate::models::create_model;
    pub use crate::prompt;
    pub use crate::render;
    pub use dg_core::{Error, Result, Summarizer};
}
