pub mod validation;

pub use validation::{ValidatedJson, not_blank};
