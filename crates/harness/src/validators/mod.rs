//! Validators: evaluators that parse the response (HTML or JSON) and score
//! it from several independent sub-checks.

pub mod freshness;
pub mod seo;

pub use freshness::{DataFreshnessValidator, FreshnessParams};
pub use seo::{SeoCheck, SeoParams, SeoValidator};
