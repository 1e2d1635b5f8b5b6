mod instantiate;
mod invalid_config;
mod resolve;

pub use instantiate::InstantiateErrorKind;
pub use invalid_config::InvalidConfigErrorKind;
pub use resolve::ResolveErrorKind;
