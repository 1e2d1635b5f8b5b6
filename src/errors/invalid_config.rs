use alloc::string::String;

use super::InstantiateErrorKind;

/// A definition, provider, target type or member reference is structurally wrong.
/// Always a configuration defect, never a transient condition.
#[derive(thiserror::Error, Debug)]
pub enum InvalidConfigErrorKind {
    #[error("Definition has no target class")]
    NoTarget,
    #[error("Definition entry [{key}] has a value of the wrong shape")]
    MalformedEntry { key: String },
    #[error("Target class [{target}] does not exist")]
    TargetNotFound { target: String },
    #[error("Target [{target}] is not instantiable")]
    NotInstantiable { target: String },
    #[error("Unresolvable dependency resolving [{parameter}] in {declaring}")]
    UnresolvableParameter { parameter: String, declaring: String },
    #[error("Target method [{method}] of class [{target}] does not exist")]
    NoMethod { method: String, target: String },
    #[error("Failed to make reflection of class [{target}]")]
    Reflection { target: String },
    #[error("Target property [{property}] of class [{target}] does not exist")]
    NoProperty { property: String, target: String },
    #[error("Failed to assign property [{property}] of class [{target}]")]
    PropertyAssignment {
        property: String,
        target: String,
        #[source]
        source: InstantiateErrorKind,
    },
    #[error("Service provider [{id}] should be an instance of Provider")]
    NotProvider { id: String },
}
