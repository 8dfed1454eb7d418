pub mod defs;

pub use defs::{
    validate_registry, CanonicalArticle, RawSharePayload, RegistryError, ShareOutcome,
    SourceDescriptor,
};
