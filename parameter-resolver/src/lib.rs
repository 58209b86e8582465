pub mod configs;
pub mod dedup;
pub mod domain;
pub mod encoding;
pub mod error;
pub mod fetcher;
pub mod files;
pub mod matcher;
pub mod policy;
pub mod resolver;
pub mod store;
pub mod substitutor;

pub use domain::{ParameterInfo, ParameterReference, ParameterType, ReferenceKind, ResolutionMap};
pub use encoding::OutputEncoding;
pub use error::{InputError, ResolveError};
pub use policy::{NotFoundPolicy, ResolveOptions, SecureReferencePolicy};
pub use resolver::ParameterResolver;
pub use store::{FetchedParameters, ParameterStore, StoreError};
