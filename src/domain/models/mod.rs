pub mod config;
pub mod endpoint;
pub mod liveness;
pub mod matches;
pub mod properties;

pub use config::{
    ClientConfig, Config, LogFormat, LoggingConfig, ReadinessConfig, RotationPolicy,
    ServiceConfig,
};
pub use endpoint::{EndpointError, ServiceEndpoint};
pub use liveness::LivenessState;
pub use matches::{flatten_matches, IndexedWord, MatchesError, QueryOutput};
pub use properties::{InputFormat, Properties, PropertyValue, UnknownInputFormat};
