/// API gateway layer
///
/// The one place admin code talks to the REST backend:
/// - `outcome`: verbs, requests and the tagged ok/error result
/// - `client`: the reqwest-backed gateway with post-mutation revalidation

pub mod client;
pub mod outcome;

pub use client::{admin_path, ApiGateway};
pub use outcome::{ApiRequest, GatewayError, Method, Outcome};
