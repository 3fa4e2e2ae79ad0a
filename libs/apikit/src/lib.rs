//! HTTP plumbing shared by Bloomwell modules: RFC 9457 problem responses,
//! request-id propagation, the ingress router and shutdown signals.

pub mod ingress;
pub mod openapi;
pub mod problem;
pub mod request_id;
pub mod shutdown;

pub use ingress::{build_router, IngressOptions, StaticMount};
pub use problem::{from_parts, Problem, ProblemResponse, ValidationError};
pub use request_id::XRequestId;
