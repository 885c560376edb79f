//! Remote interaction layer: HTTP transport, anonymous credentials and the
//! GraphQL todo gateway.

pub mod credentials;
pub mod graphql;
pub mod operations;
pub mod todo_gateway;
pub mod transport;

pub use credentials::{CredentialManager, SessionPhase};
pub use graphql::GraphQlClient;
pub use todo_gateway::GraphQlTodoGateway;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
