pub mod graphql;
pub mod queries;
pub mod retry;

pub use graphql::{
    interpret, GraphqlRequest, GraphqlTransport, HttpTransport, MondayClient, TransportResponse,
};
pub use retry::{retry_transient, RetryPolicy};
