// Composition root for the auctions marketplace.
//
// Responsibilities
// - Read config from environment.
// - Instantiate concrete infrastructure implementations and bind them in the registry.
// - Wrap every request in a scoped transaction.
// - Expose the HTTP and GraphQL surface.

pub mod bootstrap;
pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
pub mod transaction_scope;
