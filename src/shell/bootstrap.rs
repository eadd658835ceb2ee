// Composition root for the auctions marketplace.
//
// Responsibilities
// - Open the connection source named by the settings.
// - Build the scoped connection provider and the transaction hooks around it.
// - Subscribe the customer relationship facade to the event bus.
// - Bind every capability the use cases resolve, request scoped ones as providers.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::modules::auctions::adapters::outbound::auction_queries::{
    ConnectionGetActiveAuctions, ConnectionGetSingleAuction,
};
use crate::modules::auctions::adapters::outbound::auctions_repository::UnitOfWorkAuctionsRepository;
use crate::modules::auctions::adapters::outbound::payments::InMemoryPaymentProvider;
use crate::modules::auctions::application::ports::{
    AuctionsRepository, GetActiveAuctions, GetSingleAuction, PaymentProvider,
};
use crate::modules::customer_relationship::CustomerRelationshipFacade;
use crate::shared::infrastructure::database::DatabaseError;
use crate::shared::infrastructure::database::in_memory::{InMemoryConnection, InMemoryDatabase};
use crate::shared::infrastructure::event_bus::EventBus;
use crate::shared::infrastructure::event_bus::in_memory::InMemoryEventBus;
use crate::shared::infrastructure::registry::Registry;
use crate::shared::infrastructure::scoped_connection::{ScopedConnectionProvider, UnitOfWork};
use crate::shell::config::Settings;
use crate::shell::graphql::build_schema;
use crate::shell::state::AppState;
use crate::shell::transaction_scope::TransactionHooks;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("could not open the database: {0}")]
    Database(#[from] DatabaseError),
}

pub struct Application {
    pub state: AppState,
    pub database: InMemoryDatabase,
    pub connections: Arc<ScopedConnectionProvider<InMemoryDatabase>>,
    pub customer_relationship: Arc<CustomerRelationshipFacade>,
}

pub fn bootstrap(settings: &Settings) -> Result<Application, BootstrapError> {
    let database = InMemoryDatabase::connect(&settings.db_dsn, settings.db_max_connections)?;
    let connections = Arc::new(ScopedConnectionProvider::new(database.clone()));
    let transactions = Arc::new(TransactionHooks::new(
        connections.clone(),
        settings.failure_status,
    ));

    let customer_relationship = Arc::new(CustomerRelationshipFacade::new(
        settings.customer_relationship(),
    ));
    let mut event_bus = InMemoryEventBus::new();
    customer_relationship.subscribe_to(&mut event_bus);

    let payments = InMemoryPaymentProvider::new(
        settings.payments_login.clone(),
        settings.payments_password.clone(),
    );

    let registry = Arc::new(register_dependencies(
        connections.clone(),
        Arc::new(event_bus),
        Arc::new(payments),
    ));
    info!(
        database = database.name(),
        max_connections = settings.db_max_connections,
        bindings = registry.len(),
        "application wired"
    );

    let state = AppState {
        schema: build_schema(registry.clone()),
        registry,
        transactions,
    };

    Ok(Application {
        state,
        database,
        connections,
        customer_relationship,
    })
}

fn register_dependencies(
    connections: Arc<ScopedConnectionProvider<InMemoryDatabase>>,
    event_bus: Arc<dyn EventBus>,
    payments: Arc<dyn PaymentProvider>,
) -> Registry {
    let mut registry = Registry::new();

    let scoped = connections.clone();
    registry.bind_to_provider::<InMemoryConnection, _>(move |scope| Ok(scoped.current(scope)?));

    let scoped = connections.clone();
    registry.bind_to_provider::<UnitOfWork<InMemoryConnection>, _>(move |scope| {
        Ok(scoped.current_unit_of_work(scope)?)
    });

    let scoped = connections.clone();
    registry.bind_to_provider::<Arc<dyn AuctionsRepository>, _>(move |scope| {
        let unit_of_work = scoped.current_unit_of_work(scope)?;
        Ok(Arc::new(UnitOfWorkAuctionsRepository::new(unit_of_work)))
    });

    let scoped = connections.clone();
    registry.bind_to_provider::<Arc<dyn GetActiveAuctions>, _>(move |scope| {
        Ok(Arc::new(ConnectionGetActiveAuctions::new(scoped.current(scope)?)))
    });

    let scoped = connections;
    registry.bind_to_provider::<Arc<dyn GetSingleAuction>, _>(move |scope| {
        Ok(Arc::new(ConnectionGetSingleAuction::new(scoped.current(scope)?)))
    });

    registry.bind(event_bus).bind(payments);
    registry
}
