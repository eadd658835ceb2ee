use std::sync::Arc;

use crate::shared::infrastructure::database::in_memory::InMemoryDatabase;
use crate::shared::infrastructure::registry::Registry;
use crate::shell::graphql::AppSchema;
use crate::shell::transaction_scope::TransactionHooks;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub transactions: Arc<TransactionHooks<InMemoryDatabase>>,
    pub schema: AppSchema,
}
