// PaymentProvider that records charges instead of calling a gateway.
//
// Purpose
// - Stand in for the card payments gateway in development and tests.

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::modules::auctions::application::ports::{ChargeId, PaymentError, PaymentProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charge {
    pub id: ChargeId,
    pub customer_id: String,
    pub amount: i64,
}

pub struct InMemoryPaymentProvider {
    login: String,
    password: String,
    pub charges: Mutex<Vec<Charge>>,
}

impl InMemoryPaymentProvider {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            charges: Mutex::new(Vec::new()),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }
}

#[async_trait]
impl PaymentProvider for InMemoryPaymentProvider {
    async fn charge(&self, customer_id: &str, amount: i64) -> Result<ChargeId, PaymentError> {
        if amount <= 0 {
            return Err(PaymentError::InvalidAmount(amount));
        }
        if self.password.is_empty() {
            return Err(PaymentError::Declined(format!(
                "no credentials for {}",
                self.login
            )));
        }
        let charge = Charge {
            id: ChargeId(Uuid::now_v7().to_string()),
            customer_id: customer_id.to_string(),
            amount,
        };
        let id = charge.id.clone();
        self.charges.lock().await.push(charge);
        Ok(id)
    }
}
