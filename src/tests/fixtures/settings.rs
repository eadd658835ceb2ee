// Shared configuration for tests. Mirrors a complete `.env_file`.

use std::collections::HashMap;

use crate::shell::config::Settings;

pub fn test_environment() -> HashMap<&'static str, String> {
    [
        ("DB_DSN", "memory://auctions"),
        ("DB_MAX_CONNECTIONS", "4"),
        ("HTTP_ADDR", "127.0.0.1:8080"),
        ("TX_FAILURE_STATUS", "400"),
        ("PAYMENTS_LOGIN", "ca-payments"),
        ("PAYMENTS_PASSWORD", "ca-payments-secret"),
        ("EMAIL_HOST", "smtp.auctions.test"),
        ("EMAIL_PORT", "2525"),
        ("EMAIL_USERNAME", "mailer"),
        ("EMAIL_PASSWORD", "mailer-secret"),
        ("EMAIL_FROM_NAME", "Auctions"),
        ("EMAIL_FROM_ADDRESS", "noreply@auctions.test"),
    ]
    .into_iter()
    .map(|(key, value)| (key, value.to_string()))
    .collect()
}

pub fn test_settings() -> Settings {
    let environment = test_environment();
    Settings::from_lookup(|key| environment.get(key).cloned()).unwrap()
}
