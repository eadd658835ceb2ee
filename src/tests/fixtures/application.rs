// A fully wired application over a fresh in memory database.

use rstest::fixture;

use crate::shell::bootstrap::{Application, bootstrap};
use crate::tests::fixtures::settings::test_settings;

pub type TestApplication = Application;

#[fixture]
pub fn test_application() -> TestApplication {
    bootstrap(&test_settings()).unwrap()
}
