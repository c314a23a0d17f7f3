//! Kept in its own test binary: the configuration is process-global.

mod support;

use claimwise_models::prelude::*;
use claimwise_models::resources::explanation_of_benefit::Insurance;
use support::*;

#[test]
fn toggling_checks_at_runtime() {
    let wrong_target = || {
        Insurance::builder()
            .focal(true)
            .coverage(reference("Patient/pat1"))
            .build()
    };
    let bell = || minimal_eob().disposition("ring \u{0007}").build();

    assert!(wrong_target().is_err());
    assert!(bell().is_err());

    ModelConfig::set(ModelConfig {
        check_reference_types: false,
        check_control_chars: false,
    });
    assert!(wrong_target().is_ok());
    assert!(bell().is_ok());

    ModelConfig::set(ModelConfig::default());
    assert_eq!(ModelConfig::current(), ModelConfig::default());
    assert!(wrong_target().is_err());
}
