use ac_core::SimulationId;
use ac_project::schema::*;
use ac_project::{ValidationError, validate_project};
use ac_stats::{AgreementThresholds, TrendConfig};

fn comparison(id: &str, participants: &[&str], reference: Option<&str>) -> ComparisonDef {
    ComparisonDef {
        id: id.to_string(),
        variable: "SpeciesConc_CO".to_string(),
        region: None,
        level: None,
        time: None,
        reference: reference.map(SimulationId::new),
        participants: participants.iter().map(|p| SimulationId::new(*p)).collect(),
        options: ComparisonOptionsDef::default(),
    }
}

fn project_with(defs: Vec<ComparisonDef>) -> ComparisonProject {
    let mut project = ComparisonProject::new("CO");
    project.comparisons = defs;
    project
}

#[test]
fn valid_project_passes() {
    let project = project_with(vec![
        comparison("a", &["ref", "dev"], Some("ref")),
        comparison("b", &["dev"], None),
    ]);
    validate_project(&project).expect("project should validate");
}

#[test]
fn unsupported_version() {
    let mut project = project_with(vec![]);
    project.version = 2;
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::UnsupportedVersion { version: 2 })
    ));
}

#[test]
fn duplicate_comparison_id() {
    let project = project_with(vec![
        comparison("a", &["ref"], None),
        comparison("a", &["dev"], None),
    ]);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn empty_comparison_id() {
    let project = project_with(vec![comparison(" ", &["ref"], None)]);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn empty_participants() {
    let project = project_with(vec![comparison("a", &[], None)]);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn duplicate_participant() {
    let project = project_with(vec![comparison("a", &["ref", "ref"], None)]);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn reference_must_participate() {
    let project = project_with(vec![comparison("a", &["dev"], Some("ref"))]);
    match validate_project(&project) {
        Err(ValidationError::MissingReference { id, .. }) => assert_eq!(id, "ref"),
        other => panic!("expected MissingReference, got {other:?}"),
    }
}

#[test]
fn too_few_bins() {
    let mut def = comparison("a", &["ref"], None);
    def.options.histogram_bins = 1;
    assert!(validate_project(&project_with(vec![def])).is_err());
}

#[test]
fn zero_half_window() {
    let mut def = comparison("a", &["ref"], None);
    def.options.trend = Some(TrendConfig {
        half_window: 0,
        ..TrendConfig::default()
    });
    assert!(validate_project(&project_with(vec![def])).is_err());
}

#[test]
fn non_positive_agreement_threshold() {
    let mut def = comparison("a", &["ref", "dev"], Some("ref"));
    def.options.agreement = Some(AgreementThresholds {
        rmse: 0.0,
        ..AgreementThresholds::default()
    });
    assert!(validate_project(&project_with(vec![def])).is_err());
}

#[test]
fn differencing_needs_reference() {
    let mut def = comparison("a", &["ref", "dev"], None);
    def.options.show_difference = true;
    match validate_project(&project_with(vec![def.clone()])) {
        Err(ValidationError::InvalidValue { field, reason, .. }) => {
            assert_eq!(field, "comparison 'a' reference");
            assert!(reason.contains("show_difference"));
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }

    def.options.show_difference = false;
    def.options.agreement = Some(AgreementThresholds::default());
    assert!(validate_project(&project_with(vec![def.clone()])).is_err());

    def.reference = Some(SimulationId::new("ref"));
    validate_project(&project_with(vec![def])).expect("reference makes it valid");
}
