use ac_core::SimulationId;
use ac_project::schema::*;
use ac_project::{load_json, load_project, load_yaml, save_json, save_yaml, validate_project};
use ac_stats::{AgreementThresholds, DifferenceMode, TrendConfig};

fn ozone_project() -> ComparisonProject {
    let mut project = ComparisonProject::new("Ozone benchmark");
    project.comparisons.push(ComparisonDef {
        id: "o3_surface".to_string(),
        variable: "SpeciesConc_O3".to_string(),
        region: Some("global".to_string()),
        level: Some(0),
        time: None,
        reference: Some(SimulationId::new("GCC-14.0")),
        participants: vec![SimulationId::new("GCC-14.0"), SimulationId::new("GCC-14.1")],
        options: ComparisonOptionsDef {
            normalize: true,
            show_difference: true,
            difference_mode: Some(DifferenceMode::Standardized),
            histogram_bins: 20,
            taylor: true,
            trend: Some(TrendConfig::default()),
            agreement: Some(AgreementThresholds::default()),
        },
    });
    project
}

#[test]
fn roundtrip_yaml_empty_project() {
    let project = ComparisonProject::new("Empty Project");

    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("ac_project_roundtrip_empty.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_yaml_comparison() {
    let project = ozone_project();

    let path = std::env::temp_dir().join("ac_project_roundtrip_ozone.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_project(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_comparison() {
    let project = ozone_project();

    let path = std::env::temp_dir().join("ac_project_roundtrip_ozone.json");
    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(project, loaded);

    let by_extension = load_project(&path).unwrap();
    assert_eq!(project, by_extension);
}

#[test]
fn save_rejects_invalid_project() {
    let mut project = ozone_project();
    project.comparisons[0].options.histogram_bins = 1;

    let path = std::env::temp_dir().join("ac_project_invalid.yaml");
    assert!(save_yaml(&path, &project).is_err());
}
