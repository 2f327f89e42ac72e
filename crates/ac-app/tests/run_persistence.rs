use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ac_app::{
    AppError, ExportTable, RunOptions, RunRequest, RunStage, ensure_report,
    ensure_report_with_progress, export_table, import_series_csv, list_reports, list_series,
    load_report,
};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

const PROJECT: &str = r#"
version: 1
name: Ozone benchmark
comparisons:
  - id: o3
    variable: SpeciesConc_O3
    reference: ref
    participants: [ref, dev]
    options:
      show_difference: true
      histogram_bins: 4
  - id: o3_missing
    variable: SpeciesConc_O3
    participants: [ref, absent]
"#;

fn setup(prefix: &str) -> PathBuf {
    let project_dir = unique_temp_dir(prefix);
    fs::create_dir_all(&project_dir).expect("failed to create temp project dir");
    let project_path = project_dir.join("project.yaml");
    fs::write(&project_path, PROJECT).expect("failed to write project file");

    import_series_csv(
        &project_path,
        "ref",
        "SpeciesConc_O3",
        "ppbv",
        "time,value\n2019-01,30\n2019-02,32\n2019-03,\n2019-04,35\n",
    )
    .expect("failed to import reference");
    import_series_csv(
        &project_path,
        "dev",
        "SpeciesConc_O3",
        "ppmv",
        "time,value\n2019-01,0.031\n2019-02,0.033\n2019-03,0.034\n2019-04,0.036\n",
    )
    .expect("failed to import dev");

    project_path
}

#[tokio::test]
async fn second_run_loads_cached_report() {
    let project_path = setup("ac_app_cache");
    assert_eq!(list_series(&project_path).unwrap().len(), 2);

    let request = RunRequest {
        project_path: &project_path,
        comparison_id: "o3",
        options: RunOptions::default(),
    };

    let mut stages = Vec::new();
    let mut record = |e: ac_app::RunProgressEvent| stages.push(e.stage);
    let first = ensure_report_with_progress(&request, Some(&mut record))
        .await
        .expect("first run failed");
    assert!(!first.loaded_from_cache);
    assert_eq!(stages.first(), Some(&RunStage::LoadingProject));
    assert_eq!(stages.last(), Some(&RunStage::Completed));

    let report = &first.report;
    assert_eq!(report.unit, "ppbv");
    let dev = report.pairwise_for(&"dev".into()).unwrap();
    assert_eq!(dev.valid_pairs, 3);
    assert!((dev.mbe - 1.0).abs() < 1e-9);

    let second = ensure_report(&request).await.expect("second run failed");
    assert!(second.loaded_from_cache);
    assert_eq!(second.report_id, first.report_id);
    assert_eq!(second.report.participants, first.report.participants);

    let uncached = ensure_report(&RunRequest {
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
        ..request
    })
    .await
    .unwrap();
    assert!(!uncached.loaded_from_cache);

    let manifests = list_reports(&project_path, Some("o3")).unwrap();
    assert_eq!(manifests.len(), 1);
    assert_eq!(manifests[0].participants, vec!["ref", "dev"]);

    let (manifest, loaded) = load_report(&project_path, &first.report_id).unwrap();
    assert_eq!(manifest.comparison_id, "o3");

    let csv = export_table(&loaded, ExportTable::Differences, ',');
    let march = csv.lines().find(|l| l.starts_with("dev,2019-03")).unwrap();
    assert_eq!(march, "dev,2019-03,N/A,absolute");
}

#[tokio::test]
async fn missing_series_is_a_resolution_error() {
    let project_path = setup("ac_app_missing");
    let request = RunRequest {
        project_path: &project_path,
        comparison_id: "o3_missing",
        options: RunOptions::default(),
    };
    match ensure_report(&request).await {
        Err(AppError::Resolution { simulation_id, .. }) => assert_eq!(simulation_id, "absent"),
        other => panic!("expected resolution error, got {other:?}"),
    }
    assert!(list_reports(&project_path, None).unwrap().is_empty());
}

#[tokio::test]
async fn unknown_comparison() {
    let project_path = setup("ac_app_unknown");
    let request = RunRequest {
        project_path: &project_path,
        comparison_id: "nope",
        options: RunOptions::default(),
    };
    assert!(matches!(
        ensure_report(&request).await,
        Err(AppError::ComparisonNotFound(_))
    ));
}

#[tokio::test]
async fn reimported_series_invalidates_cached_report() {
    let project_path = setup("ac_app_reimport");
    let request = RunRequest {
        project_path: &project_path,
        comparison_id: "o3",
        options: RunOptions::default(),
    };

    let first = ensure_report(&request).await.expect("first run failed");
    let dev = first.report.simulation(&"dev".into()).unwrap();
    assert!((dev.summary.mean - 33.5).abs() < 1e-9);

    import_series_csv(
        &project_path,
        "dev",
        "SpeciesConc_O3",
        "ppbv",
        "time,value\n2019-01,10\n2019-02,20\n2019-03,30\n2019-04,40\n",
    )
    .expect("failed to re-import dev");

    let second = ensure_report(&request).await.expect("second run failed");
    assert!(!second.loaded_from_cache);
    assert_ne!(second.report_id, first.report_id);
    let dev = second.report.simulation(&"dev".into()).unwrap();
    assert!((dev.summary.mean - 25.0).abs() < 1e-9);

    let third = ensure_report(&request).await.expect("third run failed");
    assert!(third.loaded_from_cache);
    assert_eq!(third.report_id, second.report_id);
}
