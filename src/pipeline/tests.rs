use std::cell::RefCell;
use std::rc::Rc;

use super::*;

/// Test stage that records its execution and returns a canned result
struct ScriptedStage {
    kind: StageKind,
    succeed: bool,
    error: Option<&'static str>,
    ran: Rc<RefCell<Vec<StageKind>>>,
}

impl Stage for ScriptedStage {
    fn kind(&self) -> StageKind {
        self.kind
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<StageOutcome, StageError> {
        self.ran.borrow_mut().push(self.kind);
        ctx.log.info(format!("running {}", self.kind));
        if let Some(message) = self.error {
            return Err(StageError::Failed(message.to_string()));
        }
        if self.succeed {
            Ok(StageOutcome::succeeded(Some(1)))
        } else {
            Ok(StageOutcome::failed(Some(1), vec!["it broke".to_string()]))
        }
    }
}

fn scripted(
    plan: &[(StageKind, bool)],
    ran: &Rc<RefCell<Vec<StageKind>>>,
) -> Vec<Box<dyn Stage>> {
    plan.iter()
        .map(|&(kind, succeed)| {
            Box::new(ScriptedStage {
                kind,
                succeed,
                error: None,
                ran: Rc::clone(ran),
            }) as Box<dyn Stage>
        })
        .collect()
}

fn temp_config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: root.join("data"),
        output_dir: root.join("out"),
        log_dir: root.join("logs"),
        ..Default::default()
    }
}

#[test]
fn test_fail_fast_stops_at_second_of_four() {
    let dir = tempfile::tempdir().unwrap();
    let ran = Rc::new(RefCell::new(Vec::new()));
    let stages = scripted(
        &[
            (StageKind::Extract, true),
            (StageKind::CoverageCheck, false),
            (StageKind::Convert, true),
            (StageKind::Validate, true),
        ],
        &ran,
    );

    let config = temp_config(dir.path());
    let report = Orchestrator::new(config.clone(), stages)
        .with_timestamp("20240501_100000")
        .run()
        .unwrap();

    assert!(!report.success);
    assert_eq!(report.steps.len(), 2);
    assert_eq!(*ran.borrow(), vec![StageKind::Extract, StageKind::CoverageCheck]);
    assert!(report.stage(StageKind::Extract).unwrap().success);
    let failed = report.stage(StageKind::CoverageCheck).unwrap();
    assert!(!failed.success);
    assert_eq!(failed.issues, vec!["it broke"]);
    assert_eq!(report.failed_stage(), Some("2_coverage_check"));

    let saved = RunReport::from_file(&config.log_dir.join("results_20240501_100000.json")).unwrap();
    assert_eq!(saved, report);

    assert!(config.log_dir.join("orchestrate_20240501_100000.log").is_file());
    assert!(config.log_dir.join("step1_extract_20240501_100000.log").is_file());
    assert!(config.log_dir.join("step2_coverage_check_20240501_100000.log").is_file());
    assert!(!config.log_dir.join("step3_convert_20240501_100000.log").exists());
}

#[test]
fn test_disabled_stages_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let ran = Rc::new(RefCell::new(Vec::new()));
    let stages = scripted(
        &[
            (StageKind::Extract, true),
            (StageKind::CoverageCheck, false),
            (StageKind::Convert, true),
            (StageKind::Export, false),
        ],
        &ran,
    );

    let config = PipelineConfig {
        check_extraction: false,
        export_csv: false,
        ..temp_config(dir.path())
    };
    let report = Orchestrator::new(config, stages).run().unwrap();

    assert!(report.success);
    assert_eq!(*ran.borrow(), vec![StageKind::Extract, StageKind::Convert]);
    let keys: Vec<_> = report.steps.keys().cloned().collect();
    assert_eq!(keys, vec!["1_extract", "3_convert"]);
}

#[test]
fn test_stage_error_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let ran = Rc::new(RefCell::new(Vec::new()));
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(ScriptedStage {
            kind: StageKind::Extract,
            succeed: true,
            error: Some("decoder crashed"),
            ran: Rc::clone(&ran),
        }),
        Box::new(ScriptedStage {
            kind: StageKind::Convert,
            succeed: true,
            error: None,
            ran: Rc::clone(&ran),
        }),
    ];

    let config = temp_config(dir.path());
    let orchestrator = Orchestrator::new(config.clone(), stages).with_timestamp("t1");
    let report = orchestrator.run().unwrap();

    assert!(!report.success);
    assert_eq!(ran.borrow().len(), 1);
    let record = report.stage(StageKind::Extract).unwrap();
    assert_eq!(record.issues, vec!["decoder crashed"]);
    assert_eq!(record.files, None);

    let stage_log = std::fs::read_to_string(config.log_dir.join("step1_extract_t1.log")).unwrap();
    assert!(stage_log.contains("[ERROR] decoder crashed"));
}

#[test]
fn test_files_processed_lists_selected_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());
    std::fs::create_dir_all(&config.data_dir).unwrap();
    for name in ["b.zip", "a.zip", "readme.md"] {
        std::fs::write(config.data_dir.join(name), "").unwrap();
    }

    let ran = Rc::new(RefCell::new(Vec::new()));
    let stages = scripted(&[(StageKind::Extract, true)], &ran);
    let report = Orchestrator::new(config, stages).run().unwrap();

    assert_eq!(report.files_processed, vec!["a.zip", "b.zip"]);
}

#[test]
fn test_clean_removes_previous_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        clean: true,
        ..temp_config(dir.path())
    };
    std::fs::create_dir_all(config.output_dir.join("old")).unwrap();
    std::fs::create_dir_all(&config.log_dir).unwrap();
    std::fs::write(config.log_dir.join("results_old.json"), "{}").unwrap();

    let ran = Rc::new(RefCell::new(Vec::new()));
    let report = Orchestrator::new(config.clone(), scripted(&[(StageKind::Extract, true)], &ran))
        .with_timestamp("t2")
        .run()
        .unwrap();

    assert!(report.success);
    assert!(!config.output_dir.join("old").exists());
    assert!(!config.log_dir.join("results_old.json").exists());
    assert!(config.log_dir.join("results_t2.json").is_file());
}

#[test]
fn test_clean_refuses_root() {
    assert!(matches!(
        ensure_cleanable(Path::new("/")),
        Err(PipelineError::UnsafeClean(_))
    ));
    assert!(ensure_cleanable(Path::new(".")).is_err());
    assert!(ensure_cleanable(Path::new("")).is_err());
    assert!(ensure_cleanable(Path::new("output/logs")).is_ok());
}

#[test]
fn test_stage_kind_names() {
    let keys: Vec<_> = StageKind::ALL.iter().map(|k| k.report_key()).collect();
    assert_eq!(
        keys,
        vec![
            "1_extract",
            "2_coverage_check",
            "3_convert",
            "4_validate",
            "5_end_to_end",
            "6_export",
        ]
    );
    assert_eq!(StageKind::Validate.log_file_name("ts"), "step4_validate_ts.log");
    assert!(!StageKind::Extract.is_optional());
    assert!(StageKind::Export.is_optional());
}
