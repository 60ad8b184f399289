use polycut::*;
use std::fs;

const CUTTING_JOB: &str = r#"{
    "operation": {
        "cutting": {
            "shape_name": "square",
            "dim_x": 100.0,
            "dim_y": 100.0,
            "speed": 600.0,
            "machine": "PolyShaperOranje"
        }
    },
    "paths": [ "M10 10 L20 10 L20 20 Z" ]
}"#;

#[test]
fn test_run_cutting_job() {
    let job: Job = serde_json::from_str(CUTTING_JOB).unwrap();

    let output = run_job(&job).unwrap();

    let JobOutput::Cutting(cutting) = &output else {
        panic!("Expected cutting output");
    };
    assert_eq!(
        cutting.toolpath.as_deref(),
        Some(&[(0.0, 0.0), (10.0, 10.0), (20.0, 10.0), (20.0, 20.0), (10.0, 10.0), (0.0, 0.0)][..])
    );
    let gcode = output.gcode().unwrap();
    assert_eq!(gcode.lines.len(), 6 + 3);
    assert_eq!(gcode.lines[1], "G01 F600.000");
    assert_eq!(gcode.lines[3], "G01 X10.000 Y10.000");
}

#[test]
fn test_run_engraving_job() {
    let job = Job {
        operation: Operation::Engraving(EngravingSettings {
            discretization_step: None,
            ..EngravingSettings::default()
        }),
        paths: vec![
            JobPath::Polyline(vec![(0.0, 0.0), (0.0, 10.0)]),
            JobPath::PathData("M20 0 L30 0".to_string()),
        ],
    };

    let output = run_job(&job).unwrap();

    let JobOutput::Engraving(engraving) = &output else {
        panic!("Expected engraving output");
    };
    assert_eq!(engraving.toolpath.paths.len(), 2);
    let gcode = output.gcode().unwrap();
    assert_eq!(gcode.lines.first().map(String::as_str), Some("M3"));
    assert_eq!(gcode.lines.last().map(String::as_str), Some("M5"));
    // Along +X the blade is turned by 90 degrees
    assert!(gcode.lines.contains(&"G00 X20.000 Y0.000 E5.000".to_string()));
}

#[test]
fn test_workpiece_too_large_for_machine() {
    let job = Job {
        operation: Operation::Cutting(CuttingSettings {
            dim_x: 600.0,
            machine: Machine::PolyShaperOranje,
            ..CuttingSettings::default()
        }),
        paths: vec![],
    };

    let err = run_job(&job).unwrap_err();

    let err = err.downcast_ref::<PolycutError>().unwrap();
    assert!(matches!(
        err,
        PolycutError::WorkpieceTooLarge {
            max_width,
            ..
        } if *max_width == 500.0
    ));
}

#[test]
fn test_invalid_path_data() {
    let job = Job {
        operation: Operation::Cutting(CuttingSettings::default()),
        paths: vec![JobPath::PathData("M10 10 X 5".to_string())],
    };
    assert!(run_job(&job).is_err());
}

#[test]
fn test_cutting_outputs_are_numbered() {
    let dir = tempfile::tempdir().unwrap();
    let job: Job = serde_json::from_str(CUTTING_JOB).unwrap();
    let job_path = dir.path().join("job.json");
    job.save_to_path(&job_path).unwrap();

    let job = Job::load_from_path(&job_path).unwrap();
    let Operation::Cutting(settings) = &job.operation else {
        panic!("Expected cutting operation");
    };

    for expected in ["square-000", "square-001"] {
        let JobOutput::Cutting(output) = run_job(&job).unwrap() else {
            panic!("Expected cutting output");
        };
        let toolpath = output.toolpath.unwrap();
        let metainfo =
            write_cutting_outputs(dir.path(), &toolpath, &output.gcode.unwrap(), settings).unwrap();
        assert_eq!(metainfo.gcode_filename, format!("{expected}.gcode"));
        assert!(metainfo.points_inside_workpiece);
    }

    assert!(fs::read_to_string(dir.path().join("square-000.gcode"))
        .unwrap()
        .starts_with("M3\nG01 F600.000\n"));
}

#[test]
fn test_metainfo_lists_written_files() {
    let dir = tempfile::tempdir().unwrap();
    let job: Job = serde_json::from_str(CUTTING_JOB).unwrap();
    let Operation::Cutting(settings) = &job.operation else {
        panic!("Expected cutting operation");
    };
    let JobOutput::Cutting(output) = run_job(&job).unwrap() else {
        panic!("Expected cutting output");
    };

    write_cutting_outputs(
        dir.path(),
        &output.toolpath.unwrap(),
        &output.gcode.unwrap(),
        settings,
    )
    .unwrap();

    let record = fs::read_to_string(dir.path().join("square-000.psj")).unwrap();
    let metainfo: MetaInfo = serde_json::from_str(&record).unwrap();
    assert_eq!(metainfo.name, "square");
    assert_eq!(metainfo.machine_type, "PolyShaperOranje");
    for name in [&metainfo.gcode_filename, &metainfo.svg_filename] {
        assert!(dir.path().join(name).is_file(), "{name} should exist");
    }

    let svg = fs::read_to_string(dir.path().join(&metainfo.svg_filename)).unwrap();
    assert!(svg.contains("10.000,10.000 20.000,10.000 20.000,20.000"));
}
