use std::fs;
use std::path::PathBuf;

use tempfile::{tempdir, TempDir};
use tweak_core::{parse_specs_json, ParamId, ParamSpec};
use tweak_io::tracing_setup::init_tracing_tests;
use tweak_io::{
    EventOrigin, ParamState, RewriteError, RewriterConfig, RewriterHandle,
};

fn project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    let root = fs::canonicalize(dir.path()).unwrap();
    (dir, root)
}

#[tokio::test]
async fn apply_reset_and_read_values_through_handle() {
    init_tracing_tests(tracing::Level::DEBUG);
    let content = ":root {\n  --gap: 1.5rem;\n  --radius: 4px; --shadow: .25;\n}\n";
    let (_dir, root) = project(&[("theme.css", content)]);

    let json = r#"[
        {"id": "gap", "filePath": "theme.css", "line": 2, "column": 10,
         "originalText": "1.5rem", "min": 0, "max": 4, "step": 0.25, "unit": "rem"},
        {"id": "radius", "filePath": "theme.css", "line": 3, "column": 13,
         "originalText": "4px", "min": 0, "max": 32, "unit": "px"},
        {"id": "shadow", "filePath": "theme.css", "line": 3, "column": 28,
         "originalText": ".25", "min": 0, "max": 1, "step": 0.05}
    ]"#;
    let handle = RewriterHandle::builder()
        .with_project_root(&root)
        .with_params(parse_specs_json(json).unwrap())
        .build()
        .unwrap();

    let change = handle.apply_change("gap", 2.3).await.unwrap();
    assert_eq!(change.text, "2.30rem");

    let change = handle.apply_change("radius", 12.0).await.unwrap();
    assert_eq!(change.shifted, vec![ParamId::from("shadow")]);

    let change = handle.apply_change("shadow", 0.5).await.unwrap();
    assert_eq!(change.text, ".50");
    assert_eq!(change.drift, 0);

    assert_eq!(
        fs::read_to_string(root.join("theme.css")).unwrap(),
        ":root {\n  --gap: 2.30rem;\n  --radius: 12px; --shadow: .50;\n}\n"
    );

    let values = handle.current_values().await.unwrap();
    assert_eq!(values[&ParamId::from("gap")], 2.3);
    assert_eq!(values[&ParamId::from("radius")], 12.0);
    assert_eq!(values[&ParamId::from("shadow")], 0.5);

    let outcomes = handle.reset_all().await.unwrap();
    assert!(outcomes.values().all(Result::is_ok));
    assert_eq!(
        fs::read_to_string(root.join("theme.css")).unwrap(),
        ":root {\n  --gap: 1.50rem;\n  --radius: 4px; --shadow: .25;\n}\n"
    );

    handle.shutdown().await;
}

#[tokio::test]
async fn events_are_broadcast_for_applies_and_resets() {
    let content = "duration: 300ms;\n";
    let (_dir, root) = project(&[("anim.css", content)]);
    let handle = RewriterHandle::builder()
        .with_config(RewriterConfig {
            project_root: Some(root.clone()),
            event_capacity: 8,
            ..Default::default()
        })
        .with_params([ParamSpec::new(
            "dur",
            root.join("anim.css"),
            1,
            11,
            "300ms",
            0.0,
            2000.0,
        )])
        .build()
        .unwrap();
    let mut events = handle.subscribe();

    handle.apply_change("dur", 450.0).await.unwrap();
    handle.reset_param("dur").await.unwrap();
    fs::write(root.join("anim.css"), "duration: fast;\n").unwrap();
    assert!(handle.apply_change("dur", 100.0).await.is_err());

    let first = events.recv().await.unwrap();
    assert_eq!(first.origin, EventOrigin::Apply);
    assert_eq!(first.outcome.unwrap().text, "450ms");

    let second = events.recv().await.unwrap();
    assert_eq!(second.origin, EventOrigin::Reset);
    assert!(second.is_ok());

    let third = events.recv().await.unwrap();
    assert!(matches!(
        third.outcome,
        Err(RewriteError::VerificationFailed { .. })
    ));

    let status = handle.status("dur").await.unwrap().unwrap();
    assert_eq!(status.state, ParamState::Disabled);
    assert!(status.last_error.unwrap().contains("300ms"));

    handle.shutdown().await;
}

#[tokio::test]
async fn reset_all_publishes_one_event_per_parameter() {
    let content = "a = 1\nb = 2\n";
    let (_dir, root) = project(&[("vals.ini", content), ("gone.ini", "c = 3\n")]);
    let handle = RewriterHandle::builder()
        .with_project_root(&root)
        .with_params([
            ParamSpec::new("a", root.join("vals.ini"), 1, 5, "1", 0.0, 9.0),
            ParamSpec::new("b", root.join("vals.ini"), 2, 5, "2", 0.0, 9.0),
            ParamSpec::new("c", root.join("gone.ini"), 1, 5, "3", 0.0, 9.0),
        ])
        .build()
        .unwrap();
    let mut events = handle.subscribe();

    handle.apply_change("a", 7.0).await.unwrap();
    fs::remove_file(root.join("gone.ini")).unwrap();
    let outcomes = handle.reset_all().await.unwrap();
    assert!(matches!(outcomes[&ParamId::from("a")], Ok(v) if v == 1.0));
    assert!(matches!(
        outcomes[&ParamId::from("c")],
        Err(RewriteError::FileRead { .. })
    ));

    assert_eq!(events.recv().await.unwrap().origin, EventOrigin::Apply);
    let mut resets = Vec::new();
    for _ in 0..3 {
        let event = events.recv().await.unwrap();
        assert_eq!(event.origin, EventOrigin::Reset);
        resets.push((event.id.to_string(), event.is_ok()));
    }
    assert_eq!(
        resets,
        vec![
            ("a".to_string(), true),
            ("b".to_string(), true),
            ("c".to_string(), false),
        ]
    );

    handle.shutdown().await;
}

#[tokio::test]
async fn concurrent_applies_on_one_line_stay_consistent() {
    let content = "grid: 1 2 3 4;\n";
    let (_dir, root) = project(&[("grid.txt", content)]);
    let path = root.join("grid.txt");
    let specs = (0..4).map(|i| {
        ParamSpec::new(
            format!("c{i}"),
            &path,
            1,
            7 + 2 * i,
            (i + 1).to_string(),
            0.0,
            10_000.0,
        )
    });
    let handle = RewriterHandle::builder()
        .with_project_root(&root)
        .with_params(specs)
        .build()
        .unwrap();

    let tasks = (0..4).map(|i| {
        let handle = handle.clone();
        tokio::spawn(async move { handle.apply_change(format!("c{i}"), 1000.0 * (i + 1) as f64).await })
    });
    for task in futures::future::join_all(tasks).await {
        task.unwrap().unwrap();
    }

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "grid: 1000 2000 3000 4000;\n"
    );
    let statuses = handle.statuses().await.unwrap();
    assert!(statuses.values().all(|s| s.state == ParamState::Clean));

    handle.shutdown().await;
}

#[tokio::test]
async fn unknown_and_outside_parameters_are_reported() {
    let (_dir, root) = project(&[]);
    let outside = tempdir().unwrap();
    let outside_file = outside.path().join("x.js");
    fs::write(&outside_file, "let x = 1;\n").unwrap();

    let handle = RewriterHandle::builder()
        .with_project_root(&root)
        .with_params([ParamSpec::new("x", &outside_file, 1, 9, "1", 0.0, 5.0)])
        .build()
        .unwrap();

    assert!(matches!(
        handle.apply_change("missing", 1.0).await,
        Err(RewriteError::UnknownParam { .. })
    ));
    assert!(matches!(
        handle.reset_param("x").await,
        Err(RewriteError::OutsideProjectRoot { .. })
    ));
    assert_eq!(fs::read_to_string(&outside_file).unwrap(), "let x = 1;\n");

    handle.shutdown().await;
}

#[tokio::test]
async fn requests_after_shutdown_fail_with_channel_error() {
    let (_dir, root) = project(&[("a.txt", "v = 1\n")]);
    let handle = RewriterHandle::builder()
        .with_project_root(&root)
        .with_params([ParamSpec::new("v", root.join("a.txt"), 1, 5, "1", 0.0, 9.0)])
        .build()
        .unwrap();

    handle.shutdown().await;
    // the actor may take a moment to drop its receiver
    let mut result = handle.apply_change("v", 2.0).await;
    for _ in 0..50 {
        if matches!(result, Err(RewriteError::Channel(_))) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        result = handle.apply_change("v", 2.0).await;
    }
    assert!(matches!(result, Err(RewriteError::Channel(_))));
}

#[test]
fn blocking_facade_works_without_a_runtime() {
    let (_dir, root) = project(&[("b.txt", "level = 0.5\n")]);
    let handle = RewriterHandle::builder()
        .with_project_root(&root)
        .with_params([ParamSpec::new("lvl", "b.txt", 1, 9, "0.5", 0.0, 1.0)])
        .build()
        .unwrap();
    let blocking = handle.blocking();

    let change = blocking.apply_change("lvl", 0.9).unwrap();
    assert_eq!(change.text, "0.9");
    assert_eq!(blocking.reset_param("lvl").unwrap(), 0.5);
    assert_eq!(
        blocking.current_values().unwrap()[&ParamId::from("lvl")],
        0.5
    );
    assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "level = 0.5\n");
    blocking.shutdown();
}

#[test]
fn invalid_discovery_input_fails_to_build() {
    let err = RewriterHandle::builder()
        .with_params([ParamSpec::new("bad", "/tmp/x.css", 0, 1, "1", 0.0, 1.0)])
        .build()
        .unwrap_err();
    assert!(matches!(err, tweak_io::BuildError::Spec(_)));
}
