use jobgraph_core::{Error, JobSnapshot, JobStatus, StatusCounts};

#[test]
fn snapshot_decodes_the_listing_object() {
    let text = r##"{
        "jobs": [
            {"job_id": 101, "status": "COMPLETED", "command": "python prep.py", "preamble": "#!/bin/bash",
             "group_name": "prep", "depends_on": [], "inactive_deps": []},
            {"job_id": 102, "status": "RUNNING", "command": "python train.py", "group_name": "train",
             "depends_on": ["101"], "stats": {"gpu_memory_used_mb": 1024, "gpu_memory_total_mb": 4096, "gpu_count": 2}}
        ],
        "stats": {"completed": 1, "running": 1, "pending": 0, "blocked": 0, "cancelled": 0,
                  "timeout": 0, "failed": 0, "total": 2},
        "count": 2
    }"##;

    let snapshot = JobSnapshot::from_json_str(text).unwrap();
    assert_eq!(snapshot.count, 2);
    assert_eq!(snapshot.stats.total, 2);
    assert_eq!(snapshot.jobs[0].id, 101);
    assert_eq!(snapshot.jobs[1].status, JobStatus::Running);
    assert_eq!(snapshot.jobs[1].depends_on, vec!["101".to_string()]);
    let stats = snapshot.jobs[1].stats.as_ref().unwrap();
    assert_eq!(stats.gpu_count, Some(2));
    assert_eq!(stats.gpu_memory_percent(), Some(25.0));
    assert!(snapshot.jobs[0].stats.is_none());
}

#[test]
fn snapshot_decodes_a_bare_array_and_derives_stats() {
    let text = r#"[
        {"job_id": 1, "status": "FAILED", "depends_on": []},
        {"job_id": 2, "status": "PENDING", "depends_on": ["1"]},
        {"job_id": 3, "status": "pending", "depends_on": ["1"]}
    ]"#;

    let snapshot = JobSnapshot::from_json_str(text).unwrap();
    assert_eq!(snapshot.count, 3);
    assert_eq!(
        snapshot.stats,
        StatusCounts {
            failed: 1,
            pending: 2,
            total: 3,
            ..Default::default()
        }
    );
}

#[test]
fn snapshot_tolerates_unknown_statuses_and_missing_fields() {
    let text = r#"{"jobs": [
        {"job_id": 7, "status": "PREEMPTED"},
        {"job_id": 8},
        {"job_id": 9, "status": null, "group_name": null, "depends_on": null}
    ]}"#;

    let snapshot = JobSnapshot::from_json_str(text).unwrap();
    assert_eq!(
        snapshot.jobs[0].status,
        JobStatus::Unknown("PREEMPTED".to_string())
    );
    assert_eq!(snapshot.jobs[1].status.as_str(), "UNKNOWN");
    assert!(snapshot.jobs[2].depends_on.is_empty());
    assert_eq!(snapshot.jobs[2].group_name, "");
    assert_eq!(snapshot.stats.unknown, 3);
}

#[test]
fn snapshot_accepts_numeric_and_string_ids() {
    let text = r#"[
        {"job_id": "41", "depends_on": [40, "39", " "]},
        {"id": 42, "dependsOn": ["41"], "groupName": "eval"}
    ]"#;

    let snapshot = JobSnapshot::from_json_str(text).unwrap();
    assert_eq!(snapshot.jobs[0].id, 41);
    assert_eq!(
        snapshot.jobs[0].depends_on,
        vec!["40".to_string(), "39".to_string()]
    );
    assert_eq!(snapshot.jobs[1].id, 42);
    assert_eq!(snapshot.jobs[1].group_name, "eval");
}

#[test]
fn snapshot_unwraps_the_web_server_envelope() {
    let inner = r#"{"jobs": [{"job_id": 5, "status": "RUNNING"}]}"#;
    let envelope = serde_json::json!({
        "success": true,
        "stdout": inner,
        "stderr": "",
        "returncode": 0,
    });

    let snapshot = JobSnapshot::from_value(envelope).unwrap();
    assert_eq!(snapshot.jobs.len(), 1);
    assert_eq!(snapshot.stats.running, 1);
}

#[test]
fn snapshot_reports_a_failed_envelope() {
    let envelope = serde_json::json!({
        "success": false,
        "stdout": "",
        "stderr": "jrun: database locked\n",
        "returncode": 1,
    });

    let err = JobSnapshot::from_value(envelope).unwrap_err();
    assert!(matches!(err, Error::InvalidSnapshot { .. }));
    assert_eq!(err.to_string(), "Invalid job snapshot: jrun: database locked");
}

#[test]
fn snapshot_rejects_payloads_without_jobs() {
    assert!(matches!(
        JobSnapshot::from_json_str(r#"{"count": 0}"#),
        Err(Error::InvalidSnapshot { .. })
    ));
    assert!(matches!(
        JobSnapshot::from_json_str("42"),
        Err(Error::InvalidSnapshot { .. })
    ));
    assert!(matches!(
        JobSnapshot::from_json_str("{not json"),
        Err(Error::Json(_))
    ));
}

#[test]
fn snapshot_rejects_non_numeric_job_ids() {
    assert!(matches!(
        JobSnapshot::from_json_str(r#"[{"job_id": "abc"}]"#),
        Err(Error::Json(_))
    ));
}

#[test]
fn snapshot_from_reader_reads_everything() {
    let text = br#"{"jobs": []}"#;
    let snapshot = JobSnapshot::from_reader(&text[..]).unwrap();
    assert!(snapshot.jobs.is_empty());
    assert_eq!(snapshot.stats, StatusCounts::default());
}
