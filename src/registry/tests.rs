//! Facade-level registry tests over the in-memory backend

use serde_json::json;

use super::*;
use crate::integrity::FileSet;
use crate::integrity::MismatchKind;

fn memory_registry() -> Registry {
    Registry::with_backend(
        RegistryConfig::new("/registry"),
        Box::new(InMemoryBackend::new()),
    )
}

fn strict_registry() -> Registry {
    Registry::with_backend(
        RegistryConfig::new("/registry").with_strict_verify(true),
        Box::new(InMemoryBackend::new()),
    )
}

fn artifacts(content: &[u8]) -> FileSet {
    FileSet::from([("model.bin".to_string(), content.to_vec())])
}

#[test]
fn test_register_resolve_roundtrip() {
    let registry = memory_registry();
    let req = RegisterRequest::new("ct", "pbmc", "v1", artifacts(b"A"));
    let out = registry.register(&req).expect("register");

    let resolved = registry.resolve("ct", "pbmc@v1", true).expect("resolve");
    assert_eq!(resolved.path, out.path);
    assert_eq!(resolved.version, "v1");
    assert!(resolved.verified);
    assert_eq!(
        registry.backend().read_all(&resolved.path.join("model.bin")).expect("read"),
        b"A"
    );
}

#[test]
fn test_register_with_alias_sets_latest_and_audits() {
    let registry = memory_registry();
    let req = RegisterRequest::new("ct", "pbmc", "v1", artifacts(b"A"))
        .with_alias("latest")
        .with_actor("alice");
    let out = registry.register(&req).expect("register");
    assert_eq!(out.alias_set.as_deref(), Some("latest"));

    // Bare reference means @latest.
    let resolved = registry.resolve("ct", "pbmc", false).expect("resolve bare");
    assert_eq!(resolved.version, "v1");
    assert_eq!(resolved.via_alias.as_deref(), Some("latest"));

    let log = registry.audit_log("ct", "pbmc").expect("audit");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].alias, "latest");
    assert_eq!(log[0].reason.as_deref(), Some("register"));
}

#[test]
fn test_bare_reference_before_any_alias_is_not_found() {
    let registry = memory_registry();
    registry
        .register(&RegisterRequest::new("ct", "pbmc", "v1", artifacts(b"A")))
        .expect("register");
    let err = registry.resolve("ct", "pbmc", false).expect_err("no latest alias");
    assert!(matches!(err, RegistryError::NotFound { .. }));
}

#[test]
fn test_promotion_flow_matches_audit() {
    let registry = memory_registry();
    registry
        .register(&RegisterRequest::new("ct", "pbmc", "v1", artifacts(b"A")))
        .expect("register");

    registry
        .promote("ct", "pbmc", "production", "v1", Some("alice"), Some("ok"))
        .expect("promote");

    let resolved = registry.resolve("ct", "pbmc@production", false).expect("resolve");
    assert_eq!(resolved.version, "v1");

    let log = registry.audit_log("ct", "pbmc").expect("audit");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].to_version, "v1");
}

#[test]
fn test_strict_verify_catches_tampering_on_resolve() {
    let registry = strict_registry();
    let out = registry
        .register(&RegisterRequest::new("ct", "pbmc", "v1", artifacts(b"A")))
        .expect("register");

    registry.backend().write_atomic(&out.path.join("model.bin"), b"B").expect("tamper");

    let err = registry.resolve("ct", "pbmc@v1", false).expect_err("strict resolve");
    match err {
        RegistryError::Integrity { mismatches, .. } => {
            assert_eq!(mismatches[0].file, "model.bin");
        }
        other => panic!("expected Integrity, got {other:?}"),
    }
}

#[test]
fn test_verify_report_names_tampered_file() {
    let registry = memory_registry();
    let out = registry
        .register(&RegisterRequest::new("ct", "pbmc", "v1", artifacts(b"A")))
        .expect("register");
    registry.backend().write_atomic(&out.path.join("model.bin"), b"B").expect("tamper");

    let report = registry.verify("ct", "pbmc@v1").expect("verify");
    assert!(!report.ok());
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].file, "model.bin");
    assert!(matches!(report.mismatches[0].kind, MismatchKind::DigestMismatch { .. }));
}

#[test]
fn test_show_loads_provenance() {
    let registry = memory_registry();
    let mut metadata = serde_json::Map::new();
    metadata.insert("framework".to_string(), json!("torch"));
    metadata.insert("training_code_ref".to_string(), json!("git:abc123"));
    let req = RegisterRequest::new("ct", "pbmc", "v1", artifacts(b"A"))
        .with_actor("alice")
        .with_metadata(metadata);
    registry.register(&req).expect("register");

    let (resolved, meta) = registry.show("ct", "pbmc@v1", false).expect("show");
    assert_eq!(resolved.version, "v1");
    assert_eq!(meta.task, "ct");
    assert_eq!(meta.creator.as_deref(), Some("alice"));
    assert_eq!(meta.training_code_ref.as_deref(), Some("git:abc123"));
    assert_eq!(meta.extra.get("framework"), Some(&json!("torch")));
}

#[test]
fn test_listings() {
    let registry = memory_registry();
    for (model, version) in [("pbmc", "v1"), ("pbmc", "v2"), ("bonemarrow", "v1")] {
        registry
            .register(&RegisterRequest::new("ct", model, version, artifacts(b"A")))
            .expect("register");
    }
    registry.promote("ct", "pbmc", "staging", "v2", None, None).expect("promote");

    assert_eq!(registry.list_models("ct").expect("models"), vec!["bonemarrow", "pbmc"]);
    assert_eq!(registry.list_versions("ct", "pbmc").expect("versions"), vec!["v1", "v2"]);
    assert_eq!(
        registry.list_aliases("ct", "pbmc").expect("aliases"),
        vec![("staging".to_string(), "v2".to_string())]
    );
    assert!(registry.list_models("unknown-task").expect("unknown task").is_empty());
}

#[test]
fn test_example_scenario() {
    // Register ct/pbmc/v1, bare resolve fails, promote latest, bare resolve works.
    let registry = memory_registry();
    let out = registry
        .register(&RegisterRequest::new("ct", "pbmc", "v1", artifacts(b"A")))
        .expect("register");

    assert!(matches!(
        registry.resolve("ct", "pbmc", false),
        Err(RegistryError::NotFound { .. })
    ));

    registry.promote("ct", "pbmc", "latest", "v1", Some("alice"), None).expect("promote");
    let resolved = registry.resolve("ct", "pbmc@latest", false).expect("resolve");
    assert_eq!(resolved.path, out.path);
}
