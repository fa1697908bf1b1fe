// tests/audit_report.rs

use fleetsim::audit::{build_excludes, digest_paths, load_signing_key, AuditReport};
use tempfile::tempdir;

fn fixture() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("missions/archive")).unwrap();
    std::fs::write(root.join("missions/a.toml"), "objective = \"a\"\n").unwrap();
    std::fs::write(root.join("missions/archive/b.toml"), "objective = \"b\"\n").unwrap();
    std::fs::write(root.join("missions/scratch.tmp"), "junk").unwrap();
    std::fs::write(root.join("report.json"), "{}").unwrap();
    dir
}

#[test]
fn test_digests_cover_files_and_directories() {
    let dir = fixture();
    let root = dir.path();
    let excludes = build_excludes(&[]).unwrap();

    let digests = digest_paths(&[root.join("missions"), root.join("report.json")], &excludes).unwrap();
    assert_eq!(digests.len(), 4);

    let expected = blake3::hash(b"{}").to_hex().to_string();
    let key = root.join("report.json").to_string_lossy().replace('\\', "/");
    assert_eq!(digests[&key], expected);
}

#[test]
fn test_excludes_skip_matching_paths() {
    let dir = fixture();
    let excludes = build_excludes(&["**/*.tmp".to_string(), "**/archive".to_string()]).unwrap();

    let digests = digest_paths(&[dir.path().join("missions")], &excludes).unwrap();
    assert_eq!(digests.len(), 1);
    assert!(digests.keys().all(|k| k.ends_with("a.toml")));
}

#[test]
fn test_digests_are_stable_and_content_sensitive() {
    let dir = fixture();
    let excludes = build_excludes(&[]).unwrap();
    let paths = [dir.path().join("missions")];

    let first = digest_paths(&paths, &excludes).unwrap();
    let second = digest_paths(&paths, &excludes).unwrap();
    assert_eq!(first, second);

    std::fs::write(dir.path().join("missions/a.toml"), "objective = \"changed\"\n").unwrap();
    let third = digest_paths(&paths, &excludes).unwrap();
    assert_ne!(first, third);
}

#[test]
fn test_missing_path_is_an_error() {
    let dir = tempdir().unwrap();
    let excludes = build_excludes(&[]).unwrap();
    assert!(digest_paths(&[dir.path().join("nope")], &excludes).is_err());
    assert!(build_excludes(&["[".to_string()]).is_err());
}

#[test]
fn test_signature_verifies_only_with_the_same_key_and_contents() {
    let dir = fixture();
    let key_path = dir.path().join("audit.key");
    std::fs::write(&key_path, "  s3cret\n").unwrap();
    let secret = load_signing_key(&key_path).unwrap();
    assert_eq!(secret, b"s3cret");

    let excludes = build_excludes(&[]).unwrap();
    let digests = digest_paths(&[dir.path().join("missions")], &excludes).unwrap();

    let mut report = AuditReport::new(digests);
    assert!(!report.verify(&secret).unwrap());

    report.sign(&secret).unwrap();
    assert!(report.verify(&secret).unwrap());
    assert!(!report.verify(b"other").unwrap());

    let mut tampered = report.clone();
    tampered.files.insert("extra".into(), "00".into());
    assert!(!tampered.verify(&secret).unwrap());

    let out = dir.path().join("out/audit_report.json");
    report.write_to(&out).unwrap();
    let loaded: AuditReport = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(loaded, report);
    assert!(loaded.verify(&secret).unwrap());
}

#[test]
fn test_empty_key_file_is_rejected() {
    let dir = tempdir().unwrap();
    let key_path = dir.path().join("empty.key");
    std::fs::write(&key_path, "\n").unwrap();
    assert!(load_signing_key(&key_path).is_err());
}
