//! End-to-end tests of the subcommand handlers against documents on disk.

use std::path::PathBuf;

use sluice_cli::fileset::{
    run_digest, run_inspect, run_pullup, run_subst, DigestArgs, InspectArgs, PullupArgs, SubstArgs,
};
use sluice_cli::resources::{run_fit, run_require, FitArgs, RequireArgs};
use sluice_core::{ContentDigest, FilesetTree, Sha2Digester};

const VLIST_SHA256: &str =
    "sha256:d60e67ce9e89548b502a5ad7968e99caed0d388f0a991b906f41a7ba65adb31f";

const VLIST_DOC: &str = r#"{
    "List": [
        {"Fileset": {
            "foo": {"id": "sha256:2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae", "size": 3},
            "bar": {"id": "sha256:fcde2b2edba56bf408601fb721fe9b5c338d10ee429ea04fae5511b68fbf8fb9", "size": 3}
        }},
        {"Fileset": {
            "a/b/c": {"id": "sha256:d76a7b72669c9cec266b566bdec68efbc8d4f22d1f2689bbf0146bf0b88fdbe9", "size": 5},
            "bar": {"id": "sha256:fcde2b2edba56bf408601fb721fe9b5c338d10ee429ea04fae5511b68fbf8fb9", "size": 3}
        }}
    ]
}"#;

const STAGED_DOC: &str = r#"{"Fileset": {
    "in": {"size": 3, "source": "s3://bucket/foo", "etag": "e1"},
    "other": {"size": 4, "source": "s3://bucket/other", "etag": "e2"}
}}"#;

const SUBST_DOC: &str = r#"[
    {
        "from": {"size": 3, "source": "s3://bucket/foo", "etag": "e1"},
        "to": {"id": "sha256:2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae", "size": 3}
    }
]"#;

fn write_doc(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("utf-8 output")
}

#[test]
fn digest_prints_cache_key() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "vlist.json", VLIST_DOC);
    let mut out = Vec::new();

    let expect = None;
    let args = DigestArgs { file, expect };
    let code = run_digest(&args, &Sha2Digester::sha256(), &mut out).unwrap();

    assert_eq!(code, 0);
    assert_eq!(output(out).trim(), VLIST_SHA256);
}

#[test]
fn digest_expect_mismatch_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "vlist.json", VLIST_DOC);
    let wrong: ContentDigest = format!("sha256:{}1", "0".repeat(63)).parse().unwrap();
    let right: ContentDigest = VLIST_SHA256.parse().unwrap();
    let mut out = Vec::new();

    let digester = Sha2Digester::sha256();

    let args = DigestArgs {
        file: file.clone(),
        expect: Some(wrong),
    };
    assert_eq!(run_digest(&args, &digester, &mut out).unwrap(), 1);

    let args = DigestArgs {
        file,
        expect: Some(right),
    };
    assert_eq!(run_digest(&args, &digester, &mut out).unwrap(), 0);
}

#[test]
fn digest_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let args = DigestArgs {
        file: dir.path().join("absent.json"),
        expect: None,
    };
    let digester = Sha2Digester::sha256();
    let mut out = Vec::new();
    let err = run_digest(&args, &digester, &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load fileset"));
}

#[test]
fn inspect_summarizes() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "vlist.json", VLIST_DOC);
    let mut out = Vec::new();

    let args = InspectArgs { file, full: false };
    let code = run_inspect(&args, &Sha2Digester::sha256(), &mut out).unwrap();

    assert_eq!(code, 0);
    let text = output(out);
    assert!(
        text.contains("value: list<val<bar=fcde2b2e, ...6B>, ...14B>"),
        "{text}"
    );
    assert!(text.contains(&format!("digest: {VLIST_SHA256}")));
    assert!(text.contains("files: 4 (3 distinct)"));
    assert!(text.contains("size: 14B"));
    assert!(text.contains("references: 0"));
    assert!(text.contains("any_empty: false"));
}

#[test]
fn pullup_merges_into_one_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "vlist.json", VLIST_DOC);
    let mut out = Vec::new();

    run_pullup(&PullupArgs { file }, &mut out).unwrap();

    let tree: FilesetTree = serde_json::from_slice(&out).unwrap();
    let mapping = tree.as_mapping().expect("pullup yields a mapping");
    assert_eq!(mapping.len(), 3);
    assert!(mapping.contains_key("a/b/c"));
}

#[test]
fn subst_reports_unresolved_references() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "staged.json", STAGED_DOC);
    let map = write_doc(&dir, "subst.json", SUBST_DOC);

    let mut out = Vec::new();
    let args = SubstArgs {
        file: file.clone(),
        map: map.clone(),
        require_resolved: false,
    };
    assert_eq!(run_subst(&args, &mut out).unwrap(), 0);

    let tree: FilesetTree = serde_json::from_slice(&out).unwrap();
    let mapping = tree.as_mapping().unwrap();
    assert!(!mapping["in"].is_reference());
    assert!(mapping["other"].is_reference());

    let args = SubstArgs {
        file,
        map,
        require_resolved: true,
    };
    assert_eq!(run_subst(&args, &mut Vec::new()).unwrap(), 2);
}

#[test]
fn fit_reports_availability() {
    let mut out = Vec::new();
    let args = FitArgs {
        capacity: "mem=10,cpu=5,disk=1".parse().unwrap(),
        demand: "mem=5,cpu=2,disk=3".parse().unwrap(),
    };

    assert_eq!(run_fit(&args, &mut out).unwrap(), 1);
    let text = output(out);
    assert!(text.contains("available: false"));
    assert!(text.contains("remaining: {mem:5B cpu:3 disk:0B}"));
    assert!(text.contains("units: 3"));
}

#[test]
fn require_folds_and_checks_capacity() {
    let mut out = Vec::new();
    let args = RequireArgs {
        demands: vec![
            "mem=10,cpu=5,disk=1".parse().unwrap(),
            "mem=20,cpu=3,disk=1".parse().unwrap(),
        ],
        capacity: Some("mem=20,cpu=4,disk=1".parse().unwrap()),
    };

    assert_eq!(run_require(&args, &mut out).unwrap(), 1);
    let text = output(out);
    assert!(text.contains("min {mem:20B cpu:5 disk:1B}"));
    assert!(text.contains("satisfied: false"));
}
