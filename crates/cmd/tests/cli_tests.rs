// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use tempfile::TempDir;

use cmd::commands::{FindArgs, NameArgs, NameLevel, find_command, keys_command, name_command};
use cmd::common::FinderArgs;

const CONFIG: &str = r#"
path_pattern: "/archive/{model}"
file_pattern: "{varn}_{model}_{grid}.nc"
test_paths:
  - /archive/m1/tas_m1_gn.nc
  - /archive/m1/tas_m1_gr.nc
  - /archive/m1/pr_m1_gr.nc
  - /archive/m2/tas_m2_gr.nc
"#;

fn write_config(dir: &Path) -> FinderArgs {
    let path = dir.join("finder.yaml");
    std::fs::write(&path, CONFIG).expect("write config");
    FinderArgs {
        config: Some(path),
        ..Default::default()
    }
}

fn run_find(args: &FindArgs) -> Vec<String> {
    let mut lines = Vec::new();
    find_command(args, |line| lines.push(line)).expect("run find");
    lines
}

#[test]
fn test_find_table_output() {
    let dir = TempDir::new().expect("create temp dir");
    let args = FindArgs {
        finder: write_config(dir.path()),
        constraints: vec!["varn=tas".to_string()],
        ..Default::default()
    };

    let lines = run_find(&args);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("path"));
    assert!(lines[1].starts_with("/archive/m1/tas_m1_gn.nc"));
    assert!(lines[3].starts_with("/archive/m2/tas_m2_gr.nc"));
}

#[test]
fn test_find_json_with_priority() {
    let dir = TempDir::new().expect("create temp dir");
    let args = FindArgs {
        finder: write_config(dir.path()),
        constraints: vec!["varn=tas".to_string()],
        priority: Some("grid=gn,gr".to_string()),
        json: true,
        ..Default::default()
    };

    let lines = run_find(&args);
    let rows: Vec<serde_json::Value> = lines
        .iter()
        .map(|line| serde_json::from_str(line).expect("valid json"))
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["path"], "/archive/m1/tas_m1_gn.nc");
    assert_eq!(rows[0]["grid"], "gn");
    assert_eq!(rows[1]["model"], "m2");
}

#[test]
fn test_find_paths() {
    let dir = TempDir::new().expect("create temp dir");
    let args = FindArgs {
        finder: write_config(dir.path()),
        paths: true,
        json: true,
        ..Default::default()
    };

    let rows: Vec<serde_json::Value> = run_find(&args)
        .iter()
        .map(|line| serde_json::from_str(line).expect("valid json"))
        .collect();
    assert_eq!(
        rows,
        vec![
            serde_json::json!({"path": "/archive/m1/*", "model": "m1"}),
            serde_json::json!({"path": "/archive/m2/*", "model": "m2"}),
        ]
    );
}

#[test]
fn test_find_empty_is_an_error() {
    let dir = TempDir::new().expect("create temp dir");
    let mut args = FindArgs {
        finder: write_config(dir.path()),
        constraints: vec!["model=m3".to_string()],
        ..Default::default()
    };

    let err = find_command(&args, |_| {}).unwrap_err();
    assert!(err.to_string().contains("Found no files matching criteria"));

    args.on_empty = Some("allow".parse().expect("policy"));
    let lines = run_find(&args);
    assert_eq!(lines, vec!["path  model  varn  grid"]);
}

#[test]
fn test_find_on_host_filesystem() {
    let dir = TempDir::new().expect("create temp dir");
    let root = dir.path().join("archive");
    for (sub, file) in [("m1", "tas_m1.nc"), ("m2", "tas_m2.nc"), ("m2", "notes.txt")] {
        std::fs::create_dir_all(root.join(sub)).expect("create dir");
        std::fs::write(root.join(sub).join(file), b"").expect("write file");
    }

    let args = FindArgs {
        finder: FinderArgs {
            path_pattern: Some(format!("{}/{{model}}", root.display())),
            file_pattern: Some("{varn}_{model}.nc".to_string()),
            config: None,
        },
        json: true,
        ..Default::default()
    };

    let lines = run_find(&args);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("tas_m1.nc"));
    assert!(lines[1].contains("tas_m2.nc"));
}

#[test]
fn test_name_levels() {
    let args = NameArgs {
        finder: FinderArgs {
            path_pattern: Some("/archive/{model}".to_string()),
            file_pattern: Some("{varn}_{model}.nc".to_string()),
            config: None,
        },
        level: NameLevel::Full,
        fields: vec!["model=m1".to_string(), "varn=tas".to_string()],
    };

    let mut names = Vec::new();
    for level in [NameLevel::Path, NameLevel::File, NameLevel::Full] {
        let args = NameArgs { level, ..args.clone() };
        name_command(&args, |name| names.push(name)).expect("build name");
    }
    assert_eq!(
        names,
        vec!["/archive/m1/", "tas_m1.nc", "/archive/m1/tas_m1.nc"]
    );

    let args = NameArgs {
        fields: vec!["model=m1".to_string()],
        ..args
    };
    let err = name_command(&args, |_| {}).unwrap_err();
    assert!(err.to_string().contains("varn"));
}

#[test]
fn test_keys() {
    let dir = TempDir::new().expect("create temp dir");
    let args = write_config(dir.path());

    let mut lines = Vec::new();
    keys_command(&args, |line| lines.push(line)).expect("run keys");
    assert_eq!(
        lines,
        vec![
            "<FileFinder>",
            "path_pattern: '/archive/{model}/'",
            "file_pattern: '{varn}_{model}_{grid}.nc'",
            "",
            "keys: 'grid', 'model', 'varn'",
        ]
    );
}
