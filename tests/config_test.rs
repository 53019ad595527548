// tests/config_test.rs
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use git_release::config::{load_config, Config, CONFIG_FILE_NAME};
use git_release::domain::VersionBump;
use git_release::git::Backend;
use git_release::release::ReleaseOptions;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.branches.development, "main");
    assert_eq!(config.branches.release_branch(), "main");
    assert_eq!(config.files.manifest, PathBuf::from("build.gradle"));
    assert_eq!(config.version.marker, "SNAPSHOT");
    assert_eq!(config.version.tag_pattern, "releases/v{version}");
    assert_eq!(config.git.backend, Backend::Libgit2);
    assert!(config.hooks.release.is_none());
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[branches]
development = "develop"
release = "master"

[files]
manifest = "gradle.properties"

[version]
marker = "DEV"
bump = "minor"
declaration = '(?m)^version=(?P<version>\S+)$'
tag_pattern = "v{version}"

[notes]
group = "org.example"
artifact = "lib"

[git]
backend = "system"
remote = "upstream"

[hooks]
release = "scripts/publish.sh"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let scratch = TempDir::new().unwrap();
    let config = load_config(Some(temp_file.path()), scratch.path()).unwrap();
    assert_eq!(config.branches.release_branch(), "master");
    assert_eq!(config.files.manifest, PathBuf::from("gradle.properties"));
    assert_eq!(config.files.notes, PathBuf::from("README.md"));
    assert_eq!(config.version.bump, VersionBump::Minor);
    assert_eq!(config.git.backend, Backend::System);
    assert_eq!(
        config.hooks.release,
        Some(PathBuf::from("scripts/publish.sh"))
    );

    let options = ReleaseOptions::from_config(&config).unwrap();
    assert_eq!(options.marker, "DEV");
    assert_eq!(options.group, "org.example");
    assert_eq!(
        options.push_command("v1.0.0"),
        "git push upstream master develop v1.0.0"
    );
}

#[test]
fn test_repository_config_is_found() {
    let repo_root = TempDir::new().unwrap();
    fs::write(
        repo_root.path().join(CONFIG_FILE_NAME),
        "[branches]\ndevelopment = \"trunk\"\n",
    )
    .unwrap();

    let config = load_config(None, repo_root.path()).unwrap();
    assert_eq!(config.branches.development, "trunk");
}

#[test]
fn test_explicit_path_wins_over_repository_config() {
    let repo_root = TempDir::new().unwrap();
    fs::write(
        repo_root.path().join(CONFIG_FILE_NAME),
        "[branches]\ndevelopment = \"trunk\"\n",
    )
    .unwrap();
    let explicit = repo_root.path().join("other.toml");
    fs::write(&explicit, "[branches]\ndevelopment = \"develop\"\n").unwrap();

    let config = load_config(Some(&explicit), repo_root.path()).unwrap();
    assert_eq!(config.branches.development, "develop");
}

#[test]
fn test_invalid_file_is_an_error() {
    let repo_root = TempDir::new().unwrap();
    fs::write(repo_root.path().join(CONFIG_FILE_NAME), "[branches\n").unwrap();
    assert!(load_config(None, repo_root.path()).is_err());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let repo_root = TempDir::new().unwrap();
    let missing = repo_root.path().join("nope.toml");
    assert!(load_config(Some(&missing), repo_root.path()).is_err());
}
