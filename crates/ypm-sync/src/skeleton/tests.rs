//! Unit tests for workspace skeleton creation.

use std::fs;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

struct Project {
    _dir: TempDir,
    layout: ProjectLayout,
}

impl Project {
    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.layout.workspace_dir().join(name)).expect("read workspace file")
    }

    fn write(&self, name: &str, contents: &str) {
        fs::write(self.layout.workspace_dir().join(name), contents).expect("write workspace file");
    }
}

#[fixture]
fn project() -> Project {
    let dir = TempDir::new().expect("create project dir");
    let layout = ProjectLayout::new(dir.path());
    Project { _dir: dir, layout }
}

#[rstest]
fn creates_every_file_in_a_fresh_project(project: Project) {
    ensure_skeleton(&project.layout).expect("skeleton created");

    assert_eq!(project.read(".gitignore"), GITIGNORE);
    assert_eq!(project.read(".yarnrc.yml"), WORKSPACE_YARNRC);
    assert_eq!(project.read("package.json"), "{\n}\n");
    assert_eq!(project.read("yarn.lock"), "\n");
}

#[rstest]
fn fixed_files_are_rewritten(project: Project) {
    ensure_skeleton(&project.layout).expect("skeleton created");
    project.write(".gitignore", "edited\n");
    project.write(".yarnrc.yml", "nodeLinker: pnp\n");

    ensure_skeleton(&project.layout).expect("skeleton refreshed");

    assert_eq!(project.read(".gitignore"), GITIGNORE);
    assert_eq!(project.read(".yarnrc.yml"), WORKSPACE_YARNRC);
}

#[rstest]
#[case::manifest("package.json", "{\"dependencies\": {\"yarn-plugin-foo\": \"1.0.0\"}}\n")]
#[case::lockfile("yarn.lock", "# yarn lockfile v1\n")]
fn user_files_are_preserved(project: Project, #[case] name: &str, #[case] contents: &str) {
    ensure_skeleton(&project.layout).expect("skeleton created");
    project.write(name, contents);

    ensure_skeleton(&project.layout).expect("skeleton refreshed");

    assert_eq!(project.read(name), contents);
}

#[rstest]
fn workspace_yarnrc_pins_lockfile_and_linker(project: Project) {
    ensure_skeleton(&project.layout).expect("skeleton created");
    let yarnrc = project.read(".yarnrc.yml");
    assert!(yarnrc.contains("lockfileFilename: yarn.lock"));
    assert!(yarnrc.contains("nodeLinker: node-modules"));
}

#[rstest]
fn blocked_workspace_is_an_io_error(project: Project) {
    let parent = project
        .layout
        .workspace_dir()
        .parent()
        .expect("workspace has a parent")
        .to_path_buf();
    fs::create_dir_all(&parent).expect("create plugins dir");
    fs::write(project.layout.workspace_dir(), "not a directory").expect("block workspace");

    let error = ensure_skeleton(&project.layout).expect_err("creation must fail");
    assert!(matches!(error, SyncError::Io { .. }), "got {error:?}");
}
