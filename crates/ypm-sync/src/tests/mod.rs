//! Crate-level test doubles, integration tests and BDD scenarios.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

use crate::error::SyncError;
use crate::host_config::{ConfigDocument, ConfigStore, InstalledPlugin, YarnrcStore};
use crate::layout::ProjectLayout;
use crate::record::PluginRecord;
use crate::runner::{CommandRunner, ExitCode, SyncCommand};


/// Runner that records every command and replays scripted outcomes.
///
/// Once the script runs out every further command succeeds.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    outcomes: RefCell<VecDeque<ExitCode>>,
    calls: RefCell<Vec<SyncCommand>>,
}

impl ScriptedRunner {
    pub(crate) fn with_outcomes(outcomes: impl IntoIterator<Item = ExitCode>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into_iter().collect()),
            calls: RefCell::default(),
        }
    }

    pub(crate) fn calls(&self) -> Vec<SyncCommand> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &SyncCommand) -> Result<ExitCode, SyncError> {
        self.calls.borrow_mut().push(command.clone());
        Ok(self
            .outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or(ExitCode::Success))
    }
}

/// Runner that applies `plugin import` and `plugin remove` to the project on
/// disk the way Yarn does, so consecutive passes observe each other.
///
/// Every other command succeeds without effect unless it matches the
/// configured failing subcommand.
#[derive(Debug)]
pub(crate) struct FakeYarn {
    layout: ProjectLayout,
    failing_subcommand: RefCell<Option<String>>,
    calls: RefCell<Vec<SyncCommand>>,
}

impl FakeYarn {
    pub(crate) fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            failing_subcommand: RefCell::default(),
            calls: RefCell::default(),
        }
    }

    /// Makes every command whose first arguments start with `subcommand`
    /// fail.
    pub(crate) fn fail_on(&self, subcommand: &str) {
        *self.failing_subcommand.borrow_mut() = Some(subcommand.to_owned());
    }

    pub(crate) fn calls(&self) -> Vec<SyncCommand> {
        self.calls.borrow().clone()
    }

    pub(crate) fn rendered_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(SyncCommand::display_arguments)
            .collect()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn store(&self) -> YarnrcStore {
        YarnrcStore::new(self.layout.host_config_path())
    }

    fn import(&self, relative: &str) -> Result<(), SyncError> {
        let source = self.layout.resolve(relative);
        let stem = Path::new(relative)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .expect("bundle has a UTF-8 stem");
        let destination = self.layout.imported_bundle_path(stem);
        fs::create_dir_all(destination.parent().expect("imported dir"))
            .expect("create imported dir");
        fs::copy(&source, &destination).expect("copy bundle");

        let path = format!(".yarn/plugins/@yarnpkg/{stem}.cjs");
        self.store().update(|document| {
            let mut root = document.as_value().clone();
            let entry = json!({ "path": path, "spec": relative });
            match root.get_mut("plugins").and_then(Value::as_array_mut) {
                Some(plugins) => plugins.push(entry),
                None => {
                    root["plugins"] = Value::Array(vec![entry]);
                }
            }
            ConfigDocument::from_value(root)
        })?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), SyncError> {
        self.store().update(|document| {
            let mut root = document.as_value().clone();
            if let Some(plugins) = root.get_mut("plugins").and_then(Value::as_array_mut) {
                plugins.retain(|entry| {
                    let spec = entry.get("spec").and_then(Value::as_str).unwrap_or_default();
                    let record = PluginRecord::parse(InstalledPlugin::new("", spec));
                    record
                        .as_managed()
                        .is_none_or(|managed| managed.plugin_name() != name)
                });
            }
            ConfigDocument::from_value(root)
        })?;
        Ok(())
    }
}

impl CommandRunner for FakeYarn {
    fn run(&self, command: &SyncCommand) -> Result<ExitCode, SyncError> {
        self.calls.borrow_mut().push(command.clone());
        let rendered = command.display_arguments();
        if let Some(failing) = self.failing_subcommand.borrow().as_deref()
            && rendered.starts_with(failing)
        {
            return Ok(ExitCode::Failure);
        }

        let arguments: Vec<String> = command
            .arguments()
            .iter()
            .map(|argument| argument.to_string_lossy().into_owned())
            .collect();
        match arguments.as_slice() {
            [plugin, import, bundle] if plugin == "plugin" && import == "import" => {
                self.import(bundle)?;
            }
            [plugin, remove, name] if plugin == "plugin" && remove == "remove" => {
                self.remove(name)?;
            }
            _ => {}
        }
        Ok(ExitCode::Success)
    }
}

/// A temporary project with its layout.
pub(crate) struct TempProject {
    _dir: TempDir,
    pub(crate) layout: ProjectLayout,
}

impl TempProject {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().expect("create project dir");
        let layout = ProjectLayout::new(dir.path());
        fs::write(dir.path().join("package.json"), "{}\n").expect("write project manifest");
        Self { _dir: dir, layout }
    }

    /// Installs a built plugin package into the isolated workspace.
    pub(crate) fn install_package(&self, ident: &str, contents: &str) {
        let stem = ident
            .rsplit('/')
            .next()
            .and_then(|name| name.strip_prefix("yarn-"))
            .expect("plugin package name");
        let dir = self
            .layout
            .workspace_dir()
            .join("node_modules")
            .join(ident)
            .join("bundles/@yarnpkg");
        fs::create_dir_all(&dir).expect("create bundle dir");
        fs::write(dir.join(format!("{stem}.js")), contents).expect("write bundle");
    }

    /// Writes the isolated workspace's manifest.
    pub(crate) fn declare(&self, dependencies: &[(&str, &str)]) {
        let entries: serde_json::Map<String, Value> = dependencies
            .iter()
            .map(|(ident, version)| ((*ident).to_owned(), Value::from(*version)))
            .collect();
        fs::create_dir_all(self.layout.workspace_dir()).expect("create workspace dir");
        fs::write(
            self.layout.workspace_dir().join("package.json"),
            serde_json::to_string_pretty(&json!({ "dependencies": entries }))
                .expect("serialise manifest"),
        )
        .expect("write workspace manifest");
    }

    /// Plugin specs currently recorded in the host configuration.
    pub(crate) fn installed_specs(&self) -> Vec<String> {
        crate::host_config::read_installed_plugins(&YarnrcStore::new(
            self.layout.host_config_path(),
        ))
        .expect("read installed plugins")
        .iter()
        .map(|plugin| plugin.spec().to_owned())
        .collect()
    }
}

// ---------------------------------------------------------------------------
// End-to-end passes through the fake host tool
// ---------------------------------------------------------------------------

#[test]
fn second_pass_without_changes_runs_nothing() {
    let project = TempProject::new();
    project.install_package("yarn-plugin-foo", "foo v1");
    project.declare(&[("yarn-plugin-foo", "1.0.0")]);
    let yarn = FakeYarn::new(project.layout.clone());
    let synchronizer = crate::sync::Synchronizer::new(&yarn);

    assert_eq!(synchronizer.sync(&project.layout).expect("first pass"), ExitCode::Success);
    assert_eq!(yarn.calls().len(), 1);
    yarn.clear_calls();

    assert_eq!(synchronizer.sync(&project.layout).expect("second pass"), ExitCode::Success);
    assert!(yarn.calls().is_empty(), "got {:?}", yarn.rendered_calls());
}

#[test]
fn undeclaring_a_plugin_removes_it() {
    let project = TempProject::new();
    project.install_package("yarn-plugin-foo", "foo v1");
    project.declare(&[("yarn-plugin-foo", "1.0.0")]);
    let yarn = FakeYarn::new(project.layout.clone());
    let synchronizer = crate::sync::Synchronizer::new(&yarn);
    synchronizer.sync(&project.layout).expect("import pass");
    yarn.clear_calls();

    project.declare(&[]);
    synchronizer.sync(&project.layout).expect("removal pass");

    assert_eq!(yarn.rendered_calls(), ["plugin remove @yarnpkg/plugin-foo"]);
    assert!(project.installed_specs().is_empty());
}
