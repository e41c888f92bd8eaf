use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use zenith_package::{build_archive, write_manifest, CompileStep, Manifest, PackageError};
use zenith_project::{
    add_plugin, clean_project, create_new_project, list_plugins, read_source, save_source,
    spawn_scan, write_atomic, PluginAddOutcome, ProjectError, ProjectLayout, ProjectTree,
    ScanOptions,
};
use zenith_runexec::{
    detect_compilers, CompileRequest, JobOutcome, JobSink, JobSlot, JobState, ProcessSupervisor,
    RunError, RunRequest, DEFAULT_COMPILER,
};
use zenith_search::{highlight_matches, SearchDirection, SearchEngine, SearchMatch, SearchOptions};
use zenith_settings::{support_notice, ApiSelection, ThemeName, ThemeStore};

/// Lines kept in the terminal pane before the oldest are dropped.
pub const TERMINAL_CAPACITY: usize = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    MainMenu,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorTab {
    Editor,
    SdkSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Modal message shown until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    About,
    Settings,
    Plugins,
    CompilerMenu,
}

/// What a compile started from the flags prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilePurpose {
    Build,
    Package,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDraft {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
}

impl ManifestDraft {
    fn to_manifest(&self) -> Manifest {
        Manifest::new(
            self.name.clone(),
            self.version.clone(),
            self.author.clone(),
            self.description.clone(),
        )
    }
}

/// Input requested from the user. Submitting continues the pending operation,
/// cancelling abandons it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    CompileFlags {
        flags: String,
        purpose: CompilePurpose,
    },
    RunArgs {
        args: String,
    },
    Manifest(ManifestDraft),
    ConfirmBack,
    OverwritePlugin {
        source: PathBuf,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub visible: bool,
    pub focus_requested: bool,
    pub query: String,
    pub case_sensitive: bool,
    pub matches: Vec<SearchMatch>,
    pub current: Option<SearchMatch>,
}

/// Scrollback of the terminal pane.
#[derive(Debug, Clone, Default)]
pub struct Terminal {
    lines: VecDeque<String>,
}

impl Terminal {
    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == TERMINAL_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn text(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }
}

/// Relays supervisor output into the terminal and defers finished jobs so they
/// can be handled with the whole state in reach.
struct TerminalSink<'a> {
    terminal: &'a mut Terminal,
    finished: Vec<(JobSlot, JobOutcome)>,
}

impl JobSink for TerminalSink<'_> {
    fn on_output(&mut self, _slot: JobSlot, line: &str) {
        self.terminal.push(line);
    }

    fn on_finished(&mut self, slot: JobSlot, outcome: JobOutcome) {
        self.finished.push((slot, outcome));
    }
}

/// Every user action the shell can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewProject,
    ShowAbout,
    OpenSettings,
    OpenPlugins,
    CloseDialog,
    Exit,
    SelectTab(EditorTab),
    OpenFile(PathBuf),
    Save,
    Compile,
    OpenCompilerMenu,
    SelectCompiler(String),
    RunProject,
    PackageProject,
    CleanProject,
    ToggleTree,
    ShowSearch,
    HideSearch,
    UpdateSearch,
    FindNext,
    FindPrevious,
    SubmitPrompt,
    CancelPrompt,
    BackToMainMenu,
    SetTheme(ThemeName),
    AddPlugin,
    ShowVersionInfo(&'static str),
    SaveApiSettings,
    DismissNotification,
}

/// All shell state. Owned by the UI thread and changed only through [`StudioState::dispatch`].
pub struct StudioState {
    pub layout: ProjectLayout,
    pub page: Page,
    pub tab: EditorTab,
    pub source: String,
    pub open_file: PathBuf,
    pub title: String,
    pub terminal: Terminal,
    pub search: SearchState,
    pub tree_visible: bool,
    pub tree: Option<ProjectTree>,
    pub theme: ThemeName,
    pub compiler: String,
    pub available_compilers: Vec<String>,
    pub prompt: Option<Prompt>,
    pub dialog: Option<Dialog>,
    pub notifications: VecDeque<Notification>,
    pub plugins: Vec<String>,
    pub plugin_path: String,
    pub api: ApiSelection,
    pub exit_requested: bool,
    theme_store: ThemeStore,
    supervisor: ProcessSupervisor,
    pending_package: bool,
    tree_rx: Option<Receiver<Result<ProjectTree, ProjectError>>>,
    archive_rx: Option<Receiver<Result<PathBuf, PackageError>>>,
}

pub const APP_TITLE: &str = "ZenithOS SDK";

impl StudioState {
    pub fn new(root: impl Into<PathBuf>, supervisor: ProcessSupervisor) -> Self {
        let layout = ProjectLayout::new(root);
        let theme_store = ThemeStore::for_project(layout.root());
        let theme = theme_store.load();
        let open_file = layout.main_source();
        Self {
            page: Page::MainMenu,
            tab: EditorTab::Editor,
            source: String::new(),
            open_file,
            title: APP_TITLE.to_string(),
            terminal: Terminal::default(),
            search: SearchState::default(),
            tree_visible: false,
            tree: None,
            theme,
            compiler: DEFAULT_COMPILER.to_string(),
            available_compilers: Vec::new(),
            prompt: None,
            dialog: None,
            notifications: VecDeque::new(),
            plugins: Vec::new(),
            plugin_path: String::new(),
            api: ApiSelection::default(),
            exit_requested: false,
            theme_store,
            supervisor,
            pending_package: false,
            tree_rx: None,
            archive_rx: None,
            layout,
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        tracing::debug!(?command, "dispatch");
        match command {
            Command::NewProject => self.new_project(),
            Command::ShowAbout => self.dialog = Some(Dialog::About),
            Command::OpenSettings => self.dialog = Some(Dialog::Settings),
            Command::OpenPlugins => self.open_plugins(),
            Command::CloseDialog => self.dialog = None,
            Command::Exit => {
                self.supervisor.stop_all();
                self.exit_requested = true;
            }
            Command::SelectTab(tab) => self.tab = tab,
            Command::OpenFile(path) => self.open_file(path),
            Command::Save => {
                self.save(false);
            }
            Command::Compile => self.compile(),
            Command::OpenCompilerMenu => {
                self.available_compilers = detect_compilers();
                self.dialog = Some(Dialog::CompilerMenu);
            }
            Command::SelectCompiler(compiler) => {
                self.compiler = compiler;
                self.dialog = None;
                self.compile();
            }
            Command::RunProject => self.run_project(),
            Command::PackageProject => self.package_project(),
            Command::CleanProject => self.clean(),
            Command::ToggleTree => {
                self.tree_visible = !self.tree_visible;
                if self.tree_visible {
                    self.refresh_tree();
                }
            }
            Command::ShowSearch => {
                self.search.visible = true;
                self.search.focus_requested = true;
            }
            Command::HideSearch => self.search.visible = false,
            Command::UpdateSearch => self.update_search(),
            Command::FindNext => self.find(SearchDirection::Forward),
            Command::FindPrevious => self.find(SearchDirection::Backward),
            Command::SubmitPrompt => self.submit_prompt(),
            Command::CancelPrompt => self.cancel_prompt(),
            Command::BackToMainMenu => {
                if self.supervisor.any_running() {
                    self.prompt = Some(Prompt::ConfirmBack);
                } else {
                    self.page = Page::MainMenu;
                }
            }
            Command::SetTheme(theme) => self.set_theme(theme),
            Command::AddPlugin => {
                let source = PathBuf::from(self.plugin_path.trim());
                if !source.as_os_str().is_empty() {
                    self.add_plugin(source, false);
                }
            }
            Command::ShowVersionInfo(label) => {
                self.notify(Severity::Info, "Version Info", support_notice(label));
            }
            Command::SaveApiSettings => {
                let message = self.api.confirmation();
                self.notify(Severity::Info, "Saved!", message);
            }
            Command::DismissNotification => {
                self.notifications.pop_front();
            }
        }
    }

    /// Drains job output and worker results. Called once per frame.
    pub fn poll_background(&mut self) {
        let mut sink = TerminalSink {
            terminal: &mut self.terminal,
            finished: Vec::new(),
        };
        self.supervisor.pump(&mut sink);
        for (slot, outcome) in sink.finished {
            self.on_job_finished(slot, outcome);
        }

        if let Some(rx) = &self.tree_rx {
            match rx.try_recv() {
                Ok(Ok(tree)) => {
                    self.tree = Some(tree);
                    self.tree_rx = None;
                }
                Ok(Err(err)) => {
                    self.tree_rx = None;
                    tracing::warn!(error = %err, "project scan failed");
                    self.notify(Severity::Error, "Error", format!("Failed to scan project:\n{err}"));
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.tree_rx = None,
            }
        }

        if let Some(rx) = &self.archive_rx {
            match rx.try_recv() {
                Ok(result) => {
                    self.archive_rx = None;
                    self.on_archive_built(result);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.archive_rx = None,
            }
        }
    }

    /// Whether background work is pending and the UI should keep polling.
    pub fn is_busy(&self) -> bool {
        self.supervisor.any_running() || self.tree_rx.is_some() || self.archive_rx.is_some()
    }

    pub fn is_running(&self, slot: JobSlot) -> bool {
        self.supervisor.is_running(slot)
    }

    pub fn job_state(&self, slot: JobSlot) -> JobState {
        self.supervisor.state(slot)
    }

    fn notify(&mut self, severity: Severity, title: &str, message: impl Into<String>) {
        self.notifications.push_back(Notification {
            title: title.to_string(),
            message: message.into(),
            severity,
        });
    }

    fn new_project(&mut self) {
        if let Err(err) = create_new_project(&self.layout) {
            self.notify(Severity::Error, "Error", format!("Failed to create project:\n{err}"));
            return;
        }
        self.open_file(self.layout.main_source());
    }

    fn open_file(&mut self, path: PathBuf) {
        match read_source(&path) {
            Ok(text) => {
                self.source = text;
                self.title = format!("{APP_TITLE} - {}", file_label(&path));
                self.open_file = path;
                self.page = Page::Editor;
                self.tab = EditorTab::Editor;
                self.update_search();
            }
            Err(err) => {
                let message = format!("Failed to open {}:\n{err}", file_label(&path));
                self.notify(Severity::Error, "Error", message);
            }
        }
    }

    /// Writes the buffer back to the open file.
    fn save(&mut self, silent: bool) -> bool {
        let result = if self.open_file == self.layout.main_source() {
            save_source(&self.layout, &self.source).map(|_| ())
        } else {
            write_atomic(&self.open_file, self.source.as_bytes()).map_err(|source| {
                ProjectError::Io {
                    path: self.open_file.clone(),
                    source,
                }
            })
        };
        match result {
            Ok(()) if silent => {
                self.terminal.push(format!("Saved {}", file_label(&self.open_file)));
                true
            }
            Ok(()) => {
                self.notify(Severity::Info, "Save", "Project saved successfully!");
                true
            }
            Err(err) => {
                self.notify(Severity::Error, "Error", format!("Failed to save project:\n{err}"));
                false
            }
        }
    }

    fn compile_request(&self, flags: &str) -> CompileRequest {
        CompileRequest::new(self.layout.root(), self.compiler.clone()).with_user_flags(flags)
    }

    fn compiler_available(&self) -> bool {
        self.compile_request("").to_job_spec().resolve_program().is_ok()
    }

    fn compile(&mut self) {
        if !self.compiler_available() {
            let message = format!(
                "The following tools are missing: {}\nInstall them to compile projects.",
                self.compiler
            );
            self.notify(Severity::Warning, "Missing Tools", message);
            return;
        }
        self.terminal.clear();
        if !self.save(true) {
            return;
        }
        self.terminal
            .push(format!("Starting compilation ({})...", self.compiler));
        self.prompt = Some(Prompt::CompileFlags {
            flags: String::new(),
            purpose: CompilePurpose::Build,
        });
    }

    fn start_compile(&mut self, flags: &str, purpose: CompilePurpose) {
        let request = self.compile_request(flags);
        if let Some(notice) = request.notice() {
            self.terminal.push(notice);
        }
        let spec = request.to_job_spec();
        self.terminal.push(format!("$ {}", spec.display_command()));
        match self.supervisor.start(JobSlot::Build, &spec) {
            Ok(()) => self.pending_package = purpose == CompilePurpose::Package,
            Err(RunError::ToolMissing { program }) if purpose == CompilePurpose::Package => {
                self.pending_package = false;
                self.terminal
                    .push(format!("{program} not found, skipping native compilation."));
                self.start_archive(CompileStep::Skipped);
            }
            Err(err) => {
                self.pending_package = false;
                self.notify(Severity::Error, "Error", format!("Failed to start compiler:\n{err}"));
            }
        }
    }

    fn run_project(&mut self) {
        let request = RunRequest::new(self.layout.root());
        if !request.binary_exists() {
            self.notify(
                Severity::Warning,
                "Run",
                "Binary ./app not found. Compiling first...",
            );
            self.compile();
            return;
        }
        self.prompt = Some(Prompt::RunArgs {
            args: String::new(),
        });
    }

    fn start_run(&mut self, args: &str) {
        self.terminal.clear();
        self.terminal.push("Starting app...");
        let spec = RunRequest::new(self.layout.root())
            .with_user_args(args)
            .to_job_spec();
        if let Err(err) = self.supervisor.start(JobSlot::Run, &spec) {
            self.notify(Severity::Error, "Error", format!("Failed to start app:\n{err}"));
        }
    }

    fn package_project(&mut self) {
        self.terminal.clear();
        if !self.save(true) {
            return;
        }
        self.terminal.push("Compiling and packaging to .ZAPP...");
        self.prompt = Some(Prompt::Manifest(ManifestDraft::default()));
    }

    fn submit_manifest(&mut self, draft: ManifestDraft) {
        if let Err(err) = write_manifest(&self.layout, &draft.to_manifest()) {
            self.notify(Severity::Error, "Error", format!("Failed to write manifest:\n{err}"));
            return;
        }
        self.terminal.push("Manifest created: manifest.json");
        if self.compiler_available() {
            self.prompt = Some(Prompt::CompileFlags {
                flags: String::new(),
                purpose: CompilePurpose::Package,
            });
        } else {
            self.terminal.push(format!(
                "{} not found, skipping native compilation.",
                self.compiler
            ));
            self.start_archive(CompileStep::Skipped);
        }
    }

    fn start_archive(&mut self, step: CompileStep) {
        if self.archive_rx.is_some() {
            self.notify(Severity::Warning, "ZAPP", "Packaging is already in progress.");
            return;
        }
        let layout = self.layout.clone();
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("zenith-archive".to_string())
            .spawn(move || {
                let _ = tx.send(build_archive(&layout, step));
            });
        match spawned {
            Ok(_) => self.archive_rx = Some(rx),
            Err(err) => {
                self.notify(Severity::Error, "Error", format!("Failed to create .ZAPP:\n{err}"));
            }
        }
    }

    fn on_archive_built(&mut self, result: Result<PathBuf, PackageError>) {
        match result {
            Ok(path) => {
                let name = file_label(&path);
                self.terminal.push(format!("Packaged -> {name}"));
                self.notify(Severity::Info, "ZAPP", format!("Created {name}"));
            }
            Err(err) => {
                tracing::warn!(error = %err, "packaging failed");
                self.notify(Severity::Error, "Error", format!("Failed to create .ZAPP:\n{err}"));
            }
        }
    }

    fn on_job_finished(&mut self, slot: JobSlot, outcome: JobOutcome) {
        let code = outcome
            .exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "none".to_string());
        match slot {
            JobSlot::Build if outcome.killed => self.terminal.push("Build stopped."),
            JobSlot::Build if self.pending_package => {
                self.pending_package = false;
                if outcome.success() {
                    self.terminal.push("Compilation OK.");
                    self.start_archive(CompileStep::Succeeded);
                } else {
                    self.terminal
                        .push("Compilation failed, aborting .ZAPP packaging.");
                    self.notify(Severity::Error, "Error", "Compilation failed. See terminal.");
                }
            }
            JobSlot::Build if outcome.success() => {
                self.terminal.push("Build finished successfully -> ./app");
                self.notify(
                    Severity::Info,
                    "Build",
                    "Compilation successful! Binary: ./app",
                );
            }
            JobSlot::Build => {
                self.terminal
                    .push(format!("Build failed with exit code {code}"));
                self.notify(
                    Severity::Error,
                    "Build failed",
                    "Compilation failed. Check terminal output.",
                );
            }
            JobSlot::Run if outcome.killed => self.terminal.push("App stopped."),
            JobSlot::Run => self
                .terminal
                .push(format!("App finished with exit code {code}")),
        }
    }

    fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        match prompt {
            Prompt::CompileFlags { flags, purpose } => self.start_compile(&flags, purpose),
            Prompt::RunArgs { args } => self.start_run(&args),
            Prompt::Manifest(draft) => self.submit_manifest(draft),
            Prompt::ConfirmBack => {
                self.supervisor.stop_all();
                self.pending_package = false;
                self.page = Page::MainMenu;
            }
            Prompt::OverwritePlugin { source } => self.add_plugin(source, true),
        }
    }

    fn cancel_prompt(&mut self) {
        match self.prompt.take() {
            Some(Prompt::CompileFlags { .. }) => {
                self.terminal.push("Compilation cancelled by user.");
            }
            Some(Prompt::Manifest(_)) => self.terminal.push("Packaging cancelled by user."),
            _ => {}
        }
    }

    fn clean(&mut self) {
        let removed: Vec<String> = clean_project(&self.layout)
            .iter()
            .map(|path| file_label(path))
            .collect();
        if removed.is_empty() {
            self.notify(Severity::Info, "Clean", "Nothing to remove.");
        } else {
            self.notify(
                Severity::Info,
                "Clean",
                format!("Removed: {}", removed.join(", ")),
            );
        }
    }

    fn refresh_tree(&mut self) {
        match spawn_scan(self.layout.root().to_path_buf(), ScanOptions::default()) {
            Ok(rx) => self.tree_rx = Some(rx),
            Err(err) => {
                self.notify(Severity::Error, "Error", format!("Failed to scan project:\n{err}"));
            }
        }
    }

    fn update_search(&mut self) {
        self.search.matches = highlight_matches(
            &self.source,
            &self.search.query,
            self.search.case_sensitive,
        );
        self.search.current = None;
    }

    fn find(&mut self, direction: SearchDirection) {
        if self.search.query.is_empty() {
            return;
        }
        let cursor = match (&self.search.current, direction) {
            (Some(current), SearchDirection::Forward) => current.end,
            (Some(current), SearchDirection::Backward) => current.start,
            (None, SearchDirection::Forward) => 0,
            (None, SearchDirection::Backward) => self.source.len(),
        };
        let options = SearchOptions::new(self.search.query.clone())
            .case_sensitive(self.search.case_sensitive)
            .direction(direction);
        match SearchEngine::new(&self.source).find(cursor, &options) {
            Ok(found) => self.search.current = found,
            Err(err) => tracing::debug!(error = %err, "search skipped"),
        }
    }

    fn set_theme(&mut self, theme: ThemeName) {
        self.theme = theme;
        if let Err(err) = self.theme_store.save(theme) {
            tracing::warn!(error = %err, "failed to persist theme");
            self.notify(Severity::Error, "Settings", format!("Failed to save theme:\n{err}"));
        }
    }

    fn open_plugins(&mut self) {
        if let Err(err) = std::fs::create_dir_all(self.layout.include_dir()) {
            let message = format!("Failed to create include directory:\n{err}");
            self.notify(Severity::Error, "Error", message);
            return;
        }
        self.refresh_plugins();
        self.dialog = Some(Dialog::Plugins);
    }

    fn refresh_plugins(&mut self) {
        match list_plugins(&self.layout) {
            Ok(plugins) => self.plugins = plugins,
            Err(err) => {
                self.plugins.clear();
                self.notify(Severity::Error, "Error", format!("Failed to list plugins:\n{err}"));
            }
        }
    }

    fn add_plugin(&mut self, source: PathBuf, overwrite: bool) {
        match add_plugin(&self.layout, &source, overwrite) {
            Ok(PluginAddOutcome::Added(target)) => {
                let message = format!("{} was added to ./include", file_label(&target));
                self.notify(Severity::Info, "Added", message);
                self.plugin_path.clear();
                self.refresh_plugins();
            }
            Ok(PluginAddOutcome::AlreadyExists(_)) => {
                self.prompt = Some(Prompt::OverwritePlugin { source });
            }
            Err(err) => {
                self.notify(Severity::Error, "Error", format!("Failed to add plugin:\n{err}"));
            }
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;
    use zenith_project::TEMPLATE_SOURCE;

    fn studio(root: &Path) -> StudioState {
        StudioState::new(root, ProcessSupervisor::new())
    }

    fn settle(state: &mut StudioState) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while state.is_busy() && Instant::now() < deadline {
            state.poll_background();
            thread::sleep(Duration::from_millis(10));
        }
        state.poll_background();
    }

    fn last_notification(state: &StudioState) -> &Notification {
        state.notifications.back().expect("a notification")
    }

    #[test]
    fn new_project_opens_template() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        assert_eq!(state.page, Page::Editor);
        assert_eq!(state.source, TEMPLATE_SOURCE);
        assert_eq!(state.title, "ZenithOS SDK - main.c");
    }

    #[test]
    fn save_writes_the_buffer() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        state.source = "int main(){return 2;}".to_string();
        state.dispatch(Command::Save);
        assert_eq!(
            fs::read_to_string(dir.path().join("main.c")).unwrap(),
            "int main(){return 2;}"
        );
        assert_eq!(last_notification(&state).title, "Save");
    }

    #[test]
    fn compile_with_missing_tool_warns_and_changes_nothing() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        state.compiler = "zenith-missing-cc".to_string();
        state.dispatch(Command::Compile);
        let note = last_notification(&state);
        assert_eq!(note.title, "Missing Tools");
        assert_eq!(note.severity, Severity::Warning);
        assert!(state.prompt.is_none());
        assert!(!state.is_running(JobSlot::Build));
    }

    #[test]
    fn cancelling_the_flags_prompt_cancels_compilation() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        state.compiler = "sh".to_string();
        state.dispatch(Command::Compile);
        assert!(matches!(state.prompt, Some(Prompt::CompileFlags { .. })));
        state.dispatch(Command::CancelPrompt);
        assert!(state.prompt.is_none());
        assert!(!state.is_running(JobSlot::Build));
        assert!(state
            .terminal
            .lines()
            .any(|line| line == "Compilation cancelled by user."));
    }

    #[test]
    fn run_without_binary_warns_and_compiles_first() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        state.compiler = "sh".to_string();
        state.dispatch(Command::RunProject);
        assert_eq!(state.notifications[0].title, "Run");
        assert!(matches!(
            state.prompt,
            Some(Prompt::CompileFlags {
                purpose: CompilePurpose::Build,
                ..
            })
        ));
    }

    #[cfg(unix)]
    fn install_app(root: &Path, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = root.join("app");
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn run_streams_output_into_terminal() {
        let dir = tempdir().unwrap();
        install_app(dir.path(), "echo \"args: $*\"");
        let mut state = studio(dir.path());
        state.dispatch(Command::RunProject);
        if let Some(Prompt::RunArgs { args }) = state.prompt.as_mut() {
            *args = "one two".to_string();
        }
        state.dispatch(Command::SubmitPrompt);
        settle(&mut state);
        let lines: Vec<_> = state.terminal.lines().collect();
        assert_eq!(
            lines,
            vec!["Starting app...", "args: one two", "App finished with exit code 0"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn back_with_running_job_asks_then_stops_everything() {
        let dir = tempdir().unwrap();
        install_app(dir.path(), "exec sleep 5");
        let mut state = studio(dir.path());
        state.page = Page::Editor;
        state.dispatch(Command::RunProject);
        state.dispatch(Command::SubmitPrompt);
        assert!(state.is_running(JobSlot::Run));

        state.dispatch(Command::BackToMainMenu);
        assert_eq!(state.prompt, Some(Prompt::ConfirmBack));
        assert_eq!(state.page, Page::Editor);

        state.dispatch(Command::SubmitPrompt);
        assert_eq!(state.page, Page::MainMenu);
        settle(&mut state);
        assert!(!state.is_running(JobSlot::Run));
        assert!(state.terminal.lines().any(|line| line == "App stopped."));
    }

    #[test]
    fn back_without_jobs_returns_immediately() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.page = Page::Editor;
        state.dispatch(Command::BackToMainMenu);
        assert_eq!(state.page, Page::MainMenu);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn packaging_without_compiler_still_builds_archive() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        state.compiler = "zenith-missing-cc".to_string();
        state.dispatch(Command::PackageProject);
        match state.prompt.as_mut() {
            Some(Prompt::Manifest(draft)) => {
                draft.name = "Demo \"app\"".to_string();
                draft.version = "1.0".to_string();
                draft.description = "First line.\nSecond line.".to_string();
            }
            other => panic!("expected manifest prompt, got {other:?}"),
        }
        state.dispatch(Command::SubmitPrompt);
        settle(&mut state);

        assert!(dir.path().join("project.zapp").exists());
        assert!(!dir.path().join("project_tmp.zip").exists());
        let manifest = fs::read_to_string(dir.path().join("manifest.json")).unwrap();
        let value: Manifest = serde_json::from_str(&manifest).unwrap();
        assert_eq!(value.name, "Demo \"app\"");
        assert_eq!(value.description, "First line.\nSecond line.");
        assert_eq!(value.binary, "app");
        assert_eq!(last_notification(&state).title, "ZAPP");
    }

    #[cfg(unix)]
    #[test]
    fn failed_compile_aborts_packaging() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let tools = tempdir().unwrap();
        let compiler = tools.path().join("zenith-failing-cc");
        fs::write(&compiler, "#!/bin/sh\necho 'main.c:1: error' >&2\nexit 1\n").unwrap();
        fs::set_permissions(&compiler, fs::Permissions::from_mode(0o755)).unwrap();

        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        state.compiler = compiler.to_string_lossy().into_owned();
        state.dispatch(Command::PackageProject);
        if let Some(Prompt::Manifest(draft)) = state.prompt.as_mut() {
            draft.name = "Demo".to_string();
            draft.version = "1.0".to_string();
        }
        state.dispatch(Command::SubmitPrompt);
        assert!(matches!(
            state.prompt,
            Some(Prompt::CompileFlags {
                purpose: CompilePurpose::Package,
                ..
            })
        ));
        state.dispatch(Command::SubmitPrompt);
        settle(&mut state);

        assert!(!dir.path().join("project.zapp").exists());
        assert!(state
            .terminal
            .lines()
            .any(|line| line == "Compilation failed, aborting .ZAPP packaging."));
        let note = last_notification(&state);
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(note.message, "Compilation failed. See terminal.");
    }

    #[test]
    fn second_archive_request_waits_for_the_first() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        state.start_archive(CompileStep::Skipped);
        state.start_archive(CompileStep::Skipped);
        assert_eq!(last_notification(&state).message, "Packaging is already in progress.");
        settle(&mut state);

        assert!(dir.path().join("project.zapp").exists());
        let created = state
            .notifications
            .iter()
            .filter(|note| note.message.starts_with("Created"))
            .count();
        assert_eq!(created, 1);
    }

    #[test]
    fn cancelling_manifest_prompt_writes_nothing() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        state.dispatch(Command::PackageProject);
        state.dispatch(Command::CancelPrompt);
        assert!(!dir.path().join("manifest.json").exists());
        assert!(!state.is_busy());
    }

    #[test]
    fn theme_choice_survives_restart() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        assert_eq!(state.theme, ThemeName::Purple);
        state.dispatch(Command::SetTheme(ThemeName::Dark));
        drop(state);
        assert_eq!(studio(dir.path()).theme, ThemeName::Dark);
    }

    #[test]
    fn search_tracks_query_and_cycles_matches() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.source = "printf(); Printf(); printf();".to_string();
        state.search.query = "printf".to_string();
        state.dispatch(Command::UpdateSearch);
        assert_eq!(state.search.matches.len(), 3);

        state.search.case_sensitive = true;
        state.dispatch(Command::UpdateSearch);
        assert_eq!(state.search.matches.len(), 2);

        state.dispatch(Command::FindNext);
        assert_eq!(state.search.current.as_ref().map(|m| m.start), Some(0));
        state.dispatch(Command::FindNext);
        assert_eq!(state.search.current.as_ref().map(|m| m.start), Some(20));
        state.dispatch(Command::FindNext);
        assert_eq!(state.search.current.as_ref().map(|m| m.start), Some(0));

        state.search.query.clear();
        state.dispatch(Command::UpdateSearch);
        assert!(state.search.matches.is_empty());
    }

    #[test]
    fn tree_toggle_scans_in_background() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::NewProject);
        state.dispatch(Command::ToggleTree);
        settle(&mut state);
        let tree = state.tree.as_ref().expect("tree scanned");
        assert_eq!(tree.root.name, "My project >>");
        assert_eq!(tree.file_count(), 1);

        state.dispatch(Command::ToggleTree);
        assert!(!state.tree_visible);
    }

    #[test]
    fn plugin_overwrite_requires_confirmation() {
        let project = tempdir().unwrap();
        let downloads = tempdir().unwrap();
        let header = downloads.path().join("net.h");
        fs::write(&header, "v1").unwrap();

        let mut state = studio(project.path());
        state.dispatch(Command::OpenPlugins);
        assert_eq!(state.dialog, Some(Dialog::Plugins));
        state.plugin_path = header.display().to_string();
        state.dispatch(Command::AddPlugin);
        assert_eq!(state.plugins, vec!["net.h"]);

        fs::write(&header, "v2").unwrap();
        state.plugin_path = header.display().to_string();
        state.dispatch(Command::AddPlugin);
        assert!(matches!(state.prompt, Some(Prompt::OverwritePlugin { .. })));
        state.dispatch(Command::SubmitPrompt);
        assert_eq!(
            fs::read_to_string(project.path().join("include/net.h")).unwrap(),
            "v2"
        );
    }

    #[test]
    fn clean_reports_removed_artifacts() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::CleanProject);
        assert_eq!(last_notification(&state).message, "Nothing to remove.");
        fs::write(dir.path().join("app"), "").unwrap();
        state.dispatch(Command::CleanProject);
        assert_eq!(last_notification(&state).message, "Removed: app");
    }

    #[test]
    fn version_info_uses_branch_notice() {
        let dir = tempdir().unwrap();
        let mut state = studio(dir.path());
        state.dispatch(Command::ShowVersionInfo("2.1"));
        assert!(last_notification(&state).message.contains("2.x branch"));
        state.dispatch(Command::DismissNotification);
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn terminal_drops_oldest_lines_past_capacity() {
        let mut terminal = Terminal::default();
        for index in 0..TERMINAL_CAPACITY + 3 {
            terminal.push(index.to_string());
        }
        assert_eq!(terminal.lines().count(), TERMINAL_CAPACITY);
        assert_eq!(terminal.lines().next(), Some("3"));
    }
}
