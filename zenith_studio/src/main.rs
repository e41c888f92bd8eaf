mod editor;
mod logging;
mod state;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use eframe::{App, Frame, NativeOptions};
use egui::{Align2, Color32, FontId, Key, Modifiers, RichText};
use zenith_highlight::{HighlightPalette, Highlighter};
use zenith_project::{ProjectNode, ProjectTree};
use zenith_runexec::{JobSlot, JobState, ProcessSupervisor};
use zenith_search::highlight_matches;
use zenith_settings::{api_versions, version_hint, ThemeName, ThemePalette};

use editor::{color32_from_color, layout_job, EditorStyle, LongPress, LONG_PRESS_SECS};
use state::{
    Command, CompilePurpose, Dialog, EditorTab, Page, Prompt, Severity, StudioState, APP_TITLE,
};

/// Overrides the project directory; defaults to the working directory.
const PROJECT_ROOT_ENV: &str = "ZENITH_PROJECT_ROOT";
const EDITOR_FONT_SIZE: f32 = 14.0;
const BUSY_REPAINT: Duration = Duration::from_millis(100);
const SDK_RELEASE: &str = "ZenithOS SDK 13.0";
const SDK_CREDITS: &str = "Developed by ne5link\nSDK Version: 13.0G";

struct StudioApp {
    state: StudioState,
    highlighter: Highlighter,
    syntax: HighlightPalette,
    applied_theme: Option<ThemeName>,
    applied_title: String,
    hovered_version: Option<&'static str>,
    compile_press: LongPress,
}

impl StudioApp {
    fn new(cc: &eframe::CreationContext<'_>, root: PathBuf) -> Self {
        let ctx = cc.egui_ctx.clone();
        let supervisor = ProcessSupervisor::new().with_waker(Arc::new(move || ctx.request_repaint()));
        tracing::info!(root = %root.display(), "opening project");
        Self {
            state: StudioState::new(root, supervisor),
            highlighter: Highlighter::c_language(),
            syntax: HighlightPalette::c_default(),
            applied_theme: None,
            applied_title: String::new(),
            hovered_version: None,
            compile_press: LongPress::default(),
        }
    }

    fn palette(&self) -> ThemePalette {
        ThemePalette::for_theme(self.state.theme)
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.state.theme) {
            return;
        }
        let palette = self.palette();
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(color32_from_color(palette.window_text));
        visuals.panel_fill = color32_from_color(palette.window_background);
        visuals.window_fill = color32_from_color(palette.panel_background);
        visuals.extreme_bg_color = color32_from_color(palette.editor_background);
        visuals.widgets.inactive.bg_fill = color32_from_color(palette.accent);
        visuals.widgets.inactive.weak_bg_fill = color32_from_color(palette.accent);
        visuals.widgets.inactive.fg_stroke.color = Color32::WHITE;
        visuals.widgets.hovered.bg_fill = color32_from_color(palette.accent_hover);
        visuals.widgets.hovered.weak_bg_fill = color32_from_color(palette.accent_hover);
        visuals.widgets.active.bg_fill = color32_from_color(palette.accent_hover);
        visuals.widgets.active.weak_bg_fill = color32_from_color(palette.accent_hover);
        visuals.selection.bg_fill = color32_from_color(palette.accent);
        ctx.set_visuals(visuals);
        self.applied_theme = Some(self.state.theme);
        tracing::debug!(theme = %self.state.theme, "theme applied");
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        if self.applied_title != self.state.title {
            self.applied_title = self.state.title.clone();
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.applied_title.clone()));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        if self.state.page != Page::Editor || self.state.prompt.is_some() {
            return;
        }
        let (save, search, tree, f1) = ctx.input_mut(|input| {
            (
                input.consume_key(Modifiers::COMMAND, Key::S),
                input.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::F),
                input.consume_key(Modifiers::COMMAND, Key::F),
                input.key_pressed(Key::F1),
            )
        });
        if save {
            commands.push(Command::Save);
        }
        if search {
            commands.push(Command::ShowSearch);
        }
        if tree {
            commands.push(Command::ToggleTree);
        }
        if f1 && self.state.tab == EditorTab::SdkSettings {
            let label = self.hovered_version.unwrap_or(self.state.api.target);
            commands.push(Command::ShowVersionInfo(label));
        }
    }

    fn show_main_menu(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.25);
                ui.heading(RichText::new(APP_TITLE).size(28.0));
                ui.add_space(24.0);
                let entries = [
                    ("New Project", Command::NewProject),
                    ("About", Command::ShowAbout),
                    ("Settings", Command::OpenSettings),
                    ("Plugins", Command::OpenPlugins),
                    ("Exit", Command::Exit),
                ];
                for (label, command) in entries {
                    let button = egui::Button::new(label).min_size(egui::vec2(220.0, 32.0));
                    if ui.add(button).clicked() {
                        commands.push(command);
                    }
                    ui.add_space(6.0);
                }
            });
        });
    }

    fn show_editor_page(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        self.show_tab_bar(ctx, commands);
        if self.state.tab == EditorTab::Editor {
            self.show_toolbar(ctx, commands);
            if self.state.search.visible {
                self.show_search_bar(ctx, commands);
            }
        }
        self.show_bottom_bar(ctx, commands);
        self.show_terminal(ctx);
        if self.state.tab == EditorTab::Editor && self.state.tree_visible {
            self.show_tree(ctx, commands);
        }
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            EditorTab::Editor => self.show_code_editor(ui, commands),
            EditorTab::SdkSettings => self.show_sdk_settings(ui, commands),
        });
    }

    fn show_tab_bar(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::TopBottomPanel::top("editor_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (tab, label) in [
                    (EditorTab::Editor, "Editor"),
                    (EditorTab::SdkSettings, "SDK Settings"),
                ] {
                    if ui.selectable_label(self.state.tab == tab, label).clicked() {
                        commands.push(Command::SelectTab(tab));
                    }
                }
            });
        });
    }

    fn show_toolbar(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let run_label = match self.state.job_state(JobSlot::Run) {
                    JobState::Starting => "Run Project (starting)",
                    JobState::Running => "Run Project (running)",
                    _ => "Run Project",
                };
                if ui.button(run_label).clicked() {
                    commands.push(Command::RunProject);
                }

                let compile_label = if self.state.is_running(JobSlot::Build) {
                    format!("Compile ({}) (building)", self.state.compiler)
                } else {
                    format!("Compile ({})", self.state.compiler)
                };
                let compile = ui
                    .button(compile_label)
                    .on_hover_text("Right-click or long-press to choose a compiler");
                let now = ui.input(|input| input.time);
                let long_press = self
                    .compile_press
                    .update(compile.is_pointer_button_down_on(), now);
                if self.compile_press.is_held() {
                    ui.ctx()
                        .request_repaint_after(Duration::from_secs_f64(LONG_PRESS_SECS));
                }
                if compile.secondary_clicked() || long_press {
                    commands.push(Command::OpenCompilerMenu);
                } else if compile.clicked() && !self.compile_press.swallow_click() {
                    commands.push(Command::Compile);
                }

                if ui.button("Compile to .ZAPP").clicked() {
                    commands.push(Command::PackageProject);
                }
                if ui.button("Save").on_hover_text("Ctrl+S").clicked() {
                    commands.push(Command::Save);
                }
                if ui.button("Toggle Tree").on_hover_text("Ctrl+F").clicked() {
                    commands.push(Command::ToggleTree);
                }
                if ui.button("Search").on_hover_text("Ctrl+Shift+F").clicked() {
                    commands.push(Command::ShowSearch);
                }
            });
        });
    }

    fn show_search_bar(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let search = &mut self.state.search;
                let field = ui.add(
                    egui::TextEdit::singleline(&mut search.query)
                        .hint_text("Search...")
                        .desired_width(240.0),
                );
                if search.focus_requested {
                    field.request_focus();
                    search.focus_requested = false;
                }
                if field.changed() {
                    commands.push(Command::UpdateSearch);
                }
                let (enter, shift) =
                    ui.input(|input| (input.key_pressed(Key::Enter), input.modifiers.shift));
                if field.lost_focus() && enter {
                    commands.push(if shift {
                        Command::FindPrevious
                    } else {
                        Command::FindNext
                    });
                    field.request_focus();
                }
                if ui.checkbox(&mut search.case_sensitive, "Case sensitive").changed() {
                    commands.push(Command::UpdateSearch);
                }
                if ui.button("Previous").clicked() {
                    commands.push(Command::FindPrevious);
                }
                if ui.button("Next").clicked() {
                    commands.push(Command::FindNext);
                }

                let status = match &search.current {
                    Some(current) => {
                        let index = search
                            .matches
                            .iter()
                            .position(|m| m.start == current.start)
                            .map_or(0, |index| index + 1);
                        format!(
                            "{index} of {} (Ln {}, Col {})",
                            search.matches.len(),
                            current.line,
                            current.column
                        )
                    }
                    None if search.query.is_empty() => String::new(),
                    None => format!("{} matches", search.matches.len()),
                };
                ui.label(status);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        commands.push(Command::HideSearch);
                    }
                });
            });
        });
    }

    fn show_bottom_bar(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::TopBottomPanel::bottom("bottom_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Assembly").clicked() {
                    commands.push(Command::PackageProject);
                }
                if ui.button("Clean").clicked() {
                    commands.push(Command::CleanProject);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Back").clicked() {
                        commands.push(Command::BackToMainMenu);
                    }
                });
            });
        });
    }

    fn show_terminal(&mut self, ctx: &egui::Context) {
        let palette = self.palette();
        let frame = egui::Frame::default()
            .fill(color32_from_color(palette.terminal_background))
            .inner_margin(egui::Margin::same(6.0));
        egui::TopBottomPanel::bottom("terminal")
            .resizable(true)
            .default_height(180.0)
            .frame(frame)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(self.state.terminal.text())
                                .monospace()
                                .color(color32_from_color(palette.terminal_text)),
                        );
                    });
            });
    }

    fn show_tree(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::SidePanel::left("project_tree")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| match &self.state.tree {
                    Some(tree) => render_tree(ui, tree, &self.state.open_file, commands),
                    None => {
                        ui.spinner();
                    }
                });
            });
    }

    fn show_code_editor(&mut self, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
        let palette = self.palette();
        let style = EditorStyle {
            font: FontId::monospace(EDITOR_FONT_SIZE),
            text: color32_from_color(palette.editor_text),
            search_background: color32_from_color(palette.search_match),
            current_background: Color32::GOLD,
            syntax: self.syntax.clone(),
        };
        let highlighter = &self.highlighter;
        let query = self.state.search.query.clone();
        let case_sensitive = self.state.search.case_sensitive;
        let current = self.state.search.current.as_ref().map(|m| m.span());
        let mut layouter = |ui: &egui::Ui, text: &str, wrap_width: f32| {
            let runs = highlighter.resolve_document(text);
            let marks: Vec<_> = highlight_matches(text, &query, case_sensitive)
                .iter()
                .map(|m| m.span())
                .collect();
            let current = current.as_ref().filter(|range| {
                range.end <= text.len()
                    && text.is_char_boundary(range.start)
                    && text.is_char_boundary(range.end)
            });
            let mut job = layout_job(text, &runs, &marks, current, &style);
            job.wrap.max_width = wrap_width;
            ui.fonts(|fonts| fonts.layout_job(job))
        };

        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let response = ui.add(
                    egui::TextEdit::multiline(&mut self.state.source)
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(30)
                        .lock_focus(true)
                        .layouter(&mut layouter),
                );
                if response.changed() {
                    commands.push(Command::UpdateSearch);
                }
            });
    }

    fn show_sdk_settings(&mut self, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
        self.hovered_version = None;
        ui.heading("API");
        ui.add_space(8.0);
        egui::Grid::new("api_versions")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Target API version");
                if let Some(label) = version_combo(ui, "target_api", &mut self.state.api.target) {
                    self.hovered_version = Some(label);
                }
                ui.end_row();

                ui.label("Minimal API version");
                if let Some(label) = version_combo(ui, "minimal_api", &mut self.state.api.minimal)
                {
                    self.hovered_version = Some(label);
                }
                ui.end_row();
            });
        ui.add_space(4.0);
        ui.weak("Hover a version and press F1 for support details.");
        ui.add_space(12.0);
        if ui.button("Save").clicked() {
            commands.push(Command::SaveApiSettings);
        }
    }

    fn show_dialogs(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        let Some(dialog) = self.state.dialog else {
            return;
        };
        let mut open = true;
        match dialog {
            Dialog::About => {
                egui::Window::new("About")
                    .open(&mut open)
                    .collapsible(false)
                    .resizable(false)
                    .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.heading(SDK_RELEASE);
                        ui.label(SDK_CREDITS);
                    });
            }
            Dialog::Settings => {
                egui::Window::new("Settings")
                    .open(&mut open)
                    .collapsible(false)
                    .resizable(false)
                    .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Theme");
                            egui::ComboBox::from_id_source("theme_selector")
                                .selected_text(self.state.theme.display_name())
                                .show_ui(ui, |ui| {
                                    for theme in ThemeName::ALL {
                                        let selected = self.state.theme == theme;
                                        if ui
                                            .selectable_label(selected, theme.display_name())
                                            .clicked()
                                            && !selected
                                        {
                                            commands.push(Command::SetTheme(theme));
                                        }
                                    }
                                });
                        });
                    });
            }
            Dialog::Plugins => {
                egui::Window::new("Plugins")
                    .open(&mut open)
                    .collapsible(false)
                    .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        if self.state.plugins.is_empty() {
                            ui.label("No plugins found.");
                        } else {
                            for plugin in &self.state.plugins {
                                ui.monospace(plugin);
                            }
                        }
                        ui.separator();
                        ui.horizontal(|ui| {
                            ui.add(
                                egui::TextEdit::singleline(&mut self.state.plugin_path)
                                    .hint_text("/path/to/plugin.h")
                                    .desired_width(260.0),
                            );
                            if ui.button("Add my plugins").clicked() {
                                commands.push(Command::AddPlugin);
                            }
                        });
                    });
            }
            Dialog::CompilerMenu => {
                egui::Window::new("Compiler")
                    .open(&mut open)
                    .collapsible(false)
                    .resizable(false)
                    .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        if self.state.available_compilers.is_empty() {
                            ui.label("No compilers found.");
                        }
                        for compiler in &self.state.available_compilers {
                            let label = format!("Compile with {compiler}");
                            if ui.button(label).clicked() {
                                commands.push(Command::SelectCompiler(compiler.clone()));
                            }
                        }
                    });
            }
        }
        if !open {
            commands.push(Command::CloseDialog);
        }
    }

    fn show_prompt(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        let Some(prompt) = self.state.prompt.as_mut() else {
            return;
        };
        let title = match prompt {
            Prompt::CompileFlags {
                purpose: CompilePurpose::Build,
                ..
            } => "Compile",
            Prompt::CompileFlags {
                purpose: CompilePurpose::Package,
                ..
            } => "Compile to .ZAPP",
            Prompt::RunArgs { .. } => "Run",
            Prompt::Manifest(_) => "Manifest",
            Prompt::ConfirmBack => "Back",
            Prompt::OverwritePlugin { .. } => "Overwrite",
        };
        let (accept, reject) = match prompt {
            Prompt::ConfirmBack | Prompt::OverwritePlugin { .. } => ("Yes", "No"),
            _ => ("OK", "Cancel"),
        };

        egui::Window::new(title)
            .id(egui::Id::new("studio_prompt"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let mut submitted = false;
                match prompt {
                    Prompt::CompileFlags { flags, .. } => {
                        ui.label("Additional compiler flags:");
                        submitted = single_line(ui, flags);
                    }
                    Prompt::RunArgs { args } => {
                        ui.label("Program arguments:");
                        submitted = single_line(ui, args);
                    }
                    Prompt::Manifest(draft) => {
                        egui::Grid::new("manifest_fields")
                            .num_columns(2)
                            .show(ui, |ui| {
                                for (label, value) in [
                                    ("App name:", &mut draft.name),
                                    ("Version:", &mut draft.version),
                                    ("Author:", &mut draft.author),
                                ] {
                                    ui.label(label);
                                    ui.text_edit_singleline(value);
                                    ui.end_row();
                                }
                                ui.label("Description:");
                                ui.add(
                                    egui::TextEdit::multiline(&mut draft.description)
                                        .desired_rows(3),
                                );
                                ui.end_row();
                            });
                    }
                    Prompt::ConfirmBack => {
                        ui.label("There are running processes. Stop them and go back?");
                    }
                    Prompt::OverwritePlugin { source } => {
                        let name = source
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        ui.label(format!(
                            "File {name} already exists in ./include. Overwrite?"
                        ));
                    }
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(accept).clicked() || submitted {
                        commands.push(Command::SubmitPrompt);
                    }
                    if ui.button(reject).clicked() {
                        commands.push(Command::CancelPrompt);
                    }
                });
            });
    }

    fn show_notification(&mut self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        if self.state.prompt.is_some() {
            return;
        }
        let Some(notification) = self.state.notifications.front() else {
            return;
        };
        let color = match notification.severity {
            Severity::Info => None,
            Severity::Warning => Some(Color32::from_rgb(0xFF, 0xB7, 0x4D)),
            Severity::Error => Some(Color32::from_rgb(0xFF, 0x6E, 0x6E)),
        };
        egui::Window::new(notification.title.as_str())
            .id(egui::Id::new("studio_notification"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let mut text = RichText::new(notification.message.as_str());
                if let Some(color) = color {
                    text = text.color(color);
                }
                ui.label(text);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    commands.push(Command::DismissNotification);
                }
            });
    }
}

impl App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.state.poll_background();
        self.apply_theme_if_needed(ctx);
        self.sync_title(ctx);

        let mut commands = Vec::new();
        self.handle_shortcuts(ctx, &mut commands);
        match self.state.page {
            Page::MainMenu => self.show_main_menu(ctx, &mut commands),
            Page::Editor => self.show_editor_page(ctx, &mut commands),
        }
        self.show_dialogs(ctx, &mut commands);
        self.show_prompt(ctx, &mut commands);
        self.show_notification(ctx, &mut commands);

        for command in commands {
            self.state.dispatch(command);
        }
        if self.state.exit_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if self.state.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }
}

fn single_line(ui: &mut egui::Ui, value: &mut String) -> bool {
    let response = ui.add(egui::TextEdit::singleline(value).desired_width(320.0));
    if !response.has_focus() && !response.lost_focus() {
        response.request_focus();
    }
    response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter))
}

/// Returns the version label under the pointer, if any.
fn version_combo(
    ui: &mut egui::Ui,
    id: &str,
    selected: &mut &'static str,
) -> Option<&'static str> {
    let mut hovered = None;
    let mut combo = egui::ComboBox::from_id_source(id)
        .selected_text(*selected)
        .width(200.0)
        .show_ui(ui, |ui| {
            for version in api_versions() {
                let mut option = ui.selectable_value(selected, version.label, version.label);
                if let Some(hint) = version.hint {
                    option = option.on_hover_text(hint);
                }
                if option.hovered() {
                    hovered = Some(version.label);
                }
            }
        });
    if let Some(hint) = version_hint(*selected) {
        combo.response = combo.response.on_hover_text(hint);
    }
    if combo.response.hovered() {
        hovered.get_or_insert(*selected);
    }
    hovered
}

fn render_tree(
    ui: &mut egui::Ui,
    tree: &ProjectTree,
    open_file: &std::path::Path,
    commands: &mut Vec<Command>,
) {
    render_tree_node(ui, &tree.root, open_file, commands);
}

fn render_tree_node(
    ui: &mut egui::Ui,
    node: &ProjectNode,
    open_file: &std::path::Path,
    commands: &mut Vec<Command>,
) {
    if node.is_folder() {
        egui::CollapsingHeader::new(node.name.as_str())
            .id_source(&node.path)
            .default_open(node.expanded)
            .show(ui, |ui| {
                for child in &node.children {
                    render_tree_node(ui, child, open_file, commands);
                }
            });
    } else if ui
        .selectable_label(node.path == open_file, node.name.as_str())
        .on_hover_text(node.path.display().to_string())
        .clicked()
    {
        commands.push(Command::OpenFile(node.path.clone()));
    }
}

fn project_root() -> PathBuf {
    let root = env::var_os(PROJECT_ROOT_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    if root.is_absolute() {
        return root;
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(root),
        Err(err) => {
            tracing::warn!(error = %err, "failed to resolve working directory");
            root
        }
    }
}

fn main() -> eframe::Result<()> {
    logging::init();
    let root = project_root();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Box::new(StudioApp::new(cc, root))),
    )
}
