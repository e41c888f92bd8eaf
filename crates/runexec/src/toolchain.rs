use std::path::{Path, PathBuf};

use crate::JobSpec;

/// Compiler used when the user has not picked one.
pub const DEFAULT_COMPILER: &str = "gcc";

/// Compilers offered by the compile menu, in display order.
pub const KNOWN_COMPILERS: [&str; 6] = [
    "gcc",
    "clang",
    "aarch64-linux-gnu-gcc",
    "arm-linux-gnueabihf-gcc",
    "x86_64-w64-mingw32-gcc",
    "riscv64-linux-gnu-gcc",
];

/// Header whose presence in the include directory pulls in OpenSSL.
pub const MARKER_HEADER: &str = "sapi.h";

/// Linker flags appended when [`MARKER_HEADER`] is present.
pub const MARKER_LINK_FLAGS: [&str; 2] = ["-lcrypto", "-lssl"];

/// Returns the known compilers that resolve on `PATH`.
pub fn detect_compilers() -> Vec<String> {
    KNOWN_COMPILERS
        .iter()
        .filter(|name| which::which(name).is_ok())
        .map(|name| name.to_string())
        .collect()
}

/// Compiler invocation for a single-file project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileRequest {
    pub project_root: PathBuf,
    pub compiler: String,
    pub source: String,
    pub output: String,
    pub include_dir: String,
    /// Raw flags as typed by the user, split on whitespace.
    pub user_flags: String,
}

impl CompileRequest {
    pub fn new(project_root: impl Into<PathBuf>, compiler: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            compiler: compiler.into(),
            source: "main.c".to_string(),
            output: "app".to_string(),
            include_dir: "./include".to_string(),
            user_flags: String::new(),
        }
    }

    pub fn with_user_flags(mut self, flags: impl Into<String>) -> Self {
        self.user_flags = flags.into();
        self
    }

    fn marker_path(&self) -> PathBuf {
        self.project_root
            .join(Path::new(&self.include_dir))
            .join(MARKER_HEADER)
    }

    /// Whether the include directory carries the marker header.
    pub fn marker_detected(&self) -> bool {
        self.marker_path().is_file()
    }

    /// Terminal line announcing the automatic link flags, if they apply.
    pub fn notice(&self) -> Option<String> {
        self.marker_detected().then(|| {
            format!(
                "Detected {MARKER_HEADER} -> adding OpenSSL flags automatically ({})",
                MARKER_LINK_FLAGS.join(" ")
            )
        })
    }

    pub fn to_job_spec(&self) -> JobSpec {
        let mut spec = JobSpec::new(self.compiler.clone())
            .with_args([
                self.source.clone(),
                "-o".to_string(),
                self.output.clone(),
                format!("-I{}", self.include_dir),
            ])
            .with_working_dir(self.project_root.clone());
        if self.marker_detected() {
            spec = spec.with_args(MARKER_LINK_FLAGS);
        }
        spec.with_args(self.user_flags.split_whitespace())
    }
}

/// Launch of the compiled binary from the project root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRequest {
    pub project_root: PathBuf,
    pub binary: String,
    pub user_args: String,
}

impl RunRequest {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            binary: "./app".to_string(),
            user_args: String::new(),
        }
    }

    pub fn with_user_args(mut self, args: impl Into<String>) -> Self {
        self.user_args = args.into();
        self
    }

    pub fn binary_exists(&self) -> bool {
        self.project_root.join(&self.binary).is_file()
    }

    pub fn to_job_spec(&self) -> JobSpec {
        JobSpec::new(self.binary.clone())
            .with_args(self.user_args.split_whitespace())
            .with_working_dir(self.project_root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunExecutor;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn compile_command_without_marker() {
        let temp = tempdir().unwrap();
        let request = CompileRequest::new(temp.path(), "gcc").with_user_flags("  -O2   -Wall ");
        let spec = request.to_job_spec();
        assert_eq!(spec.program, "gcc");
        assert_eq!(
            spec.args,
            vec!["main.c", "-o", "app", "-I./include", "-O2", "-Wall"]
        );
        assert_eq!(spec.working_dir.as_deref(), Some(temp.path()));
        assert!(request.notice().is_none());
    }

    #[test]
    fn marker_header_adds_link_flags_before_user_flags() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("include")).unwrap();
        fs::write(temp.path().join("include/sapi.h"), "").unwrap();

        let request = CompileRequest::new(temp.path(), "clang").with_user_flags("-g");
        assert!(request.marker_detected());
        assert_eq!(
            request.to_job_spec().display_command(),
            "clang main.c -o app -I./include -lcrypto -lssl -g"
        );
        let notice = request.notice().unwrap();
        assert!(notice.contains("sapi.h"));
        assert!(notice.contains("-lcrypto -lssl"));
    }

    #[test]
    fn empty_flags_add_nothing() {
        let temp = tempdir().unwrap();
        let spec = CompileRequest::new(temp.path(), "gcc").to_job_spec();
        assert_eq!(spec.args.len(), 4);
    }

    #[test]
    fn run_request_targets_local_binary() {
        let temp = tempdir().unwrap();
        let request = RunRequest::new(temp.path()).with_user_args("one  two");
        assert!(!request.binary_exists());
        let spec = request.to_job_spec();
        assert_eq!(spec.display_command(), "./app one two");
        assert_eq!(spec.working_dir.as_deref(), Some(temp.path()));
    }

    #[test]
    fn detected_compilers_are_known() {
        for compiler in detect_compilers() {
            assert!(KNOWN_COMPILERS.contains(&compiler.as_str()));
        }
    }

    #[test]
    fn gcc_builds_and_runs_hello_project() {
        if which::which("gcc").is_err() {
            eprintln!("gcc not available; skipping");
            return;
        }
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("main.c"),
            "#include <stdio.h>\nint main(int argc, char **argv){ printf(\"hi %d\\n\", argc); return 0; }\n",
        )
        .unwrap();

        let compile = CompileRequest::new(temp.path(), "gcc").to_job_spec();
        let mut diagnostics = Vec::new();
        let built = RunExecutor::execute_streaming(&compile, |line| {
            diagnostics.push(line.to_string())
        })
        .unwrap();
        assert!(built.success(), "{}", diagnostics.join("\n"));

        let run = RunRequest::new(temp.path()).with_user_args("a b");
        assert!(run.binary_exists());
        let mut lines = Vec::new();
        let outcome = RunExecutor::execute_streaming(&run.to_job_spec(), |line| {
            lines.push(line.to_string())
        })
        .unwrap();
        assert!(outcome.success());
        assert_eq!(lines, vec!["hi 3"]);
    }
}
