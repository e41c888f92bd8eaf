use std::process::Stdio;
use std::sync::mpsc;
use std::time::Instant;

use crate::stream::{spawn_reader, StreamEvent};
use crate::supervisor::JobOutcome;
use crate::{JobSpec, RunError};

/// Runs commands to completion on the calling thread.
pub struct RunExecutor;

impl RunExecutor {
    /// Runs the command, handing each merged stdout/stderr line to `on_line` as
    /// it arrives, and returns once the process has exited.
    pub fn execute_streaming<F>(spec: &JobSpec, mut on_line: F) -> Result<JobOutcome, RunError>
    where
        F: FnMut(&str),
    {
        let resolved = spec.resolve_program()?;
        let mut command = spec.command(&resolved);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let start = Instant::now();
        let mut child = command.spawn().map_err(|source| RunError::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        tracing::info!(command = %spec.display_command(), "running to completion");

        let (tx, rx) = mpsc::channel();
        let mut open_streams = 0;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let readers = [
            stdout.map(|out| Box::new(out) as Box<dyn std::io::Read + Send>),
            stderr.map(|err| Box::new(err) as Box<dyn std::io::Read + Send>),
        ];
        for (index, reader) in readers.into_iter().flatten().enumerate() {
            let tx = tx.clone();
            let spawned = spawn_reader(reader, format!("zenith-exec-{index}"), move |event| {
                tx.send(event).is_ok()
            });
            if let Err(err) = spawned {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RunError::Reader(err));
            }
            open_streams += 1;
        }
        drop(tx);

        while open_streams > 0 {
            match rx.recv() {
                Ok(StreamEvent::Line(line)) => on_line(&line),
                Ok(StreamEvent::Closed) => open_streams -= 1,
                Err(_) => break,
            }
        }

        let status = child.wait().map_err(RunError::Poll)?;
        Ok(JobOutcome {
            program: spec.program.clone(),
            exit_code: status.code(),
            killed: false,
            duration: start.elapsed(),
        })
    }
}
