use std::collections::VecDeque;
use std::fmt;
use std::process::{Child, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::stream::{spawn_reader, StreamEvent};
use crate::{JobSpec, RunError};

/// Callback used by reader threads to wake the UI thread.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// One of the two fixed process ownership positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobSlot {
    Build,
    Run,
}

impl JobSlot {
    pub const ALL: [JobSlot; 2] = [JobSlot::Build, JobSlot::Run];

    fn index(self) -> usize {
        match self {
            JobSlot::Build => 0,
            JobSlot::Run => 1,
        }
    }
}

impl fmt::Display for JobSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobSlot::Build => f.write_str("build"),
            JobSlot::Run => f.write_str("run"),
        }
    }
}

/// Lifecycle of a slot. A freshly spawned job is `Starting` until the next
/// [`ProcessSupervisor::pump`] sees it alive. `Terminated` is a resting state
/// like `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Starting,
    Running,
    Terminated(Option<i32>),
}

/// Final report for one supervised process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub program: String,
    pub exit_code: Option<i32>,
    pub killed: bool,
    pub duration: Duration,
}

impl JobOutcome {
    pub fn success(&self) -> bool {
        !self.killed && self.exit_code == Some(0)
    }
}

/// Receives supervised job output on the thread that calls [`ProcessSupervisor::pump`].
pub trait JobSink {
    fn on_output(&mut self, slot: JobSlot, line: &str);
    fn on_finished(&mut self, slot: JobSlot, outcome: JobOutcome);
}

struct JobEvent {
    slot: JobSlot,
    generation: u64,
    event: StreamEvent,
}

struct ActiveJob {
    generation: u64,
    program: String,
    child: Child,
    open_streams: usize,
    killed: bool,
    started: Instant,
}

impl ActiveJob {
    fn outcome(&self, exit_code: Option<i32>) -> JobOutcome {
        JobOutcome {
            program: self.program.clone(),
            exit_code,
            killed: self.killed,
            duration: self.started.elapsed(),
        }
    }

    /// Best-effort kill; errors mean the process is already gone.
    fn kill(&mut self) {
        self.killed = true;
        if let Err(err) = self.child.kill() {
            tracing::debug!(program = %self.program, error = %err, "kill failed");
        }
    }
}

#[derive(Default)]
struct SlotState {
    state: JobState,
    job: Option<ActiveJob>,
}

/// Owns the Build and Run jobs and relays their output.
///
/// Starting a job in an occupied slot kills the previous process first; its
/// remaining output is dropped because every event carries the generation of
/// the job that produced it.
pub struct ProcessSupervisor {
    slots: [SlotState; 2],
    events_tx: Sender<JobEvent>,
    events_rx: Receiver<JobEvent>,
    finished: VecDeque<(JobSlot, JobOutcome)>,
    next_generation: u64,
    waker: Option<Waker>,
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            slots: Default::default(),
            events_tx,
            events_rx,
            finished: VecDeque::new(),
            next_generation: 1,
            waker: None,
        }
    }

    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn state(&self, slot: JobSlot) -> JobState {
        self.slots[slot.index()].state
    }

    pub fn is_running(&self, slot: JobSlot) -> bool {
        self.slots[slot.index()].job.is_some()
    }

    pub fn any_running(&self) -> bool {
        JobSlot::ALL.iter().any(|slot| self.is_running(*slot))
    }

    /// Starts `spec` in `slot`, replacing whatever ran there.
    ///
    /// A program that cannot be located fails with [`RunError::ToolMissing`]
    /// before anything is killed or spawned.
    pub fn start(&mut self, slot: JobSlot, spec: &JobSpec) -> Result<(), RunError> {
        let resolved = spec.resolve_program()?;
        self.replace_existing(slot);

        let generation = self.next_generation;
        self.next_generation += 1;
        self.slots[slot.index()].state = JobState::Starting;

        let mut command = spec.command(&resolved);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                self.slots[slot.index()].state = JobState::Idle;
                tracing::warn!(%slot, program = %spec.program, error = %source, "spawn failed");
                return Err(RunError::Spawn {
                    program: spec.program.clone(),
                    source,
                });
            }
        };

        let mut open_streams = 0;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let readers = [
            stdout.map(|out| Box::new(out) as Box<dyn std::io::Read + Send>),
            stderr.map(|err| Box::new(err) as Box<dyn std::io::Read + Send>),
        ];
        for (index, reader) in readers.into_iter().flatten().enumerate() {
            let tx = self.events_tx.clone();
            let waker = self.waker.clone();
            let spawned = spawn_reader(
                reader,
                format!("zenith-{slot}-{generation}-{index}"),
                move |event| {
                    let sent = tx
                        .send(JobEvent {
                            slot,
                            generation,
                            event,
                        })
                        .is_ok();
                    if let Some(waker) = &waker {
                        waker();
                    }
                    sent
                },
            );
            if let Err(err) = spawned {
                let _ = child.kill();
                let _ = child.wait();
                self.slots[slot.index()].state = JobState::Idle;
                return Err(RunError::Reader(err));
            }
            open_streams += 1;
        }

        tracing::info!(%slot, generation, command = %spec.display_command(), "job started");
        let entry = &mut self.slots[slot.index()];
        entry.job = Some(ActiveJob {
            generation,
            program: spec.program.clone(),
            child,
            open_streams,
            killed: false,
            started: Instant::now(),
        });
        Ok(())
    }

    /// Kills both slots' processes. Jobs that already exited are tolerated;
    /// their outcomes are still delivered by the next [`pump`](Self::pump).
    pub fn stop_all(&mut self) {
        for slot in JobSlot::ALL {
            if let Some(job) = self.slots[slot.index()].job.as_mut() {
                tracing::info!(%slot, program = %job.program, "stopping job");
                job.kill();
            }
        }
    }

    /// Delivers queued output and completed jobs to `sink`.
    pub fn pump(&mut self, sink: &mut impl JobSink) {
        while let Some((slot, outcome)) = self.finished.pop_front() {
            sink.on_finished(slot, outcome);
        }

        while let Ok(JobEvent {
            slot,
            generation,
            event,
        }) = self.events_rx.try_recv()
        {
            let Some(job) = self.slots[slot.index()].job.as_mut() else {
                continue;
            };
            if job.generation != generation {
                continue;
            }
            match event {
                StreamEvent::Line(line) => sink.on_output(slot, &line),
                StreamEvent::Closed => job.open_streams = job.open_streams.saturating_sub(1),
            }
        }

        for slot in JobSlot::ALL {
            if let Some(outcome) = self.reap_if_exited(slot) {
                sink.on_finished(slot, outcome);
            } else if self.slots[slot.index()].state == JobState::Starting
                && self.is_running(slot)
            {
                self.slots[slot.index()].state = JobState::Running;
            }
        }
    }

    fn reap_if_exited(&mut self, slot: JobSlot) -> Option<JobOutcome> {
        let entry = &mut self.slots[slot.index()];
        let job = entry.job.as_mut()?;
        if job.open_streams > 0 {
            return None;
        }
        let exit_code = match job.child.try_wait() {
            Ok(Some(status)) => status.code(),
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(%slot, error = %err, "failed to poll job status");
                None
            }
        };
        let outcome = job.outcome(exit_code);
        tracing::info!(%slot, exit_code = ?outcome.exit_code, killed = outcome.killed, "job finished");
        entry.job = None;
        entry.state = JobState::Terminated(exit_code);
        Some(outcome)
    }

    fn replace_existing(&mut self, slot: JobSlot) {
        let entry = &mut self.slots[slot.index()];
        let Some(mut job) = entry.job.take() else {
            return;
        };
        tracing::info!(%slot, program = %job.program, "replacing running job");
        job.kill();
        let exit_code = match job.child.wait() {
            Ok(status) => status.code(),
            Err(err) => {
                tracing::debug!(%slot, error = %err, "failed to reap replaced job");
                None
            }
        };
        entry.state = JobState::Terminated(exit_code);
        self.finished.push_back((slot, job.outcome(exit_code)));
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        for entry in &mut self.slots {
            if let Some(job) = entry.job.as_mut() {
                job.kill();
                let _ = job.child.wait();
            }
        }
    }
}
