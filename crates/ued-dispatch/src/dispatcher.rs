// dispatcher.rs — Sequential delivery of send tasks through the channel.
//
// One task at a time, one session at a time — the sequential-only policy is
// deliberate, to stay under the remote surface's abuse detection. Per-task
// failures are classified and recorded, never propagated; only a lost
// channel session aborts the run, and even then every outcome classified so
// far is already flushed to the run's outcome log.
//
// Task lifecycle: Pending → Sending → {Sent, Failed}. Terminal states only;
// no retry, no re-entry.

use std::fmt;
use std::thread;
use std::time::Duration;

use uuid::Uuid;

use ued_history::{now_minute, DeliveryStatus, NotificationRecord, OutcomeLog};
use ued_roster::SendTask;

use crate::channel::{ChatSession, MessagingChannel};
use crate::error::DispatchError;
use crate::message::{compose_renewal_message, NOTIFICATION_TYPE};

/// Tunable waits around each delivery. The defaults mirror the cadence the
/// remote surface tolerates; tests and dry runs use [`SendPacing::immediate`].
#[derive(Debug, Clone)]
pub struct SendPacing {
    /// Pause after opening a session, letting the remote interface load.
    pub session_settle: Duration,
    /// Bounded polled wait for the input surface to become ready.
    pub ready_timeout: Duration,
    /// Pause after focusing the input, letting it stabilize before typing.
    pub focus_settle: Duration,
    /// Pause between typing and the final submit.
    pub pre_submit: Duration,
    /// Pause after submit, letting the send register before the next task.
    pub post_submit: Duration,
}

impl Default for SendPacing {
    fn default() -> Self {
        Self {
            session_settle: Duration::from_secs(6),
            ready_timeout: Duration::from_secs(20),
            focus_settle: Duration::from_secs(2),
            pre_submit: Duration::from_secs(1),
            post_submit: Duration::from_secs(3),
        }
    }
}

impl SendPacing {
    /// No waits at all — for tests and console dry runs.
    pub fn immediate() -> Self {
        Self {
            session_settle: Duration::ZERO,
            ready_timeout: Duration::ZERO,
            focus_settle: Duration::ZERO,
            pre_submit: Duration::ZERO,
            post_submit: Duration::ZERO,
        }
    }
}

/// Lifecycle state of one send task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Sending,
    Sent,
    Failed,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Pending => write!(f, "pending"),
            TaskState::Sending => write!(f, "sending"),
            TaskState::Sent => write!(f, "sent"),
            TaskState::Failed => write!(f, "failed"),
        }
    }
}

impl TaskState {
    /// Valid transitions: Pending → Sending → {Sent, Failed}. Sent and
    /// Failed are terminal.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::Pending, TaskState::Sending)
                | (TaskState::Sending, TaskState::Sent)
                | (TaskState::Sending, TaskState::Failed)
        )
    }
}

/// Drives an execution batch: composes each task's message, delivers it
/// through the injected channel, classifies the outcome, and appends it to
/// the run's outcome log before moving on.
pub struct Dispatcher {
    pacing: SendPacing,
    run_id: Uuid,
    executed_at: String,
}

impl Dispatcher {
    pub fn new(pacing: SendPacing) -> Self {
        Self {
            pacing,
            run_id: Uuid::new_v4(),
            executed_at: now_minute(),
        }
    }

    /// Identifier of this execution batch.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Process every task sequentially. Each task yields exactly one
    /// notification record, flushed to `log` the moment its outcome is
    /// determined. Returns the run's records, or an error if the channel
    /// (or the log) fails at a level no per-task handling covers.
    pub fn run<C: MessagingChannel>(
        &self,
        channel: &mut C,
        tasks: Vec<SendTask>,
        log: &mut OutcomeLog,
    ) -> Result<Vec<NotificationRecord>, DispatchError> {
        let total = tasks.len();
        let mut records = Vec::with_capacity(total);

        for (idx, task) in tasks.into_iter().enumerate() {
            let state = self.transition(TaskState::Pending, TaskState::Sending)?;
            tracing::info!(
                "[{}/{}] sending to {} (supply {})",
                idx + 1,
                total,
                task.phone,
                task.record.supply_id.as_deref().unwrap_or("S/D")
            );

            let message = compose_renewal_message(
                task.record.name.as_deref(),
                task.record.supply_id.as_deref(),
            );
            let (status, observation) = self.attempt(channel, &task.phone, &message)?;

            let terminal = match status {
                DeliveryStatus::Sent => TaskState::Sent,
                DeliveryStatus::Failed => TaskState::Failed,
            };
            self.transition(state, terminal)?;

            match status {
                DeliveryStatus::Sent => tracing::info!("message to {} sent", task.phone),
                DeliveryStatus::Failed => {
                    tracing::warn!("message to {} failed: {}", task.phone, observation)
                }
            }

            // Timestamp is stamped inside the record constructor — at
            // outcome time, not task-creation time.
            let record = NotificationRecord::new(
                task.record,
                task.phone,
                NOTIFICATION_TYPE,
                status,
                observation,
                self.executed_at.clone(),
                self.run_id,
            );
            log.append(&record)?;
            records.push(record);
        }

        Ok(records)
    }

    /// One delivery attempt. Returns the classified outcome; only a fatal
    /// channel error escapes as `Err`.
    fn attempt<C: MessagingChannel>(
        &self,
        channel: &mut C,
        phone: &str,
        message: &str,
    ) -> Result<(DeliveryStatus, String), DispatchError> {
        let mut session = match channel.open_session(phone) {
            Ok(session) => session,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                return Ok((
                    DeliveryStatus::Failed,
                    format!("session never opened correctly: {e}"),
                ))
            }
        };

        pause(self.pacing.session_settle);

        match session.wait_for_input_ready(self.pacing.ready_timeout) {
            Ok(true) => {}
            Ok(false) => {
                let detail = format!(
                    "input surface not ready within {}s",
                    self.pacing.ready_timeout.as_secs()
                );
                return Ok((DeliveryStatus::Failed, classify_failure(&session, &detail)));
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                return Ok((
                    DeliveryStatus::Failed,
                    classify_failure(&session, &e.to_string()),
                ))
            }
        }

        if let Err(e) = self.type_and_submit(&mut session, message) {
            if e.is_fatal() {
                return Err(e.into());
            }
            return Ok((
                DeliveryStatus::Failed,
                classify_failure(&session, &e.to_string()),
            ));
        }

        pause(self.pacing.post_submit);
        Ok((DeliveryStatus::Sent, String::new()))
    }

    /// Focus, type line by line with explicit breaks, then the single final
    /// submit.
    fn type_and_submit<S: ChatSession>(
        &self,
        session: &mut S,
        message: &str,
    ) -> Result<(), crate::channel::ChannelError> {
        session.focus_input()?;
        pause(self.pacing.focus_settle);

        for line in message.lines() {
            session.write_line(line)?;
            session.insert_line_break()?;
        }

        pause(self.pacing.pre_submit);
        session.submit()
    }

    fn transition(&self, from: TaskState, to: TaskState) -> Result<TaskState, DispatchError> {
        if !from.can_transition_to(to) {
            return Err(DispatchError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(to)
    }
}

/// Soft vs. hard failure: both record `Failed`; the observation text says
/// whether the input surface was ever seen (possible partial send) or the
/// session never opened at all.
fn classify_failure<S: ChatSession>(session: &S, detail: &str) -> String {
    if session.input_was_present() {
        format!("possible partial send: {detail}")
    } else {
        format!("session never opened correctly: {detail}")
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use tempfile::tempdir;
    use ued_roster::RosterRecord;

    /// What a scripted session should do for one task.
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Script {
        Deliver,
        NeverReady,
        FailOnOpen,
        FailOnSubmit,
        FatalOnOpen,
    }

    /// Channel test double: plays one script per opened session and records
    /// every submitted message.
    struct ScriptedChannel {
        scripts: VecDeque<Script>,
        submitted: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl ScriptedChannel {
        fn new(scripts: Vec<Script>) -> Self {
            Self {
                scripts: scripts.into(),
                submitted: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    struct ScriptedSession {
        script: Script,
        phone: String,
        lines: Vec<String>,
        submitted: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl MessagingChannel for ScriptedChannel {
        type Session = ScriptedSession;

        fn open_session(&mut self, phone: &str) -> Result<Self::Session, crate::ChannelError> {
            let script = self.scripts.pop_front().expect("script for every task");
            match script {
                Script::FailOnOpen => Err(crate::ChannelError::Interaction(
                    "chat page did not load".to_string(),
                )),
                Script::FatalOnOpen => Err(crate::ChannelError::SessionLost(
                    "browser process exited".to_string(),
                )),
                _ => Ok(ScriptedSession {
                    script,
                    phone: phone.to_string(),
                    lines: Vec::new(),
                    submitted: Rc::clone(&self.submitted),
                }),
            }
        }
    }

    impl ChatSession for ScriptedSession {
        fn wait_for_input_ready(&mut self, _timeout: Duration) -> Result<bool, crate::ChannelError> {
            Ok(self.script != Script::NeverReady)
        }

        fn focus_input(&mut self) -> Result<(), crate::ChannelError> {
            Ok(())
        }

        fn write_line(&mut self, line: &str) -> Result<(), crate::ChannelError> {
            self.lines.push(line.to_string());
            Ok(())
        }

        fn insert_line_break(&mut self) -> Result<(), crate::ChannelError> {
            Ok(())
        }

        fn submit(&mut self) -> Result<(), crate::ChannelError> {
            if self.script == Script::FailOnSubmit {
                return Err(crate::ChannelError::Interaction(
                    "send button rejected the click".to_string(),
                ));
            }
            self.submitted
                .borrow_mut()
                .push((self.phone.clone(), self.lines.join("\n")));
            Ok(())
        }

        fn input_was_present(&self) -> bool {
            // The input surface was seen in every scripted session that got
            // past readiness.
            !matches!(self.script, Script::NeverReady)
        }
    }

    fn task(supply: &str, name: &str, phone: &str) -> SendTask {
        SendTask {
            record: RosterRecord {
                supply_id: Some(supply.to_string()),
                name: Some(name.to_string()),
                contact: phone.to_string(),
                validity: Some("VENCIDA".to_string()),
                extras: serde_json::Map::new(),
            },
            phone: phone.to_string(),
        }
    }

    fn run_scripts(
        scripts: Vec<Script>,
        tasks: Vec<SendTask>,
    ) -> (
        Result<Vec<NotificationRecord>, DispatchError>,
        Vec<NotificationRecord>,
    ) {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("run.jsonl");
        let mut channel = ScriptedChannel::new(scripts);
        let mut log = OutcomeLog::open(&log_path).unwrap();

        let dispatcher = Dispatcher::new(SendPacing::immediate());
        let result = dispatcher.run(&mut channel, tasks, &mut log);
        drop(log);
        let flushed = OutcomeLog::read_all(&log_path).unwrap_or_default();
        (result, flushed)
    }

    #[test]
    fn successful_delivery_records_sent_with_empty_observation() {
        let (result, flushed) = run_scripts(
            vec![Script::Deliver, Script::Deliver],
            vec![
                task("1", "María", "5492611234567"),
                task("2", "Juan", "5492617654321"),
            ],
        );
        let records = result.unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.status, DeliveryStatus::Sent);
            assert_eq!(record.observation, "");
            // Minute-resolution stamp, set at outcome time.
            assert_eq!(record.notified_at.len(), 16);
        }
        assert_eq!(flushed, records);
    }

    #[test]
    fn submitted_message_is_the_composed_template() {
        let dir = tempdir().unwrap();
        let mut channel = ScriptedChannel::new(vec![Script::Deliver]);
        let submitted = Rc::clone(&channel.submitted);
        let mut log = OutcomeLog::open(dir.path().join("run.jsonl")).unwrap();

        Dispatcher::new(SendPacing::immediate())
            .run(&mut channel, vec![task("400123", "María", "5492611234567")], &mut log)
            .unwrap();

        let sent = submitted.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "5492611234567");
        assert_eq!(
            sent[0].1,
            compose_renewal_message(Some("María"), Some("400123"))
        );
    }

    #[test]
    fn failure_does_not_block_subsequent_tasks() {
        let (result, _) = run_scripts(
            vec![Script::FailOnSubmit, Script::Deliver],
            vec![
                task("1", "María", "5492611234567"),
                task("2", "Juan", "5492617654321"),
            ],
        );
        let records = result.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, DeliveryStatus::Failed);
        assert_eq!(records[1].status, DeliveryStatus::Sent);
    }

    #[test]
    fn submit_failure_after_ready_is_a_soft_failure() {
        let (result, _) = run_scripts(
            vec![Script::FailOnSubmit],
            vec![task("1", "María", "5492611234567")],
        );
        let records = result.unwrap();
        assert!(records[0].observation.starts_with("possible partial send:"));
        assert!(records[0].observation.contains("send button"));
    }

    #[test]
    fn never_ready_is_a_hard_failure() {
        let (result, _) = run_scripts(
            vec![Script::NeverReady],
            vec![task("1", "María", "5492611234567")],
        );
        let records = result.unwrap();
        assert_eq!(records[0].status, DeliveryStatus::Failed);
        assert!(records[0]
            .observation
            .starts_with("session never opened correctly:"));
        assert!(records[0].observation.contains("not ready within"));
    }

    #[test]
    fn open_failure_is_a_hard_failure() {
        let (result, _) = run_scripts(
            vec![Script::FailOnOpen],
            vec![task("1", "María", "5492611234567")],
        );
        let records = result.unwrap();
        assert_eq!(records[0].status, DeliveryStatus::Failed);
        assert!(records[0]
            .observation
            .starts_with("session never opened correctly:"));
    }

    #[test]
    fn fatal_channel_failure_aborts_but_keeps_flushed_outcomes() {
        let (result, flushed) = run_scripts(
            vec![Script::Deliver, Script::FatalOnOpen, Script::Deliver],
            vec![
                task("1", "María", "5492611234567"),
                task("2", "Juan", "5492617654321"),
                task("3", "Ana", "5492619999999"),
            ],
        );
        assert!(matches!(result, Err(DispatchError::Channel(_))));
        // The first task's outcome was flushed before the abort.
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].status, DeliveryStatus::Sent);
        assert_eq!(flushed[0].roster.supply_id.as_deref(), Some("1"));
    }

    #[test]
    fn every_task_yields_exactly_one_terminal_record() {
        let (result, flushed) = run_scripts(
            vec![
                Script::Deliver,
                Script::NeverReady,
                Script::FailOnOpen,
                Script::FailOnSubmit,
                Script::Deliver,
            ],
            vec![
                task("1", "A", "5492610000001"),
                task("2", "B", "5492610000002"),
                task("3", "C", "5492610000003"),
                task("4", "D", "5492610000004"),
                task("5", "E", "5492610000005"),
            ],
        );
        let records = result.unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(flushed.len(), 5);
        for record in &records {
            assert!(matches!(
                record.status,
                DeliveryStatus::Sent | DeliveryStatus::Failed
            ));
        }
    }

    #[test]
    fn all_records_share_the_run_id_and_execution_stamp() {
        let (result, _) = run_scripts(
            vec![Script::Deliver, Script::Deliver],
            vec![
                task("1", "María", "5492611234567"),
                task("2", "Juan", "5492617654321"),
            ],
        );
        let records = result.unwrap();
        assert_eq!(records[0].run_id, records[1].run_id);
        assert!(records[0].run_id.is_some());
        assert_eq!(records[0].executed_at, records[1].executed_at);
    }

    #[test]
    fn task_state_transitions() {
        assert!(TaskState::Pending.can_transition_to(TaskState::Sending));
        assert!(TaskState::Sending.can_transition_to(TaskState::Sent));
        assert!(TaskState::Sending.can_transition_to(TaskState::Failed));

        // Terminal states and shortcuts are rejected.
        assert!(!TaskState::Pending.can_transition_to(TaskState::Sent));
        assert!(!TaskState::Sent.can_transition_to(TaskState::Sending));
        assert!(!TaskState::Failed.can_transition_to(TaskState::Sending));
        assert!(!TaskState::Sent.can_transition_to(TaskState::Failed));
    }
}
