//! Async driver for [`SelectionTracker`]
//!
//! A session owns the working configuration and the tracker. It sleeps until
//! the next debounce deadline, runs due fetches as tasks against a
//! [`PreviewBackend`], and feeds completions back into the tracker. Results
//! are reported as [`SessionEvent`]s on an unbounded channel.

use super::{DebounceSettings, FetchRequest, SelectionTracker, TrackerEvent};
use crate::config::Configuration;
use crate::error::{Result, ScaffoldError};
use crate::plan::{Ecosystem, PackageReference};
use crate::preview::{DependencyProposal, PreviewService, PreviewedFile};
use crate::tree::TreeNode;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error};

/// Where a session gets trees, file previews and dependency decisions from
pub trait PreviewBackend: Send + Sync + 'static {
    fn fetch_tree(&self, config: Configuration) -> impl Future<Output = Result<Vec<TreeNode>>> + Send;

    fn fetch_file(
        &self,
        config: Configuration,
        path: String,
    ) -> impl Future<Output = Result<Option<PreviewedFile>>> + Send;

    fn submit_dependency(
        &self,
        config: Configuration,
        ecosystem: Ecosystem,
        reference: PackageReference,
    ) -> impl Future<Output = Result<DependencyProposal>> + Send;
}

/// Composition and rendering are CPU-bound, so they run on the blocking pool
async fn on_blocking_pool<T, F>(service: PreviewService, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&PreviewService) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&service))
        .await
        .map_err(|e| ScaffoldError::BackgroundTask {
            reason: e.to_string(),
        })?
}

impl PreviewBackend for PreviewService {
    fn fetch_tree(&self, config: Configuration) -> impl Future<Output = Result<Vec<TreeNode>>> + Send {
        on_blocking_pool(self.clone(), move |service| service.preview_tree(&config))
    }

    fn fetch_file(
        &self,
        config: Configuration,
        path: String,
    ) -> impl Future<Output = Result<Option<PreviewedFile>>> + Send {
        on_blocking_pool(self.clone(), move |service| service.preview_file(&config, &path))
    }

    fn submit_dependency(
        &self,
        config: Configuration,
        ecosystem: Ecosystem,
        reference: PackageReference,
    ) -> impl Future<Output = Result<DependencyProposal>> + Send {
        on_blocking_pool(self.clone(), move |service| {
            service.propose_dependency(&config, ecosystem, reference)
        })
    }
}

/// User actions fed into a session
#[derive(Debug, Clone)]
pub enum SessionCommand {
    Edit(Configuration),
    Select(TreeNode),
    AddDependency {
        ecosystem: Ecosystem,
        reference: PackageReference,
    },
}

/// What the display should change
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    TreeUpdated(Vec<TreeNode>),
    SelectionMoved { from: String, to: String },
    SelectionCleared { previous: String },
    ContentShown(PreviewedFile),
    ContentCleared,
    DependencyAccepted { ecosystem: Ecosystem, name: String },
    DependencyRejected { warning: String },
    /// A fetch failed; the message is safe to show to the user
    Failed { message: String },
}

enum Completion {
    Tree {
        seq: u64,
        result: Result<Vec<TreeNode>>,
    },
    Preview {
        seq: u64,
        result: Result<Option<PreviewedFile>>,
    },
}

/// Sends commands to a running session. Dropping every handle ends the session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    /// Returns false once the session has stopped
    pub fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn edit(&self, config: Configuration) -> bool {
        self.send(SessionCommand::Edit(config))
    }

    pub fn select(&self, node: TreeNode) -> bool {
        self.send(SessionCommand::Select(node))
    }

    pub fn add_dependency(&self, ecosystem: Ecosystem, reference: PackageReference) -> bool {
        self.send(SessionCommand::AddDependency {
            ecosystem,
            reference,
        })
    }
}

pub struct PreviewSession<B> {
    backend: Arc<B>,
    config: Configuration,
    tracker: SelectionTracker,
    events: mpsc::UnboundedSender<SessionEvent>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl<B: PreviewBackend> PreviewSession<B> {
    /// Start a session on the current runtime. The first tree fetch is
    /// scheduled immediately, subject to the tree debounce.
    pub fn spawn(
        backend: Arc<B>,
        config: Configuration,
        debounce: DebounceSettings,
    ) -> (
        SessionHandle,
        mpsc::UnboundedReceiver<SessionEvent>,
        JoinHandle<()>,
    ) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        let mut tracker = SelectionTracker::new(debounce);
        tracker.config_changed(Instant::now());

        let session = Self {
            backend,
            config,
            tracker,
            events: event_tx,
            completions: completion_tx,
        };
        let task = tokio::spawn(session.run(command_rx, completion_rx));
        (
            SessionHandle {
                commands: command_tx,
            },
            event_rx,
            task,
        )
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        loop {
            let deadline = self.tracker.next_deadline();
            let idle = Instant::now() + Duration::from_secs(3600);
            let sleep = tokio::time::sleep_until(deadline.unwrap_or(idle));

            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                Some(done) = completions.recv() => self.handle_completion(done),
                _ = sleep, if deadline.is_some() => self.dispatch_due(),
            }
        }
        debug!("Preview session stopped");
    }

    fn emit(&self, event: SessionEvent) {
        // The receiver going away is not an error for the session
        let _ = self.events.send(event);
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        let now = Instant::now();
        match command {
            SessionCommand::Edit(config) => {
                self.config = config;
                self.tracker.config_changed(now);
            }
            SessionCommand::Select(node) => {
                self.tracker.select(&node, now);
            }
            SessionCommand::AddDependency {
                ecosystem,
                reference,
            } => {
                let name = reference.name.clone();
                let decision = self
                    .backend
                    .submit_dependency(self.config.clone(), ecosystem, reference)
                    .await;
                match decision {
                    Ok(DependencyProposal::Accepted(config)) => {
                        self.config = config;
                        self.tracker.config_changed(Instant::now());
                        self.emit(SessionEvent::DependencyAccepted { ecosystem, name });
                    }
                    Ok(DependencyProposal::Rejected { warning }) => {
                        self.emit(SessionEvent::DependencyRejected { warning });
                    }
                    Err(e) => {
                        error!(error = %e, "Dependency check failed");
                        self.emit(SessionEvent::Failed {
                            message: e.user_message().to_string(),
                        });
                    }
                }
            }
        }
    }

    fn dispatch_due(&mut self) {
        for request in self.tracker.poll(Instant::now()) {
            let backend = Arc::clone(&self.backend);
            let config = self.config.clone();
            let done = self.completions.clone();
            match request {
                FetchRequest::Tree { seq } => {
                    debug!(seq, "Fetching tree");
                    tokio::spawn(async move {
                        let result = backend.fetch_tree(config).await;
                        let _ = done.send(Completion::Tree { seq, result });
                    });
                }
                FetchRequest::Preview { seq, path } => {
                    debug!(seq, %path, "Fetching preview");
                    tokio::spawn(async move {
                        let result = backend.fetch_file(config, path).await;
                        let _ = done.send(Completion::Preview { seq, result });
                    });
                }
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        let (seq, outcome) = match completion {
            Completion::Tree { seq, result } => (
                seq,
                result.map(|tree| self.tracker.tree_delivered(seq, tree, Instant::now())),
            ),
            Completion::Preview { seq, result } => (
                seq,
                result.map(|file| self.tracker.preview_delivered(seq, file)),
            ),
        };

        match outcome {
            Ok(events) => {
                for event in events {
                    self.forward(event);
                }
            }
            Err(e) => {
                if self.tracker.fetch_failed(seq) {
                    error!(seq, error = %e, "Preview fetch failed");
                    self.emit(SessionEvent::Failed {
                        message: e.user_message().to_string(),
                    });
                } else {
                    debug!(seq, "Ignoring failure of superseded fetch");
                }
            }
        }
    }

    fn forward(&self, event: TrackerEvent) {
        let event = match event {
            TrackerEvent::TreeReplaced => SessionEvent::TreeUpdated(self.tracker.tree().to_vec()),
            TrackerEvent::SelectionMoved { from, to } => SessionEvent::SelectionMoved { from, to },
            TrackerEvent::SelectionCleared { previous } => SessionEvent::SelectionCleared { previous },
            TrackerEvent::ContentShown { .. } => match self.tracker.content() {
                Some(file) => SessionEvent::ContentShown(file.clone()),
                None => return,
            },
            TrackerEvent::ContentCleared => SessionEvent::ContentCleared,
            TrackerEvent::SelectionKept { .. } | TrackerEvent::Discarded { .. } => return,
        };
        self.emit(event);
    }
}
