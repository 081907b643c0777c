//! Job registry actor: one thread owns every job; everything else talks to it over a channel.

use crossbeam_channel::{Sender, bounded, unbounded};
use log::debug;
use std::thread::{self, JoinHandle};

use crate::{Error, JobId, JobSnapshot, JobStatus, Result};

struct Job {
    id: JobId,
    name: String,
    count: u64,
    done: bool,
}

impl Job {
    fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id,
            name: self.name.clone(),
            count: self.count,
            status: if self.done {
                JobStatus::Idle
            } else {
                JobStatus::Indexing
            },
        }
    }
}

enum Request {
    Add {
        id: JobId,
        name: String,
        reply: Sender<Result<()>>,
    },
    Lookup {
        id: JobId,
        reply: Sender<Option<JobSnapshot>>,
    },
    List {
        reply: Sender<Vec<JobSnapshot>>,
    },
    Processed(JobId),
    Finished(JobId),
}

/// Jobs in registration order. Only the actor thread touches this.
#[derive(Default)]
struct Registry {
    jobs: Vec<Job>,
}

impl Registry {
    fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.id == id)
    }

    fn handle(&mut self, req: Request) {
        match req {
            Request::Add { id, name, reply } => {
                let out = if self.jobs.iter().any(|j| j.id == id) {
                    Err(Error::bad_parameter(format!(
                        "{name:?} is already indexed (job {id})"
                    )))
                } else {
                    debug!("registered job {id} ({name})");
                    self.jobs.push(Job {
                        id,
                        name,
                        count: 0,
                        done: false,
                    });
                    Ok(())
                };
                let _ = reply.send(out);
            }
            Request::Lookup { id, reply } => {
                let _ = reply.send(self.jobs.iter().find(|j| j.id == id).map(Job::snapshot));
            }
            Request::List { reply } => {
                let _ = reply.send(self.jobs.iter().map(Job::snapshot).collect());
            }
            Request::Processed(id) => {
                if let Some(job) = self.get_mut(id) {
                    job.count += 1;
                }
            }
            Request::Finished(id) => {
                if let Some(job) = self.get_mut(id)
                    && !job.done
                {
                    job.done = true;
                    debug!("job {id} finished with {} files", job.count);
                }
            }
        }
    }
}

/// Cheap, cloneable handle to the registry actor. Every call fails with [`Error::Closed`]
/// once the actor has exited.
#[derive(Clone)]
pub struct RegistryHandle {
    tx: Sender<Request>,
}

impl RegistryHandle {
    fn call<T>(&self, make: impl FnOnce(Sender<T>) -> Request) -> Result<T> {
        let (reply_tx, reply_rx) = bounded(1);
        self.tx.send(make(reply_tx)).map_err(|_| Error::Closed)?;
        reply_rx.recv().map_err(|_| Error::Closed)
    }

    /// Register a job. A second registration of the same id is BadParameter.
    pub fn add(&self, id: JobId, name: String) -> Result<()> {
        self.call(|reply| Request::Add { id, name, reply })?
    }

    pub fn lookup(&self, id: JobId) -> Result<Option<JobSnapshot>> {
        self.call(|reply| Request::Lookup { id, reply })
    }

    pub fn list(&self) -> Result<Vec<JobSnapshot>> {
        self.call(|reply| Request::List { reply })
    }

    /// One more file persisted for `id`.
    pub fn processed(&self, id: JobId) -> Result<()> {
        self.tx
            .send(Request::Processed(id))
            .map_err(|_| Error::Closed)
    }

    /// The walk for `id` is over; later calls are no-ops.
    pub fn finished(&self, id: JobId) -> Result<()> {
        self.tx
            .send(Request::Finished(id))
            .map_err(|_| Error::Closed)
    }
}

/// Start the actor. It runs until every [`RegistryHandle`] has been dropped.
pub fn spawn_registry() -> (RegistryHandle, JoinHandle<()>) {
    let (tx, rx) = unbounded::<Request>();
    let handle = thread::spawn(move || {
        let mut registry = Registry::default();
        while let Ok(req) = rx.recv() {
            registry.handle(req);
        }
        debug!("registry stopped");
    });
    (RegistryHandle { tx }, handle)
}
