//! Scripted in-memory [`ComputeApi`] for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::gcp::gce::client::ComputeApi;
use crate::gcp::gce::error::TransportError;
use crate::gcp::gce::types::*;

/// One recorded API call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Insert { zone: String, name: String },
    Delete { zone: String, name: String },
    GetOperation { operation: String },
    List { zone: String },
    GetSnapshot { project: String, snapshot: String },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    inserted: Vec<InstanceDescriptor>,
    operations: HashMap<String, VecDeque<Operation>>,
    insert_responses: VecDeque<Operation>,
    delete_responses: VecDeque<Operation>,
    instances: Option<Vec<Instance>>,
    snapshots: HashMap<(String, String), Snapshot>,
    hang_operations: bool,
    fail_list: bool,
}

/// Answers from queues filled by the test; anything unscripted is a 404/503.
#[derive(Default)]
pub(crate) struct FakeCompute {
    state: Mutex<State>,
}

fn unavailable(method: &'static str, what: &str, status: u16) -> TransportError {
    TransportError::Status {
        method,
        url: format!("fake://{}", what),
        status,
        body: format!("no scripted response for {}", what),
    }
}

impl FakeCompute {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Queues one status per future `get_operation` call for `name`.
    pub(crate) fn script_operation(&self, name: &str, statuses: &[OperationStatus]) {
        let mut st = self.state();
        let queue = st.operations.entry(name.to_string()).or_default();
        queue.extend(statuses.iter().map(|s| Operation::new(name, *s)));
    }

    /// Queues a full operation for a future `get_operation` call.
    pub(crate) fn push_operation(&self, op: Operation) {
        self.state()
            .operations
            .entry(op.name.clone())
            .or_default()
            .push_back(op);
    }

    pub(crate) fn on_insert(&self, op: Operation) {
        self.state().insert_responses.push_back(op);
    }

    pub(crate) fn on_delete(&self, op: Operation) {
        self.state().delete_responses.push_back(op);
    }

    pub(crate) fn set_instances(&self, instances: Option<Vec<Instance>>) {
        self.state().instances = instances;
    }

    pub(crate) fn fail_list(&self) {
        self.state().fail_list = true;
    }

    pub(crate) fn add_snapshot(&self, project: &str, snapshot: Snapshot) {
        self.state()
            .snapshots
            .insert((project.to_string(), snapshot.name.clone()), snapshot);
    }

    /// Makes every `get_operation` call hang forever.
    pub(crate) fn hang_operation_fetches(&self) {
        self.state().hang_operations = true;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub(crate) fn inserted(&self) -> Vec<InstanceDescriptor> {
        self.state().inserted.clone()
    }

    pub(crate) fn operation_fetches(&self, name: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::GetOperation { operation } if operation == name))
            .count()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|c| pred(c)).count()
    }
}

#[async_trait]
impl ComputeApi for FakeCompute {
    async fn insert_instance(
        &self,
        _project: &str,
        zone: &str,
        descriptor: &InstanceDescriptor,
    ) -> Result<Operation, TransportError> {
        let mut st = self.state();
        st.calls.push(Call::Insert {
            zone: zone.to_string(),
            name: descriptor.name.clone(),
        });
        st.inserted.push(descriptor.clone());
        st.insert_responses
            .pop_front()
            .ok_or_else(|| unavailable("POST", "instances", 503))
    }

    async fn delete_instance(
        &self,
        _project: &str,
        zone: &str,
        name: &str,
    ) -> Result<Operation, TransportError> {
        let mut st = self.state();
        st.calls.push(Call::Delete {
            zone: zone.to_string(),
            name: name.to_string(),
        });
        st.delete_responses
            .pop_front()
            .ok_or_else(|| unavailable("DELETE", name, 404))
    }

    async fn get_operation(
        &self,
        _project: &str,
        _zone: &str,
        operation: &str,
    ) -> Result<Operation, TransportError> {
        let next = {
            let mut st = self.state();
            st.calls.push(Call::GetOperation {
                operation: operation.to_string(),
            });
            if st.hang_operations {
                None
            } else {
                Some(
                    st.operations
                        .get_mut(operation)
                        .and_then(|q| q.pop_front())
                        .ok_or_else(|| unavailable("GET", operation, 503)),
                )
            }
        };
        match next {
            Some(res) => res,
            None => std::future::pending().await,
        }
    }

    async fn list_instances(
        &self,
        _project: &str,
        zone: &str,
    ) -> Result<Option<Vec<Instance>>, TransportError> {
        let mut st = self.state();
        st.calls.push(Call::List {
            zone: zone.to_string(),
        });
        if st.fail_list {
            return Err(unavailable("GET", "instances", 500));
        }
        Ok(st.instances.clone())
    }

    async fn get_snapshot(
        &self,
        project: &str,
        snapshot: &str,
    ) -> Result<Snapshot, TransportError> {
        let mut st = self.state();
        st.calls.push(Call::GetSnapshot {
            project: project.to_string(),
            snapshot: snapshot.to_string(),
        });
        st.snapshots
            .get(&(project.to_string(), snapshot.to_string()))
            .cloned()
            .ok_or_else(|| unavailable("GET", snapshot, 404))
    }
}
