use super::change::Change;
use crate::model::{Activity, Connection};

/// Connects a source port to a target, displacing whatever the port was
/// connected to before.
///
/// The detach scan runs across all target kinds even though at most one
/// outgoing connection should exist, so an inconsistent model is repaired
/// rather than made worse. The displaced connections are captured in order
/// and re-established on revert.
#[derive(Debug)]
pub struct AddLink {
    connection: Connection,
    displaced: Vec<Connection>,
}

impl AddLink {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            displaced: Vec::new(),
        }
    }
}

impl Change for AddLink {
    fn apply(&mut self, activity: &mut Activity) {
        self.displaced = activity.detach_all_from(&self.connection.source);
        activity.connect(self.connection.clone());
    }

    fn revert(&mut self, activity: &mut Activity) {
        activity.disconnect(&self.connection);
        for connection in self.displaced.drain(..) {
            activity.connect(connection);
        }
    }
}

/// Detaches one live connection; revert re-establishes the same record.
#[derive(Debug)]
pub struct RemoveLink {
    connection: Connection,
}

impl RemoveLink {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

impl Change for RemoveLink {
    fn apply(&mut self, activity: &mut Activity) {
        activity.disconnect(&self.connection);
    }

    fn revert(&mut self, activity: &mut Activity) {
        activity.connect(self.connection.clone());
    }
}
