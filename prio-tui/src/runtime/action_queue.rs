use crate::app::SubmitRequest;
use crate::types::ProjectId;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Action {
    Refresh,
    SaveProject(SubmitRequest),
    DeleteProject(ProjectId),
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
