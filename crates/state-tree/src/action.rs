use state_tree_path::Path;

use crate::value::StateValue;

/// A mutation command. Batches may nest.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `value: None` is the absent marker and behaves as [`Action::Delete`].
    Set { path: Path, value: Option<StateValue> },
    Delete { path: Path },
    Batch { actions: Vec<Action> },
}

impl Action {
    pub fn set(path: Path, value: impl Into<StateValue>) -> Self {
        Action::Set {
            path,
            value: Some(value.into()),
        }
    }

    pub fn delete(path: Path) -> Self {
        Action::Delete { path }
    }

    pub fn batch(actions: Vec<Action>) -> Self {
        Action::Batch { actions }
    }

    /// Every path named by this action, nested batches flattened, in order.
    /// Duplicates are kept.
    pub fn touched_paths(&self) -> Vec<Path> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths(&self, out: &mut Vec<Path>) {
        match self {
            Action::Set { path, .. } | Action::Delete { path } => out.push(path.clone()),
            Action::Batch { actions } => {
                for action in actions {
                    action.collect_paths(out);
                }
            }
        }
    }
}
