//! Pure grouping of stale tasks by owner.

use crate::model::task::Task;
use crate::model::OwnerId;
use std::collections::HashMap;

/// Stale task descriptions of one owner, in task insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerTasks {
    pub owner: OwnerId,
    pub descriptions: Vec<String>,
}

/// Partitions `tasks` by owner.
///
/// Owners appear in order of their first task; descriptions keep the input
/// order within each owner.
pub fn group_by_owner(tasks: &[Task]) -> Vec<OwnerTasks> {
    let mut groups: Vec<OwnerTasks> = Vec::new();
    let mut index_by_owner: HashMap<OwnerId, usize> = HashMap::new();

    for task in tasks {
        let index = *index_by_owner.entry(task.owner).or_insert_with(|| {
            groups.push(OwnerTasks {
                owner: task.owner,
                descriptions: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].descriptions.push(task.description.clone());
    }

    groups
}
