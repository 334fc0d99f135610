//! # Navigator Module
//!
//! Cursor over the ordered groups during review. Movement past either
//! end is a no-op.

use crate::core::model::Group;

/// Current position in the group sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewNavigator {
    index: usize,
    group_count: usize,
}

impl ReviewNavigator {
    pub fn new(group_count: usize) -> Self {
        Self {
            index: 0,
            group_count,
        }
    }

    /// Move forward; returns whether the index changed
    pub fn next(&mut self) -> bool {
        if self.index + 1 >= self.group_count {
            return false;
        }
        self.index += 1;
        true
    }

    /// Move back; returns whether the index changed
    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Group under the cursor, `None` when there are no groups
    pub fn current<'a>(&self, groups: &'a [Group]) -> Option<&'a Group> {
        groups.get(self.index)
    }

    /// "Group 3 / 15 (4 photos)"
    pub fn position_label(&self, groups: &[Group]) -> Option<String> {
        self.current(groups).map(|group| {
            format!(
                "Group {} / {} ({} photos)",
                self.index + 1,
                groups.len(),
                group.len()
            )
        })
    }
}
