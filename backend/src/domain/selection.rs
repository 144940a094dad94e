//! Checklist selection of expenses and the running total of the selected ones.

use std::collections::HashSet;

use crate::domain::models::expense::Expense;
use crate::domain::payment_progress::finite_or_zero;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn deselect(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Flip a single id. Returns true if it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// True when the list is non-empty and every expense in it is selected.
    pub fn all_selected(&self, visible: &[Expense]) -> bool {
        !visible.is_empty() && visible.iter().all(|e| self.ids.contains(&e.id))
    }

    pub fn selected_count(&self, visible: &[Expense]) -> usize {
        visible.iter().filter(|e| self.ids.contains(&e.id)).count()
    }

    /// Select-all checkbox over `visible`: if every visible expense is already
    /// selected they are all removed, otherwise they are all added. Ids outside
    /// `visible` are left as they are.
    pub fn toggle_all(&self, visible: &[Expense]) -> Selection {
        let mut next = self.clone();
        let every_visible_selected = visible.iter().all(|e| self.ids.contains(&e.id));
        for expense in visible {
            if every_visible_selected {
                next.ids.remove(&expense.id);
            } else {
                next.ids.insert(expense.id.clone());
            }
        }
        next
    }

    /// Sum of `amount` over selected expenses. Ids with no matching expense
    /// add nothing.
    pub fn selected_total(&self, expenses: &[Expense]) -> f64 {
        expenses
            .iter()
            .filter(|e| self.ids.contains(&e.id))
            .map(|e| finite_or_zero(e.amount()))
            .sum()
    }

    /// Selected ids that do not match any expense in `expenses`.
    pub fn unmatched_ids(&self, expenses: &[Expense]) -> Vec<String> {
        let present: HashSet<&str> = expenses.iter().map(|e| e.id.as_str()).collect();
        let mut unmatched: Vec<String> = self
            .ids
            .iter()
            .filter(|id| !present.contains(id.as_str()))
            .cloned()
            .collect();
        unmatched.sort();
        unmatched
    }

    /// Drop ids that are not in the active list. Returns the dropped ids.
    pub fn retain_present(&mut self, expenses: &[Expense]) -> Vec<String> {
        let dropped = self.unmatched_ids(expenses);
        for id in &dropped {
            self.ids.remove(id);
        }
        dropped
    }
}

impl FromIterator<String> for Selection {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
