use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sentinel category for tasks that belong to no configured category.
/// Such tasks still render at task level; they are dropped from
/// category-level views only.
pub const NO_CATEGORY: &str = "";

/// One configured category: a display name, a base hex color and an
/// ordered list of member tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    pub color: String,
    pub tasks: Vec<String>,
}

/// Read-only lookup structure built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    task_to_category: HashMap<String, String>,
    ordinals: HashMap<String, usize>,
    categories: Vec<String>,
    display_order: Vec<String>,
}

impl CategoryIndex {
    /// `task_order` is the explicit display-order list from configuration;
    /// when empty, the flattened category lists in configuration order are
    /// used instead. The known-task vocabulary is the union of both, so a
    /// task listed in only one of the two tables is tolerated.
    pub fn new(categories: &[CategoryDefinition], task_order: &[String]) -> Self {
        let mut task_to_category = HashMap::new();
        let mut ordinals = HashMap::new();
        let mut names = Vec::with_capacity(categories.len());
        let mut flattened = Vec::new();

        for (ordinal, category) in categories.iter().enumerate() {
            names.push(category.name.clone());
            ordinals.insert(category.name.clone(), ordinal);
            for task in &category.tasks {
                if let Some(existing) =
                    task_to_category.insert(task.clone(), category.name.clone())
                {
                    // Canonical config assigns each task to one category;
                    // sheet-maintained configs occasionally violate that.
                    // First definition wins.
                    tracing::debug!(
                        "task '{}' assigned to more than one category, keeping '{}'",
                        task,
                        existing
                    );
                    task_to_category.insert(task.clone(), existing);
                }
                if !flattened.contains(task) {
                    flattened.push(task.clone());
                }
            }
        }

        let display_order: Vec<String> = if task_order.is_empty() {
            flattened
        } else {
            let mut order = task_order.to_vec();
            for task in flattened {
                if !order.contains(&task) {
                    order.push(task);
                }
            }
            order
        };

        Self {
            task_to_category,
            ordinals,
            categories: names,
            display_order,
        }
    }

    /// Category of a task, or the empty `NO_CATEGORY` sentinel.
    pub fn category_of(&self, task: &str) -> &str {
        self.task_to_category
            .get(task)
            .map(String::as_str)
            .unwrap_or(NO_CATEGORY)
    }

    pub fn is_known_task(&self, task: &str) -> bool {
        self.display_order.iter().any(|t| t == task)
    }

    pub fn ordinal(&self, category: &str) -> Option<usize> {
        self.ordinals.get(category).copied()
    }

    /// Category names in configuration order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Fixed task display order.
    pub fn display_order(&self) -> &[String] {
        &self.display_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> Vec<CategoryDefinition> {
        vec![
            CategoryDefinition {
                name: "Business Development".to_string(),
                color: "#1a73e8".to_string(),
                tasks: vec!["BD - Research".to_string(), "BD - Outreach".to_string()],
            },
            CategoryDefinition {
                name: "Operations".to_string(),
                color: "#34a853".to_string(),
                tasks: vec!["Payroll".to_string()],
            },
        ]
    }

    #[test]
    fn looks_up_task_category() {
        let index = CategoryIndex::new(&definitions(), &[]);
        assert_eq!(index.category_of("BD - Research"), "Business Development");
        assert_eq!(index.category_of("Payroll"), "Operations");
    }

    #[test]
    fn unknown_task_maps_to_no_category() {
        let index = CategoryIndex::new(&definitions(), &[]);
        assert_eq!(index.category_of("Mystery"), NO_CATEGORY);
    }

    #[test]
    fn display_order_flattens_category_lists() {
        let index = CategoryIndex::new(&definitions(), &[]);
        assert_eq!(
            index.display_order(),
            ["BD - Research", "BD - Outreach", "Payroll"]
        );
    }

    #[test]
    fn explicit_task_order_wins_and_absorbs_stragglers() {
        let order = vec!["Payroll".to_string(), "BD - Outreach".to_string()];
        let index = CategoryIndex::new(&definitions(), &order);
        assert_eq!(
            index.display_order(),
            ["Payroll", "BD - Outreach", "BD - Research"]
        );
        assert!(index.is_known_task("BD - Research"));
    }

    #[test]
    fn ordinals_follow_configuration_order() {
        let index = CategoryIndex::new(&definitions(), &[]);
        assert_eq!(index.ordinal("Business Development"), Some(0));
        assert_eq!(index.ordinal("Operations"), Some(1));
        assert_eq!(index.ordinal("Nope"), None);
    }

    #[test]
    fn first_category_wins_on_duplicate_assignment() {
        let mut defs = definitions();
        defs[1].tasks.push("BD - Research".to_string());
        let index = CategoryIndex::new(&defs, &[]);
        assert_eq!(index.category_of("BD - Research"), "Business Development");
    }
}
