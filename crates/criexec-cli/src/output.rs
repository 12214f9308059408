//! Formatted output helpers for CLI commands.

use criexec_common::types::ContainerInfo;

const ID_WIDTH: usize = 13;

/// Shortens a runtime id to the prefix `crictl` shows.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.get(..ID_WIDTH).unwrap_or(id)
}

/// Renders containers as a fixed-width table.
#[must_use]
pub fn container_table(containers: &[ContainerInfo]) -> String {
    let mut out = format!(
        "{:<15} {:<30} {:<10} {}\n",
        "CONTAINER ID", "NAME", "STATE", "IMAGE"
    );
    for c in containers {
        let state = c
            .state
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        out.push_str(&format!(
            "{:<15} {:<30} {:<10} {}\n",
            short_id(c.id.as_str()),
            c.name,
            state,
            c.image.as_deref().unwrap_or("-"),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use criexec_common::types::{ContainerId, ContainerState};

    use super::*;

    fn info(id: &str, name: &str, state: Option<ContainerState>) -> ContainerInfo {
        ContainerInfo {
            id: ContainerId::new(id),
            name: name.into(),
            labels: HashMap::new(),
            state,
            image: None,
            spec: None,
        }
    }

    #[test]
    fn short_id_truncates_long_ids() {
        assert_eq!(
            short_id("4f1c2b9e8a7d6c5b4a3f2e1d0c9b8a7f"),
            "4f1c2b9e8a7d6"
        );
    }

    #[test]
    fn short_id_keeps_short_ids() {
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn table_has_header_and_one_row_per_container() {
        let table = container_table(&[
            info("aaaaaaaaaaaaaaaaaaaa", "web", Some(ContainerState::Running)),
            info("b", "db", None),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("CONTAINER ID"));
        assert!(lines[1].starts_with("aaaaaaaaaaaaa "));
        assert!(lines[1].contains("running"));
        assert!(lines[2].contains("db"));
        assert!(lines[2].ends_with('-'));
    }
}
