use std::collections::HashSet;
use std::io::{BufRead, Write};

use clockify::models::TimeEntry;

/// What the user picked from a selector prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Picked {
    Item(usize),
    /// Free text routed onto the trailing "[Enter a new ...]" /
    /// "[Create a new ...]" row.
    Text(String),
}

/// Present `items` 1-indexed and read a validated selection. Bad input
/// re-prompts with a diagnostic and never consumes the item list; EOF means
/// the selection was cancelled. An empty line or the literal `none`
/// auto-selects the item marked as current, when one is present. Input
/// longer than five characters that is not a number is taken as free text
/// for the trailing "new item" row, when the list ends with one.
pub fn select_index<R, W>(
    input: &mut R,
    out: &mut W,
    items: &[String],
    prompt: &str,
    current: Option<&str>,
) -> std::io::Result<Option<Picked>>
where
    R: BufRead,
    W: Write,
{
    if items.is_empty() {
        writeln!(out, "No items to select from.")?;
        return Ok(None);
    }
    if items.len() == 1 {
        writeln!(out, "Auto-selected: {}", items[0])?;
        return Ok(Some(Picked::Item(0)));
    }

    writeln!(out, "\n{}:\n", prompt)?;
    for (i, item) in items.iter().enumerate() {
        let marker = if current == Some(item.as_str()) {
            " (current)"
        } else {
            ""
        };
        writeln!(out, "{:2}. {}{}", i + 1, item, marker)?;
    }
    writeln!(out)?;

    loop {
        write!(out, "Select an item (1-{}): ", items.len())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out, "\nSelection cancelled.")?;
            return Ok(None);
        }
        let line = line.trim();

        if line.is_empty() || (line.eq_ignore_ascii_case("none") && current.is_some()) {
            if let Some(current) = current {
                if let Some(index) = items.iter().position(|item| item == current) {
                    writeln!(out, "Auto-selecting current: {}", current)?;
                    return Ok(Some(Picked::Item(index)));
                }
                if !line.is_empty() {
                    writeln!(out, "Current item '{}' not found in list.", current)?;
                }
            }
            continue;
        }

        match line.parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(Picked::Item(n - 1))),
            Ok(_) => writeln!(
                out,
                "Invalid selection. Please enter a number between 1 and {}.",
                items.len()
            )?,
            Err(_) => {
                if line.len() > 5 && ends_with_new_item_row(items) {
                    writeln!(out, "Auto-selecting: {}", items[items.len() - 1])?;
                    writeln!(out, "Using: {}", line)?;
                    return Ok(Some(Picked::Text(line.to_string())));
                }
                writeln!(out, "Please enter a valid number.")?;
            }
        }
    }
}

fn ends_with_new_item_row(items: &[String]) -> bool {
    items.last().is_some_and(|last| {
        let last = last.to_lowercase();
        last.starts_with("[enter a new") || last.starts_with("[create a new")
    })
}

/// Read a free-text line, e.g. a new description. Empty input or EOF means
/// cancelled.
pub fn read_line<R, W>(input: &mut R, out: &mut W, prompt: &str) -> std::io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{}", prompt)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}

/// Distinct descriptions used on `project_id` within the given history
/// window, ordered by each description's oldest occurrence, oldest first.
/// The service returns entries most-recent-first, so the scan runs from
/// the back. Repeated occurrences keep the slot of the older one.
pub fn description_history(entries: &[TimeEntry], project_id: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    for entry in entries.iter().rev() {
        if entry.project_id.as_deref() != Some(project_id) {
            continue;
        }
        let description = entry.description.trim();
        if description.is_empty() {
            continue;
        }
        if seen.insert(description.to_string()) {
            ordered.push(description.to_string());
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;
    use std::io::Cursor;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_out_of_range_and_non_numeric_then_accepts() {
        let mut input = Cursor::new("0\n4\nabc\n2\n");
        let mut out = Vec::new();
        let selected = select_index(
            &mut input,
            &mut out,
            &items(&["one", "two", "three"]),
            "Pick",
            None,
        )
        .unwrap();

        assert_eq!(selected, Some(Picked::Item(1)));
        let rendered = String::from_utf8(out).unwrap();
        assert_eq!(
            rendered
                .matches("Invalid selection. Please enter a number between 1 and 3.")
                .count(),
            2
        );
        assert_eq!(rendered.matches("Please enter a valid number.").count(), 1);
    }

    #[test]
    fn empty_line_auto_selects_current() {
        let mut input = Cursor::new("\n");
        let mut out = Vec::new();
        let selected = select_index(
            &mut input,
            &mut out,
            &items(&["one", "two", "three"]),
            "Pick",
            Some("three"),
        )
        .unwrap();
        assert_eq!(selected, Some(Picked::Item(2)));
    }

    #[test]
    fn literal_none_selects_current() {
        let mut input = Cursor::new("none\n");
        let mut out = Vec::new();
        let selected = select_index(
            &mut input,
            &mut out,
            &items(&["one", "two", "three"]),
            "Pick",
            Some("two"),
        )
        .unwrap();
        assert_eq!(selected, Some(Picked::Item(1)));
    }

    #[test]
    fn long_free_text_routes_to_trailing_new_item_row() {
        let mut input = Cursor::new("write the report\n");
        let mut out = Vec::new();
        let selected = select_index(
            &mut input,
            &mut out,
            &items(&["one", "two", "[Enter a new description]"]),
            "Pick",
            None,
        )
        .unwrap();
        assert_eq!(selected, Some(Picked::Text("write the report".to_string())));
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("Auto-selecting: [Enter a new description]"));
    }

    #[test]
    fn long_free_text_without_trailing_row_reprompts() {
        let mut input = Cursor::new("write the report\n2\n");
        let mut out = Vec::new();
        let selected =
            select_index(&mut input, &mut out, &items(&["one", "two"]), "Pick", None).unwrap();
        assert_eq!(selected, Some(Picked::Item(1)));
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("Please enter a valid number."));
    }

    #[test]
    fn eof_cancels() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        let selected =
            select_index(&mut input, &mut out, &items(&["one", "two"]), "Pick", None).unwrap();
        assert_eq!(selected, None);
    }

    #[test]
    fn single_item_is_auto_selected() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        let selected = select_index(&mut input, &mut out, &items(&["only"]), "Pick", None).unwrap();
        assert_eq!(selected, Some(Picked::Item(0)));
    }

    #[test]
    fn current_item_is_marked() {
        let mut input = Cursor::new("1\n");
        let mut out = Vec::new();
        select_index(
            &mut input,
            &mut out,
            &items(&["one", "two"]),
            "Pick",
            Some("two"),
        )
        .unwrap();
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("two (current)"));
    }

    #[test]
    fn history_orders_by_oldest_occurrence() {
        // Newest-first: A (t3), B (t2), A (t1). A's oldest use is t1,
        // B's is t2, so the output is ["A", "B"].
        let entries = vec![
            entry("e3", Some("P"), "A", false),
            entry("e2", Some("P"), "B", false),
            entry("e1", Some("P"), "A", false),
        ];
        assert_eq!(description_history(&entries, "P"), vec!["A", "B"]);
    }

    #[test]
    fn history_keeps_one_slot_per_description() {
        let entries = vec![
            entry("e3", Some("P"), "B", false),
            entry("e2", Some("P"), "A", false),
            entry("e1", Some("P"), "B", false),
        ];
        assert_eq!(description_history(&entries, "P"), vec!["B", "A"]);
    }

    #[test]
    fn history_skips_foreign_projects_and_blank_descriptions() {
        let entries = vec![
            entry("e4", Some("P"), "  ", false),
            entry("e3", Some("Q"), "other project", false),
            entry("e2", Some("P"), "fix tests", false),
            entry("e1", None, "no project", false),
        ];
        assert_eq!(description_history(&entries, "P"), vec!["fix tests"]);
    }
}
