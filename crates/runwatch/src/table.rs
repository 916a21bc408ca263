use runwatch_core::Row;

pub struct TableFormatter {
    name_width: usize,
    type_width: usize,
    status_width: usize,
    ready_width: usize,
    tags_width: usize,
    description_width: usize,
}

impl TableFormatter {
    pub fn new(rows: &[Row]) -> Self {
        let name_width = rows
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(16)
            .clamp(4, 40);

        let type_width = rows
            .iter()
            .map(|r| r.resource_type.chars().count())
            .max()
            .unwrap_or(4)
            .clamp(4, 20);

        Self {
            name_width,
            type_width,
            status_width: 9,
            ready_width: 5,
            tags_width: 24,
            description_width: 36,
        }
    }

    pub fn print_table(&self, rows: &[Row]) {
        for line in self.render(rows) {
            println!("{}", line);
        }
    }

    fn render(&self, rows: &[Row]) -> Vec<String> {
        let mut lines = Vec::with_capacity(rows.len() + 4);
        lines.push(self.border('┌', '┬', '┐'));
        lines.push(self.line([
            "Name",
            "Type",
            "Status",
            "Ready",
            "Tags",
            "Description",
        ]));
        lines.push(self.border('├', '┼', '┤'));
        for row in rows {
            let tags = row.tags.join(", ");
            let ready = if row.is_ready() { "yes" } else { "no" };
            lines.push(self.line([
                &row.name,
                &row.resource_type,
                &row.status,
                ready,
                &tags,
                &row.description,
            ]));
        }
        lines.push(self.border('└', '┴', '┘'));
        lines
    }

    fn widths(&self) -> [usize; 6] {
        [
            self.name_width,
            self.type_width,
            self.status_width,
            self.ready_width,
            self.tags_width,
            self.description_width,
        ]
    }

    fn line(&self, cells: [&str; 6]) -> String {
        let body: Vec<String> = cells
            .iter()
            .zip(self.widths())
            .map(|(cell, width)| truncate(cell, width))
            .collect();
        format!("│ {} │", body.join(" │ "))
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self.widths().iter().map(|w| "─".repeat(w + 2)).collect();
        let separator = middle.to_string();
        format!("{left}{}{right}", segments.join(separator.as_str()))
    }
}

/// Pad or cut `s` to exactly `max_len` characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        // Cut at character boundaries, not byte boundaries
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
