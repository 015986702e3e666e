use crate::types::ClassifiedServer;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

const COLUMNS: [(&str, Align); 6] = [
    ("Name", Align::Left),
    ("Status", Align::Left),
    ("Outgoing (TB)", Align::Right),
    ("Limit (TB)", Align::Right),
    ("Usage %", Align::Right),
    ("Action", Align::Left),
];

fn row_cells(server: &ClassifiedServer) -> [String; 6] {
    let r = &server.record;
    [
        r.name.clone(),
        r.status.clone(),
        r.outgoing_tb.clone(),
        r.limit_tb.clone(),
        r.usage_percentage.clone(),
        server.tier.to_string(),
    ]
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.chars().count()));
    match align {
        Align::Left => format!("{}{}", cell, fill),
        Align::Right => format!("{}{}", fill, cell),
    }
}

fn border(widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("+{}+", segments.join("+"))
}

fn render_row(cells: &[String], widths: &[usize], header: bool) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(COLUMNS.iter())
        .zip(widths)
        .map(|((cell, (_, align)), width)| {
            let align = if header { Align::Left } else { *align };
            format!(" {} ", pad(cell, *width, align))
        })
        .collect();
    format!("|{}|", padded.join("|"))
}

/// Render the per-server usage table printed at the start of every run.
pub fn render_usage_table(servers: &[ClassifiedServer]) -> String {
    let header: Vec<String> = COLUMNS.iter().map(|(title, _)| title.to_string()).collect();
    let rows: Vec<[String; 6]> = servers.iter().map(row_cells).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = border(&widths);
    let mut lines = vec![rule.clone(), render_row(&header, &widths, true), rule.clone()];
    for row in &rows {
        lines.push(render_row(row, &widths, false));
    }
    if !rows.is_empty() {
        lines.push(rule);
    }
    lines.join("\n")
}
