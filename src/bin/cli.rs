use chrono::NaiveDate;
use std::io::{self, Write};
use timetable_tool::export::{save_calendar_to_ics, save_occurrences_to_csv};
use timetable_tool::mappings::{department_name, extract_department_code, DEPARTMENTS};
use timetable_tool::{
    build_comparison_grid, build_teacher_calendar, resolve_class_occurrences,
    resolve_teacher_occurrences, CalendarRequest, Snapshot, TermCalendar, WeekType,
};

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Compute column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if ci < widths.len() && cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    // Header
    out.push('|');
    for (i, name) in headers.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    // Rows
    for row in rows {
        out.push('|');
        for (ci, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <file.xml>                    Load a schedule export\n  teachers [dept]                    List teachers, optionally by department code\n  departments                        List department codes\n  show <teacher-id>                  Show a teacher's timetable\n  class <class-id>                   Show a class timetable\n  compare <ids> <day> <odd|even>     Compare teachers (ids like t1,t2; day 0=Mon)\n  weektype <YYYY-MM-DD>              Odd/even week of a date\n  export <id> <start> <end> <file>   Write a teacher's .ics (dates YYYY-MM-DD)\n  csv <teacher-id> <file.csv>        Write a teacher's timetable as CSV\n  quit|exit                          Exit"
    );
}

fn day_index(day: usize) -> &'static str {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .get(day)
        .copied()
        .unwrap_or("Unknown")
}

fn print_blocks(
    snapshot: &Snapshot,
    blocks: &[timetable_tool::OccurrenceBlock],
    with_teachers: bool,
) {
    if blocks.is_empty() {
        println!("No lessons.");
        return;
    }
    let mut headers = vec!["Day", "Time", "Subject", "Classes", "Room", "Week"];
    if with_teachers {
        headers.insert(4, "Teachers");
    }
    let rows: Vec<Vec<String>> = blocks
        .iter()
        .map(|b| {
            let mut row = vec![
                b.day_name().to_string(),
                format!(
                    "{} - {}",
                    b.start_time(&snapshot.mappings),
                    b.end_time(&snapshot.mappings)
                ),
                b.subject.clone(),
                b.classes.clone(),
                b.room.clone(),
                b.week_label().to_string(),
            ];
            if with_teachers {
                row.insert(4, b.teachers.clone());
            }
            row
        })
        .collect();
    println!("{}", render_text_table(&headers, &rows));
}

fn main() {
    let mut snapshot: Option<Snapshot> = None;
    let term = TermCalendar::default();

    println!("Timetable Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "load" => {
                let Some(path) = parts.next() else {
                    println!("Usage: load <file.xml>");
                    continue;
                };
                let xml = match std::fs::read_to_string(path) {
                    Ok(text) => text,
                    Err(e) => {
                        println!("Error reading {}: {}", path, e);
                        continue;
                    }
                };
                match Snapshot::from_xml(&xml) {
                    Ok(loaded) => {
                        println!(
                            "Loaded {} teachers, {} lessons, {} cards.",
                            loaded.document.teachers.len(),
                            loaded.document.lessons.len(),
                            loaded.document.cards.len()
                        );
                        snapshot = Some(loaded);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "teachers" => {
                let Some(snapshot) = snapshot.as_ref() else {
                    println!("No schedule loaded. Use 'load <file.xml>' first.");
                    continue;
                };
                let dept = parts.next();
                let rows: Vec<Vec<String>> = snapshot
                    .mappings
                    .teachers_sorted(dept)
                    .iter()
                    .map(|t| {
                        let dept = extract_department_code(&t.short)
                            .and_then(|c| department_name(&c).map(str::to_string))
                            .unwrap_or_default();
                        vec![t.id.clone(), t.name.clone(), t.short.clone(), dept]
                    })
                    .collect();
                println!(
                    "{}",
                    render_text_table(&["Id", "Name", "Short", "Department"], &rows)
                );
            }
            "departments" => {
                let rows: Vec<Vec<String>> = DEPARTMENTS
                    .iter()
                    .map(|(code, name)| vec![code.to_string(), name.to_string()])
                    .collect();
                println!("{}", render_text_table(&["Code", "Department"], &rows));
            }
            "show" | "class" => {
                let Some(snapshot) = snapshot.as_ref() else {
                    println!("No schedule loaded. Use 'load <file.xml>' first.");
                    continue;
                };
                let Some(id) = parts.next() else {
                    println!("Usage: {} <id>", cmd);
                    continue;
                };
                let blocks = if cmd == "show" {
                    resolve_teacher_occurrences(snapshot, id, None)
                } else {
                    resolve_class_occurrences(snapshot, id, None)
                };
                print_blocks(snapshot, &blocks, cmd == "class");
            }
            "compare" => {
                let Some(snapshot) = snapshot.as_ref() else {
                    println!("No schedule loaded. Use 'load <file.xml>' first.");
                    continue;
                };
                let ids_s = parts.next();
                let day_s = parts.next();
                let week_s = parts.next();
                let (Some(ids_s), Some(day_s), Some(week_s)) = (ids_s, day_s, week_s) else {
                    println!("Usage: compare <ids> <day> <odd|even>");
                    continue;
                };
                let ids: Vec<String> = ids_s
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                let day: usize = match day_s.parse() {
                    Ok(v) => v,
                    Err(_) => {
                        println!("Invalid day (0=Monday .. 4=Friday)");
                        continue;
                    }
                };
                let Some(week_type) = WeekType::parse(week_s) else {
                    println!("Invalid week type (odd|even)");
                    continue;
                };
                let grid = build_comparison_grid(snapshot, &ids, day, week_type);
                let mut headers = vec!["Time"];
                for name in &grid.teachers {
                    headers.push(name.as_str());
                }
                let rows: Vec<Vec<String>> = grid
                    .time_slots
                    .iter()
                    .zip(&grid.cells)
                    .map(|(time, row)| {
                        let mut out = vec![time.clone()];
                        for cell in row {
                            out.push(match cell {
                                Some(c) => format!("{} ({}) @ {}", c.subject, c.classes, c.room),
                                None => "-".to_string(),
                            });
                        }
                        out
                    })
                    .collect();
                println!(
                    "{} ({})",
                    day_index(day),
                    week_type.as_str()
                );
                println!("{}", render_text_table(&headers, &rows));
            }
            "weektype" => {
                let Some(date_s) = parts.next() else {
                    println!("Usage: weektype <YYYY-MM-DD>");
                    continue;
                };
                let date = match NaiveDate::parse_from_str(date_s, "%Y-%m-%d") {
                    Ok(d) => d,
                    Err(_) => {
                        println!("Invalid date (YYYY-MM-DD)");
                        continue;
                    }
                };
                println!("{}: {} week", date, term.week_type_for_date(date).as_str());
            }
            "export" => {
                let Some(snapshot) = snapshot.as_ref() else {
                    println!("No schedule loaded. Use 'load <file.xml>' first.");
                    continue;
                };
                let id_s = parts.next();
                let start_s = parts.next();
                let end_s = parts.next();
                let path_s = parts.next();
                let (Some(id), Some(start_s), Some(end_s), Some(path)) =
                    (id_s, start_s, end_s, path_s)
                else {
                    println!("Usage: export <teacher-id> <start> <end> <file.ics>");
                    continue;
                };
                let (start_date, end_date) = match (
                    NaiveDate::parse_from_str(start_s, "%Y-%m-%d"),
                    NaiveDate::parse_from_str(end_s, "%Y-%m-%d"),
                ) {
                    (Ok(s), Ok(e)) => (s, e),
                    _ => {
                        println!("Invalid date (YYYY-MM-DD)");
                        continue;
                    }
                };
                let request = CalendarRequest {
                    teacher_id: id.to_string(),
                    start_date,
                    end_date,
                    start_week_type: None,
                    include_odd: true,
                    include_even: true,
                };
                match build_teacher_calendar(snapshot, &term, &request) {
                    Ok(calendar) => match save_calendar_to_ics(path, &calendar) {
                        Ok(()) => {
                            println!("Wrote {} events to {}", calendar.events.len(), path)
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(e) => println!("Error: {}", e),
                }
            }
            "csv" => {
                let Some(snapshot) = snapshot.as_ref() else {
                    println!("No schedule loaded. Use 'load <file.xml>' first.");
                    continue;
                };
                let id_s = parts.next();
                let path_s = parts.next();
                let (Some(id), Some(path)) = (id_s, path_s) else {
                    println!("Usage: csv <teacher-id> <file.csv>");
                    continue;
                };
                let blocks = resolve_teacher_occurrences(snapshot, id, None);
                match save_occurrences_to_csv(path, &blocks, &snapshot.mappings) {
                    Ok(()) => println!("Wrote {} rows to {}", blocks.len(), path),
                    Err(e) => println!("Error: {}", e),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
