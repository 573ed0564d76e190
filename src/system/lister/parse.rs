//! Parsers for the textual output of OS process-listing utilities.
//!
//! Rows that cannot be parsed are skipped. A partial list is more useful to
//! whoever reads the check output than no list at all.

/// Column layout of a listing utility's output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowFormat {
    /// `ps aux`: whitespace separated, one header line, COMMAND last.
    PsAux,
    /// `tasklist /v /fo csv /nh`: every field quoted, no header.
    TasklistCsv,
}

/// What the CPU column of a listing measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuColumn {
    /// Usage percentage, already averaged by the OS.
    Percent,
    /// CPU time consumed since the process started, in seconds.
    CumulativeSeconds,
}

impl RowFormat {
    pub fn cpu_column(self) -> CpuColumn {
        match self {
            RowFormat::PsAux => CpuColumn::Percent,
            RowFormat::TasklistCsv => CpuColumn::CumulativeSeconds,
        }
    }
}

/// One parsed row. `cpu` is in the unit given by [`RowFormat::cpu_column`].
#[derive(Clone, Debug, PartialEq)]
pub struct ListingRow {
    pub pid: u32,
    pub name: String,
    pub cpu: f64,
}

impl ListingRow {
    pub fn new(pid: u32, name: impl Into<String>, cpu: f64) -> Self {
        ListingRow {
            pid,
            name: name.into(),
            cpu,
        }
    }
}

pub fn parse_rows(output: &str, format: RowFormat) -> Vec<ListingRow> {
    match format {
        RowFormat::PsAux => output.lines().skip(1).filter_map(parse_ps_aux_row).collect(),
        RowFormat::TasklistCsv => output.lines().filter_map(parse_tasklist_row).collect(),
    }
}

// USER PID %CPU %MEM VSZ RSS TTY STAT START TIME COMMAND
const PS_AUX_FIELDS: usize = 11;

fn parse_ps_aux_row(line: &str) -> Option<ListingRow> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < PS_AUX_FIELDS {
        tracing::trace!(line, "skipping short ps row");
        return None;
    }
    let pid = fields[1].parse().ok()?;
    let cpu = fields[2].parse().ok()?;
    Some(ListingRow::new(pid, command_name(fields[10]), cpu))
}

/// Display name from the first token of a COMMAND column.
///
/// Kernel threads (`[kworker/0:1]`) are kept verbatim; otherwise the path is
/// dropped, along with the `:` that daemons append to retitled workers.
fn command_name(token: &str) -> &str {
    if token.starts_with('[') {
        return token;
    }
    let base = token.rsplit('/').next().unwrap_or(token);
    match base.trim_end_matches(':') {
        "" => token,
        name => name,
    }
}

// "Image Name","PID","Session Name","Session#","Mem Usage","Status","User Name","CPU Time","Window Title"
const TASKLIST_FIELDS: usize = 8;

// PID 0 is "System Idle Process", the idle loop rather than a process.
const IDLE_PID: u32 = 0;

fn parse_tasklist_row(line: &str) -> Option<ListingRow> {
    let fields = split_csv_row(line);
    if fields.len() < TASKLIST_FIELDS {
        tracing::trace!(line, "skipping short tasklist row");
        return None;
    }
    let pid = fields[1].trim().parse().ok()?;
    if pid == IDLE_PID {
        return None;
    }
    let cpu = parse_cpu_value(&fields[7])?;
    Some(ListingRow::new(pid, fields[0].trim(), cpu))
}

/// Split one CSV line, honouring quotes and `""` escapes.
fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.trim_end_matches(['\r', '\n']).chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(ch),
        }
    }
    if !line.trim().is_empty() {
        fields.push(field);
    }
    fields
}

/// Parse a CPU column value.
///
/// Accepts plain numbers, numbers carrying a ` K` unit or thousands
/// separators, and `H:MM:SS` CPU times (returned as seconds).
fn parse_cpu_value(raw: &str) -> Option<f64> {
    let value = raw.trim().trim_matches('"');
    let value = value.strip_suffix(" K").unwrap_or(value).replace(',', "");

    if value.contains(':') {
        return value.split(':').try_fold(0f64, |acc, part| {
            let part: u32 = part.trim().parse().ok()?;
            Some(acc * 60.0 + f64::from(part))
        });
    }
    value.trim().parse().ok()
}
