use owm_core::NormalizedRecord;

pub fn render(records: &[NormalizedRecord], json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(records)?);
    }
    Ok(render_table(records))
}

fn render_table(records: &[NormalizedRecord]) -> String {
    if records.is_empty() {
        return "No weather records.".to_string();
    }

    let name_width = records.iter().map(|r| r.name.chars().count()).max().unwrap_or(0).max(4);

    let mut out = format!("{:<name_width$}  {:<19}  {:>8}  DESCRIPTION\n", "NAME", "DATE", "TEMP");
    for r in records {
        out.push_str(&format!(
            "{:<name_width$}  {:<19}  {:>8}  {}\n",
            r.name,
            r.data.as_deref().unwrap_or("now"),
            r.temp,
            r.description,
        ));
    }
    out
}
