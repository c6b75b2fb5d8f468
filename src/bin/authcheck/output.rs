use anyhow::{Result, bail};
use domain_authcheck::{AuthCheckResult, LookupOutcome, RecordKind};

pub fn print(rows: &[AuthCheckResult], format: &str) -> Result<()> {
    match format {
        "human" => {
            for row in rows {
                for line in human_lines(row) {
                    println!("{line}");
                }
            }
        }
        "json" => {
            #[cfg(feature = "with-serde")]
            {
                println!("{}", serde_json::to_string_pretty(rows)?);
            }
            #[cfg(not(feature = "with-serde"))]
            {
                bail!("format=json nécessite la feature 'with-serde'");
            }
        }
        "ndjson" => {
            #[cfg(feature = "with-serde")]
            {
                for row in rows {
                    println!("{}", serde_json::to_string(row)?);
                }
            }
            #[cfg(not(feature = "with-serde"))]
            {
                bail!("format=ndjson nécessite la feature 'with-serde'");
            }
        }
        other => bail!("unknown --format '{other}', use: human|json|ndjson"),
    }
    Ok(())
}

pub fn human_lines(row: &AuthCheckResult) -> Vec<String> {
    let mut lines = vec![format!("{} (dkim selector: {})", row.domain, row.selector)];
    for kind in [RecordKind::Spf, RecordKind::Dmarc, RecordKind::Dkim] {
        let outcome = row.outcome(kind);
        match outcome {
            LookupOutcome::Found { records } => {
                for record in records {
                    lines.push(format!("  {:<6} found   {}", kind.label(), record.content()));
                }
            }
            LookupOutcome::Absent { reason, .. } => {
                lines.push(format!("  {:<6} absent  {}", kind.label(), reason));
            }
            LookupOutcome::QueryError { detail } => {
                lines.push(format!("  {:<6} error   {}", kind.label(), detail));
            }
        }
    }
    lines
}
