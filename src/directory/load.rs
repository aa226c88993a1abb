use std::fs;

use anyhow::{Context, Result};

use super::{Directory, PersonRecord};

pub fn load_directory(path: &str) -> Result<Directory> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read directory snapshot {path}"))?;

    let records: Vec<PersonRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse directory snapshot {path}"))?;

    let directory = Directory::from_records(records);
    log::info!(
        "loaded {} people, {} departments, {} companies from {path}",
        directory.record_count(),
        directory.departments.len(),
        directory.companies.len()
    );

    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_directory_reports_missing_file() {
        let error = load_directory("/nonexistent/people.json").unwrap_err();
        assert!(error.to_string().contains("failed to read"));
    }

    #[test]
    fn load_directory_parses_snapshot_json() {
        let dir = std::env::temp_dir().join("org-graph-load-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("people.json");
        fs::write(
            &path,
            r#"[
                {"id": "1", "name": "Ada Lovelace", "email": "ada@acme.test", "department": "Engineering", "company": "Acme"},
                {"id": "2", "name": "Grace Hopper", "department": "Engineering"}
            ]"#,
        )
        .unwrap();

        let directory = load_directory(path.to_str().unwrap()).unwrap();
        assert_eq!(directory.record_count(), 2);
        assert_eq!(directory.departments, vec!["Engineering"]);
        assert_eq!(directory.companies, vec!["Acme"]);
        assert_eq!(directory.records[1].email, None);
    }
}
