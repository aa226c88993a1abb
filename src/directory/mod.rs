use serde::Deserialize;

mod load;

pub use load::load_directory;

/// One row of the directory snapshot handed to the graph view. Only `id`
/// and `name` are required; missing organizational fields simply produce
/// fewer edges.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Directory {
    pub records: Vec<PersonRecord>,
    pub departments: Vec<String>,
    pub companies: Vec<String>,
}

impl Directory {
    pub fn from_records(records: Vec<PersonRecord>) -> Self {
        let mut seen_ids = std::collections::HashSet::new();
        let mut kept = Vec::with_capacity(records.len());

        for mut record in records {
            record.email = normalize(record.email);
            record.department = normalize(record.department);
            record.company = normalize(record.company);

            if record.id.trim().is_empty() || record.name.trim().is_empty() {
                log::warn!("skipping directory record with empty id or name");
                continue;
            }
            if !seen_ids.insert(record.id.clone()) {
                log::warn!("skipping duplicate directory record id {}", record.id);
                continue;
            }
            kept.push(record);
        }

        let mut departments = distinct(kept.iter().filter_map(|record| record.department.as_deref()));
        let mut companies = distinct(kept.iter().filter_map(|record| record.company.as_deref()));
        departments.sort();
        companies.sort();

        Self {
            records: kept,
            departments,
            companies,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_owned)
        .collect()
}
