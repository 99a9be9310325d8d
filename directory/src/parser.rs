//! Markdown table extraction.
//!
//! Validator rows look like
//! `| entity | contacts | … | enode://<id>@<ip>:<port>?discport=0 |`;
//! regular rows carry one more cell, the `privateFor` key, right before the
//! enode. Header, separator and malformed rows are skipped.

use fleet_types::{DirectoryEntry, Enode};
use regex::Regex;
use std::sync::LazyLock;

static ENODE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"enode://([0-9A-Fa-f]+)@([^:\s|]+):([0-9]+)").expect("static regex")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("static regex")
});

/// Which registry a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    Validator,
    Regular,
}

/// Extract every well-formed node row from a directory document, in document order.
pub fn parse_directory(text: &str, kind: DirectoryKind) -> Vec<DirectoryEntry> {
    text.lines().filter_map(|line| parse_row(line, kind)).collect()
}

fn parse_row(line: &str, kind: DirectoryKind) -> Option<DirectoryEntry> {
    let line = line.trim();
    if !line.starts_with('|') {
        return None;
    }
    let cells: Vec<&str> = line
        .trim_matches('|')
        .split('|')
        .map(str::trim)
        .collect();

    let enode_idx = cells.iter().position(|c| ENODE_URL.is_match(c))?;
    let caps = ENODE_URL.captures(cells[enode_idx])?;

    let port = match caps[3].parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            tracing::warn!(row = line, "skipping directory row with invalid port");
            return None;
        }
    };

    let private_for = match kind {
        DirectoryKind::Validator => None,
        DirectoryKind::Regular => {
            let key = enode_idx.checked_sub(1).map(|i| cells[i]).unwrap_or_default();
            if !key.ends_with('=') {
                tracing::warn!(row = line, "skipping regular directory row without privateFor key");
                return None;
            }
            Some(key.to_string())
        }
    };

    let contacts = cells
        .get(1)
        .filter(|_| enode_idx > 1)
        .map(|cell| EMAIL.find_iter(cell).map(|m| m.as_str().to_string()).collect())
        .unwrap_or_default();

    Some(DirectoryEntry {
        entity: cells[0].to_string(),
        contacts,
        private_for,
        enode: Enode::new(&caps[1]),
        ip: caps[2].to_string(),
        port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALIDATORS: &str = "\
# Validator nodes

| Entity | Contact | Node details | Enode |
| ------ | ------- | ------------ | ----- |
| Acme Corp | Jane Roe <jane@acme.example>, ops@acme.example | 4 cores / 8GB | enode://aa11@10.0.0.1:21000?discport=0 |
| Beta Labs | admin@beta.example | 2 cores | enode://bb22@10.0.0.2:21000?discport=0 |
| Broken | nobody | n/a | enode://zz@10.0.0.9:21000 |
";

    const REGULARS: &str = "\
| Entity | Contact | Node details | privateFor | Enode |
|---|---|---|---|---|
| Gamma SA | it@gamma.example | 2 cores | QmFzZTY0S2V5= | enode://cc33@10.0.1.1:21000?discport=0 |
| Delta | it@delta.example | 2 cores | missing-key | enode://dd44@10.0.1.2:21000?discport=0 |
";

    #[test]
    fn parses_validator_rows() {
        let entries = parse_directory(VALIDATORS, DirectoryKind::Validator);
        assert_eq!(entries.len(), 2);

        let acme = &entries[0];
        assert_eq!(acme.entity, "Acme Corp");
        assert_eq!(acme.contacts, vec!["jane@acme.example", "ops@acme.example"]);
        assert_eq!(acme.enode.as_str(), "aa11");
        assert_eq!(acme.ip, "10.0.0.1");
        assert_eq!(acme.port, 21000);
        assert!(acme.private_for.is_none());

        assert_eq!(entries[1].entity, "Beta Labs");
    }

    #[test]
    fn parses_regular_rows_with_private_for() {
        let entries = parse_directory(REGULARS, DirectoryKind::Regular);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].private_for.as_deref(), Some("QmFzZTY0S2V5="));
        assert_eq!(entries[0].enode.as_str(), "cc33");
    }

    #[test]
    fn rejects_out_of_range_ports() {
        let row = "| X | x@x.example | - | enode://ab@1.2.3.4:99999?discport=0 |";
        assert!(parse_directory(row, DirectoryKind::Validator).is_empty());
    }

    #[test]
    fn ignores_prose_and_blank_lines() {
        let text = "Some intro text with enode://ab@1.2.3.4:21000 inline.\n\n";
        assert!(parse_directory(text, DirectoryKind::Validator).is_empty());
    }
}
