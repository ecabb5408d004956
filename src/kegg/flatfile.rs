//! KEGG DBGET flat-file reader.
//!
//! Entries look like:
//!
//! ```text
//! ENTRY       hsa04110                    Pathway
//! NAME        Cell cycle - Homo sapiens (human)
//! GENE        595  CCND1; cyclin D1 [KO:K04503]
//!             894  CCND2; cyclin D2 [KO:K10151]
//! ///
//! ```
//!
//! A keyword starts in column 0; indented lines continue the previous
//! keyword. Only the first entry of a document is read.

/// One parsed entry: keywords in file order, each with its value lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatEntry {
    fields: Vec<(String, Vec<String>)>,
}

impl FlatEntry {
    /// Parse the first entry of `text`. Returns `None` when there is no `ENTRY` line.
    pub fn parse(text: &str) -> Option<Self> {
        let mut fields: Vec<(String, Vec<String>)> = Vec::new();

        for line in text.lines() {
            if line.starts_with("///") {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                if let Some((_, values)) = fields.last_mut() {
                    values.push(line.trim().to_string());
                }
                continue;
            }

            let (key, rest) = match line.split_once(char::is_whitespace) {
                Some((key, rest)) => (key, rest.trim()),
                None => (line, ""),
            };
            let mut values = Vec::new();
            if !rest.is_empty() {
                values.push(rest.to_string());
            }
            fields.push((key.to_string(), values));
        }

        if fields.iter().any(|(key, _)| key == "ENTRY") {
            Some(Self { fields })
        } else {
            None
        }
    }

    /// Every value line recorded under `key`, across repeated keywords.
    pub fn values<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> + 'a {
        let key = key.to_string();
        self.fields
            .iter()
            .filter(move |(k, _)| *k == key)
            .flat_map(|(_, values)| values.iter().map(String::as_str))
    }

    /// First value line under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values(key).next()
    }

    /// Value lines under `key` joined with `sep`; empty when absent.
    pub fn joined(&self, key: &str, sep: &str) -> String {
        self.values(key).collect::<Vec<_>>().join(sep)
    }

    /// True when the keyword appears at all.
    pub fn has(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Identifier from the `ENTRY` line.
    pub fn id(&self) -> Option<&str> {
        self.first("ENTRY").map(first_token)
    }
}

/// Leading whitespace-delimited token of a line.
pub fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

/// Split `"hsa04110  Cell cycle"` into `("hsa04110", "Cell cycle")`.
pub fn split_id_label(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((id, label)) => (id, label.trim()),
        None => (line, ""),
    }
}
