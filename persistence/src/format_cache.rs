//! FILENAME: persistence/src/format_cache.rs
//! PURPOSE: Per-write cache of cell formats keyed by format tag.
//! CONTEXT: A format tag is an opaque number-format string attached to a
//! leaf column (for example "dd/MM/yyyy" or "[$$-409]#,##0"). Columns
//! sharing a tag share one `Format` instance within a single workbook
//! build; the cache is created per build and never shared across calls.

use rust_xlsxwriter::Format;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct FormatCache {
    formats: HashMap<String, Format>,
}

impl FormatCache {
    pub fn new() -> Self {
        FormatCache {
            formats: HashMap::new(),
        }
    }

    /// The cached format for `tag`, creating it on first use.
    pub fn get_or_create(&mut self, tag: &str) -> &Format {
        self.formats
            .entry(tag.to_string())
            .or_insert_with(|| Format::new().set_num_format(tag))
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_tag_creates_one_format() {
        let mut cache = FormatCache::new();
        assert!(cache.is_empty());

        cache.get_or_create("dd/MM/yyyy");
        cache.get_or_create("dd/MM/yyyy");
        cache.get_or_create("#,##0.00");

        assert_eq!(cache.len(), 2);
    }
}
