//! Classification summary model.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::EnumAlertCategory;

/// Per-category row counts of one classification run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportClassify {
    /// Rows classified.
    pub cnt_rows: usize,
    /// Rows per category; categories with no rows are absent.
    pub dict_cnt_by_category: BTreeMap<EnumAlertCategory, usize>,
}

impl ReportClassify {
    /// Count one classified row.
    pub fn add(&mut self, category: EnumAlertCategory) {
        self.cnt_rows += 1;
        *self.dict_cnt_by_category.entry(category).or_default() += 1;
    }

    /// Rows assigned to `category`.
    pub fn count(&self, category: EnumAlertCategory) -> usize {
        self.dict_cnt_by_category
            .get(&category)
            .copied()
            .unwrap_or_default()
    }

    /// Machine-readable counters keyed by category label, all categories present.
    pub fn to_dict(&self) -> BTreeMap<String, usize> {
        EnumAlertCategory::ALL
            .into_iter()
            .map(|category| (category.as_label().to_string(), self.count(category)))
            .collect()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} rows={} no_date={} red={} yellow={} green={} on_term={}",
            self.cnt_rows,
            self.count(EnumAlertCategory::NoDate),
            self.count(EnumAlertCategory::RedAlert),
            self.count(EnumAlertCategory::YellowAlert),
            self.count(EnumAlertCategory::GreenAlert),
            self.count(EnumAlertCategory::OnTerm),
        )
    }
}

impl fmt::Display for ReportClassify {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[REVIEW]"))
    }
}
