/// Query expander with Islamic-studies synonyms.
///
/// Every table key that occurs as a substring of the query appends its
/// phrase. Keys are checked independently, so overlapping keys all fire.
/// Function words map to an empty phrase and contribute nothing.
#[derive(Debug, Clone)]
pub struct QueryExpander {
    table: Vec<(String, String)>,
}

const BUILTIN_EXPANSIONS: &[(&str, &str)] = &[
    ("الرحمة", "الرحمن الرحيم رحمة واسعة المغفرة العفو"),
    ("الصبر", "الصابرين المصائب البلاء الاحتساب الثواب الأجر الصمود التحمل"),
    ("الزكاة", "الصدقة الفقراء المساكين المحتاجين الإنفاق التطوع"),
    ("المصائب", "البلاء المصائب الشدائد الصبر الاحتساب الثواب المحن"),
    ("الإسلام", "الإيمان التوحيد المسلمون الدين الله الرسول"),
    ("الفضل", "الثواب الأجر الخير البركة الفضائل المكافأة"),
    ("الصدقة", "التبرع العطاء المساعدة الفقراء المحتاجين البر"),
    ("في", ""),
    ("على", ""),
    ("من", ""),
    ("ال", ""),
    ("وا", ""),
];

impl Default for QueryExpander {
    fn default() -> Self {
        Self::new(BUILTIN_EXPANSIONS.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }
}

impl QueryExpander {
    /// Build from `(term, phrase)` pairs. Order is kept and decides the
    /// order in which phrases are appended.
    pub fn new(table: impl IntoIterator<Item = (String, String)>) -> Self {
        Self { table: table.into_iter().filter(|(k, _)| !k.is_empty()).collect() }
    }

    pub fn expand(&self, query: &str) -> String {
        let mut expanded = query.to_string();
        for (term, phrase) in &self.table {
            if !phrase.is_empty() && query.contains(term.as_str()) {
                expanded.push(' ');
                expanded.push_str(phrase);
            }
        }
        expanded.trim().to_string()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_query_is_unchanged() {
        let expander = QueryExpander::default();
        assert_eq!(expander.expand("  كتاب البيوع "), "كتاب البيوع");
        assert_eq!(expander.expand(""), "");
    }

    #[test]
    fn function_words_add_nothing() {
        let expander = QueryExpander::default();
        assert_eq!(expander.expand("من في"), "من في");
    }

    #[test]
    fn overlapping_terms_all_fire_in_table_order() {
        let expander = QueryExpander::default();
        let out = expander.expand("الصبر على المصائب");
        assert!(out.starts_with("الصبر على المصائب "));
        let patience = out.find("الصابرين").unwrap();
        let hardship = out.find("الشدائد").unwrap();
        assert!(patience < hardship);
    }

    #[test]
    fn custom_table_skips_empty_keys() {
        let expander = QueryExpander::new(vec![
            (String::new(), "never".to_string()),
            ("salat".to_string(), "prayer".to_string()),
        ]);
        assert_eq!(expander.len(), 1);
        assert_eq!(expander.expand("salat times"), "salat times prayer");
    }
}
