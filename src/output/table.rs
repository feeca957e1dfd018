use serde::Serialize;
use tabled::{Table, Tabled};

use crate::alerts::catalog::{AlertCatalog, IncidentCategory, Suggestion};
use crate::audio::patterns::{AudioPattern, pattern_for};

/// Row for the category overview table
#[derive(Tabled, Serialize, Debug)]
pub struct CategoryRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Suggestions")]
    pub suggestions: String,
    #[tabled(rename = "Urgency Range")]
    pub urgency_range: String,
    #[tabled(rename = "Audio Pattern")]
    pub audio_pattern: String,
}

/// Row for a single category's suggestion listing
#[derive(Tabled, Serialize, Debug)]
pub struct SuggestionRow {
    #[tabled(rename = "Message")]
    pub message: String,
    #[tabled(rename = "Urgency")]
    pub urgency: String,
    #[tabled(rename = "Duration")]
    pub duration: String,
    #[tabled(rename = "Action")]
    pub action: String,
}

/// Row for a just-issued alert
#[derive(Tabled, Serialize, Debug)]
pub struct AlertRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Message")]
    pub message: String,
    #[tabled(rename = "Urgency")]
    pub urgency: String,
    #[tabled(rename = "Duration")]
    pub duration: String,
    #[tabled(rename = "Action")]
    pub action: String,
}

impl CategoryRow {
    pub fn from_category(catalog: &AlertCatalog, category: IncidentCategory) -> Self {
        let list = catalog.candidates(category);
        let own = catalog.has_own_list(category);
        let suggestions = if own {
            list.len().to_string()
        } else {
            format!("{} (fallback)", list.len())
        };

        let min = list.iter().map(|s| s.urgency).min();
        let max = list.iter().map(|s| s.urgency).max();
        let urgency_range = match (min, max) {
            (Some(min), Some(max)) if min == max => min.to_string(),
            (Some(min), Some(max)) => format!("{min}-{max}"),
            _ => "-".to_string(),
        };

        Self {
            category: category.to_string(),
            suggestions,
            urgency_range,
            audio_pattern: format_pattern(&pattern_for(category)),
        }
    }
}

impl SuggestionRow {
    pub fn from_suggestion(suggestion: &Suggestion) -> Self {
        Self {
            message: suggestion.message.clone(),
            urgency: suggestion.urgency.to_string(),
            duration: format_duration_ms(suggestion.duration_ms),
            action: suggestion.action_label().to_string(),
        }
    }
}

impl AlertRow {
    pub fn from_alert(category: IncidentCategory, suggestion: &Suggestion) -> Self {
        Self {
            category: category.to_string(),
            message: suggestion.message.clone(),
            urgency: suggestion.urgency.to_string(),
            duration: format_duration_ms(suggestion.duration_ms),
            action: suggestion.action_label().to_string(),
        }
    }
}

pub fn categories_table(catalog: &AlertCatalog) -> String {
    let rows: Vec<CategoryRow> = IncidentCategory::ALL
        .iter()
        .map(|&c| CategoryRow::from_category(catalog, c))
        .collect();
    Table::new(rows).to_string()
}

pub fn suggestions_table(suggestions: &[Suggestion]) -> String {
    if suggestions.is_empty() {
        return "No suggestions for this category.".to_string();
    }
    let rows: Vec<SuggestionRow> = suggestions.iter().map(SuggestionRow::from_suggestion).collect();
    Table::new(rows).to_string()
}

pub fn alert_table(category: IncidentCategory, suggestion: &Suggestion) -> String {
    Table::new(vec![AlertRow::from_alert(category, suggestion)]).to_string()
}

/// Format milliseconds as seconds with one decimal place
pub fn format_duration_ms(ms: u64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}

/// Short human summary of an audio pattern, e.g. "3× sine 800 Hz"
fn format_pattern(pattern: &AudioPattern) -> String {
    format!(
        "{}× {} {} Hz",
        pattern.beep_count,
        pattern.waveform.as_str(),
        pattern.frequency_hz as u32
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::catalog::Urgency;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(8_000), "8.0s");
        assert_eq!(format_duration_ms(500), "0.5s");
        assert_eq!(format_duration_ms(15_000), "15.0s");
    }

    #[test]
    fn test_category_row_marks_fallback() {
        let catalog = AlertCatalog::new();
        let row = CategoryRow::from_category(&catalog, IncidentCategory::Emergency);
        assert!(row.suggestions.contains("fallback"));

        let row = CategoryRow::from_category(&catalog, IncidentCategory::Phone);
        assert_eq!(row.suggestions, "7");
    }

    #[test]
    fn test_category_row_pattern_summary() {
        let catalog = AlertCatalog::new();
        let row = CategoryRow::from_category(&catalog, IncidentCategory::Drowsiness);
        assert_eq!(row.audio_pattern, "3× sine 800 Hz");
    }

    #[test]
    fn test_suggestion_row() {
        let suggestion = Suggestion {
            message: "💧 Drink some water to stay hydrated".to_string(),
            icon: "💧".to_string(),
            action: Some("hydrate".to_string()),
            urgency: Urgency::Medium,
            duration_ms: 8_000,
        };
        let row = SuggestionRow::from_suggestion(&suggestion);
        assert_eq!(row.urgency, "medium");
        assert_eq!(row.duration, "8.0s");
        assert_eq!(row.action, "Drink Water");
    }

    #[test]
    fn test_categories_table_lists_all() {
        let catalog = AlertCatalog::new();
        let table = categories_table(&catalog);
        for category in IncidentCategory::ALL {
            assert!(table.contains(category.as_str()));
        }
    }

    #[test]
    fn test_empty_suggestions_table() {
        assert_eq!(suggestions_table(&[]), "No suggestions for this category.");
    }
}
