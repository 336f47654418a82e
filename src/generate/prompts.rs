//! Prompt builders and response parsing for listing-form assistance.
//!
//! Model output is advisory. [`parse_category_suggestion`] returns `None`
//! rather than an error when the model ignores the requested JSON shape.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::listing::{parse_tags, NewListing};

/// Builds the prompt for [`GenerationMode::Description`](super::GenerationMode::Description).
///
/// `item_type` is the free-text garment type from the form ("Jacket",
/// "Sneakers"); it is not stored on the listing.
///
/// # Errors
///
/// Returns `ValidationError::RequiredField` if both title and category are
/// blank, since the model would have nothing to describe.
///
/// ```rust
/// use swapshelf::generate::describe_prompt;
/// use swapshelf::{Condition, NewListing};
///
/// let draft = NewListing {
///     title: "Vintage Denim Jacket".into(),
///     category: Some("Outerwear".into()),
///     size: "M".into(),
///     condition: Condition::Excellent,
///     ..Default::default()
/// };
/// assert_eq!(
///     describe_prompt(&draft, "Jacket").unwrap(),
///     "Title: Vintage Denim Jacket, Category: Outerwear, Type: Jacket, Size: M, Condition: Like New",
/// );
/// ```
pub fn describe_prompt(draft: &NewListing, item_type: &str) -> Result<String> {
    let title = draft.title.trim();
    let category = draft.category.as_deref().map(str::trim).unwrap_or("");
    if title.is_empty() && category.is_empty() {
        return Err(ValidationError::required_field("title").into());
    }

    Ok(format!(
        "Title: {}, Category: {}, Type: {}, Size: {}, Condition: {}",
        title,
        category,
        item_type.trim(),
        draft.size.trim(),
        draft.condition.label()
    ))
}

/// Builds the prompt for [`GenerationMode::Categorize`](super::GenerationMode::Categorize).
///
/// # Errors
///
/// Returns `ValidationError::RequiredField` if the title is blank.
pub fn categorize_prompt(title: &str, description: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::required_field("title").into());
    }
    Ok(format!(
        "Item: {}, Current description: {}",
        title,
        description.trim()
    ))
}

/// Category suggestion returned by the categorize mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySuggestion {
    /// Suggested category name.
    pub category: String,

    /// Suggested garment type.
    #[serde(rename = "type", alias = "item_type")]
    pub item_type: String,

    /// Suggested tags.
    #[serde(rename = "suggestedTags", alias = "suggested_tags", alias = "tags")]
    pub suggested_tags: Vec<String>,
}

impl CategorySuggestion {
    /// Returns true if the suggestion carries nothing usable.
    pub fn is_empty(&self) -> bool {
        self.category.trim().is_empty()
            && self.item_type.trim().is_empty()
            && self.suggested_tags.iter().all(|t| t.trim().is_empty())
    }

    /// Tags joined the way the listing form shows them.
    pub fn tags_input(&self) -> String {
        self.suggested_tags.join(", ")
    }

    /// Fills the draft's category and tags from the suggestion.
    ///
    /// Blank suggested values leave the draft's current value in place.
    pub fn apply_to(&self, draft: &mut NewListing) {
        let category = self.category.trim();
        if !category.is_empty() {
            draft.category = Some(category.to_string());
        }
        let tags = parse_tags(&self.tags_input());
        if !tags.is_empty() {
            draft.tags = tags;
        }
    }
}

/// Extracts a [`CategorySuggestion`] from model output.
///
/// Accepts bare JSON, JSON inside a Markdown code fence, or JSON surrounded
/// by prose: the outermost `{ ... }` span is parsed.
///
/// ```rust
/// use swapshelf::generate::parse_category_suggestion;
///
/// let raw = "Sure!\n```json\n{\"category\": \"Shoes\", \"type\": \"Boots\", \"suggestedTags\": [\"leather\"]}\n```";
/// let suggestion = parse_category_suggestion(raw).unwrap();
/// assert_eq!(suggestion.category, "Shoes");
/// assert_eq!(suggestion.suggested_tags, vec!["leather"]);
/// ```
pub fn parse_category_suggestion(output: &str) -> Option<CategorySuggestion> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    if end < start {
        return None;
    }

    serde_json::from_str::<CategorySuggestion>(&output[start..=end])
        .ok()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Condition;

    #[test]
    fn test_describe_prompt_needs_title_or_category() {
        let empty = NewListing::default();
        assert!(describe_prompt(&empty, "").unwrap_err().is_validation());

        let category_only = NewListing {
            category: Some("Knitwear".into()),
            condition: Condition::Good,
            ..Default::default()
        };
        assert_eq!(
            describe_prompt(&category_only, "").unwrap(),
            "Title: , Category: Knitwear, Type: , Size: , Condition: Good"
        );
    }

    #[test]
    fn test_categorize_prompt() {
        assert_eq!(
            categorize_prompt(" Wool Sweater ", "Chunky knit").unwrap(),
            "Item: Wool Sweater, Current description: Chunky knit"
        );
        assert!(categorize_prompt("  ", "anything").is_err());
    }

    #[test]
    fn test_parse_bare_json() {
        let suggestion = parse_category_suggestion(
            r#"{"category": "Outerwear", "type": "Jacket", "suggestedTags": ["denim", "vintage"]}"#,
        )
        .unwrap();
        assert_eq!(suggestion.category, "Outerwear");
        assert_eq!(suggestion.item_type, "Jacket");
        assert_eq!(suggestion.tags_input(), "denim, vintage");
    }

    #[test]
    fn test_parse_rejects_prose_and_empty() {
        assert!(parse_category_suggestion("I think it's a jacket.").is_none());
        assert!(parse_category_suggestion("{not json}").is_none());
        assert!(parse_category_suggestion(r#"{"category": ""}"#).is_none());
        assert!(parse_category_suggestion("} backwards {").is_none());
    }

    #[test]
    fn test_parse_missing_fields_default() {
        let suggestion = parse_category_suggestion(r#"{"category": "Tops"}"#).unwrap();
        assert!(suggestion.item_type.is_empty());
        assert!(suggestion.suggested_tags.is_empty());
    }

    #[test]
    fn test_apply_to_keeps_existing_on_blank() {
        let mut draft = NewListing {
            category: Some("Tops".into()),
            tags: vec!["cotton".into()],
            ..Default::default()
        };

        CategorySuggestion {
            category: " ".into(),
            item_type: "Tee".into(),
            suggested_tags: vec![],
        }
        .apply_to(&mut draft);
        assert_eq!(draft.category.as_deref(), Some("Tops"));
        assert_eq!(draft.tags, vec!["cotton".to_string()]);

        CategorySuggestion {
            category: "Shirts".into(),
            item_type: String::new(),
            suggested_tags: vec!["Linen".into(), "linen".into(), "summer".into()],
        }
        .apply_to(&mut draft);
        assert_eq!(draft.category.as_deref(), Some("Shirts"));
        assert_eq!(draft.tags, vec!["Linen".to_string(), "summer".to_string()]);
    }
}
