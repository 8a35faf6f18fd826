use serde::Deserialize;

use crate::CoreError;

/// Maximum length of an amendment title, in characters.
pub const MAX_TITLE_CHARS: usize = 500;

/// An amendment as submitted by an administrator, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAmendment {
    pub title: String,
    pub description: String,
}

impl NewAmendment {
    /// Trim both fields and check their bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the title is empty or longer than
    /// [`MAX_TITLE_CHARS`], or if the description is empty.
    pub fn validated(self) -> Result<Self, CoreError> {
        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();

        if title.is_empty() {
            return Err(CoreError::Validation(
                "amendment title must be non-empty".to_string(),
            ));
        }
        let title_len = title.chars().count();
        if title_len > MAX_TITLE_CHARS {
            return Err(CoreError::Validation(format!(
                "amendment title is {title_len} characters; the maximum is {MAX_TITLE_CHARS}"
            )));
        }
        if description.is_empty() {
            return Err(CoreError::Validation(
                "amendment description must be non-empty".to_string(),
            ));
        }

        Ok(Self { title, description })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amendment(title: &str, description: &str) -> NewAmendment {
        NewAmendment {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn validated_trims_fields() {
        let a = amendment("  Data Protection Act  ", "\nSection 4 revisions\n")
            .validated()
            .expect("valid amendment");
        assert_eq!(a.title, "Data Protection Act");
        assert_eq!(a.description, "Section 4 revisions");
    }

    #[test]
    fn validated_rejects_blank_title() {
        let err = amendment("   ", "text").validated().unwrap_err();
        assert!(err.to_string().contains("title must be non-empty"));
    }

    #[test]
    fn validated_rejects_blank_description() {
        let err = amendment("Title", " \t ").validated().unwrap_err();
        assert!(err.to_string().contains("description must be non-empty"));
    }

    #[test]
    fn validated_accepts_title_at_limit() {
        let title = "a".repeat(MAX_TITLE_CHARS);
        assert!(amendment(&title, "text").validated().is_ok());
    }

    #[test]
    fn validated_rejects_title_over_limit() {
        let title = "a".repeat(MAX_TITLE_CHARS + 1);
        let err = amendment(&title, "text").validated().unwrap_err();
        assert!(err.to_string().contains("maximum is 500"));
    }

    #[test]
    fn title_limit_counts_characters_not_bytes() {
        let title = "é".repeat(MAX_TITLE_CHARS);
        assert!(amendment(&title, "text").validated().is_ok());
    }
}
