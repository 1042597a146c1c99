//! Simple integration tests for widgets module
//! This file contains basic smoke tests to ensure core functionality works

#[cfg(test)]
mod tests {
    use crate::{shared::theme::*, widgets::*};

    #[test]
    fn test_format_title_basic() {
        let title = "buy milk";
        let result = format_title(title, 20);
        assert_eq!(result, "buy milk");
    }

    #[test]
    fn test_format_title_truncates_with_ellipsis() {
        let title = "a very long todo title that will not fit";
        let result = format_title(title, 12);
        assert!(result.ends_with("..."));
        assert!(result.len() < title.len());
    }

    #[test]
    fn test_format_title_handles_wide_graphemes() {
        // CJK characters are two columns wide each
        let title = "買い物に行ってから掃除する";
        let result = format_title(title, 10);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_completion_icon_basic() {
        assert_eq!(completion_icon(true), Icons::COMPLETED);
        assert_eq!(completion_icon(false), Icons::PENDING);
    }

    #[test]
    fn test_theme_creation() {
        let theme = Theme::dark();
        let _ = theme; // Theme created successfully
    }
}
