use ratatui::style::{Color, Modifier, Style};

/// Color palette for the tuido TUI
#[derive(Debug, Clone)]
pub struct Theme {
    // Primary colors
    pub accent: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_disabled: Color,

    // Interactive colors
    pub selected: Color,
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme with vibrant accents
    pub fn dark() -> Self {
        Self {
            accent: Color::Rgb(168, 85, 247), // Purple-500

            success: Color::Rgb(34, 197, 94),  // Green-500
            warning: Color::Rgb(251, 191, 36), // Amber-500
            danger: Color::Rgb(239, 68, 68),   // Red-500
            info: Color::Rgb(59, 130, 246),    // Blue-500

            text_primary: Color::Rgb(243, 244, 246), // Gray-100
            text_secondary: Color::Rgb(156, 163, 175), // Gray-400
            text_disabled: Color::Rgb(107, 114, 128), // Gray-500

            selected: Color::Rgb(99, 102, 241),       // Indigo-500
            border: Color::Rgb(75, 85, 99),           // Gray-600
            border_focused: Color::Rgb(99, 102, 241), // Indigo-500
        }
    }

    /// Light theme variant
    pub fn light() -> Self {
        Self {
            accent: Color::Rgb(168, 85, 247),

            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(251, 191, 36),
            danger: Color::Rgb(239, 68, 68),
            info: Color::Rgb(59, 130, 246),

            text_primary: Color::Rgb(17, 24, 39),
            text_secondary: Color::Rgb(107, 114, 128),
            text_disabled: Color::Rgb(156, 163, 175),

            selected: Color::Rgb(99, 102, 241),
            border: Color::Rgb(209, 213, 219),
            border_focused: Color::Rgb(99, 102, 241),
        }
    }

    /// Ocean theme with cool tones
    pub fn ocean() -> Self {
        Self {
            accent: Color::Rgb(20, 184, 166), // Teal-500

            success: Color::Rgb(16, 185, 129), // Emerald-500
            warning: Color::Rgb(245, 158, 11), // Amber-500
            danger: Color::Rgb(239, 68, 68),   // Red-500
            info: Color::Rgb(59, 130, 246),    // Blue-500

            text_primary: Color::Rgb(248, 250, 252), // Slate-50
            text_secondary: Color::Rgb(148, 163, 184), // Slate-400
            text_disabled: Color::Rgb(100, 116, 139), // Slate-500

            selected: Color::Rgb(14, 165, 233),       // Sky-500
            border: Color::Rgb(71, 85, 105),          // Slate-600
            border_focused: Color::Rgb(14, 165, 233), // Sky-500
        }
    }
}

/// Pre-defined styles for common UI elements
impl Theme {
    /// Style for headers and titles
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for secondary text
    pub fn secondary_text_style(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Style for success messages
    pub fn success_style(&self) -> Style {
        Style::default()
            .fg(self.success)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for warnings
    pub fn warning_style(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for errors
    pub fn danger_style(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for info text
    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Style for selected items
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for focused borders
    pub fn border_focused_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for numbers and metrics
    pub fn metric_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for dimmed/disabled elements
    pub fn dimmed_style(&self) -> Style {
        Style::default().fg(self.text_disabled)
    }

    /// Style for key hints in footers and overlays
    pub fn key_hint_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

/// Iconography using Unicode symbols
pub struct Icons;

impl Icons {
    // Todo state icons
    pub const COMPLETED: &'static str = "✓"; // Check mark
    pub const PENDING: &'static str = "○"; // Hollow circle

    // UI elements
    pub const ARROW_RIGHT: &'static str = "▶"; // Selection marker
    pub const PROMPT: &'static str = "›"; // Input prompt
    pub const TOGGLE_ALL: &'static str = "⇅"; // Bulk toggle marker
    pub const ERROR: &'static str = "✗"; // Error banner marker
}

/// Progress bar characters
pub struct ProgressChars;

impl ProgressChars {
    pub const FILLED: char = '█'; // Full block
    pub const EMPTY: char = '░'; // Light shade
    pub const PARTIAL: char = '▒'; // Medium shade
}
