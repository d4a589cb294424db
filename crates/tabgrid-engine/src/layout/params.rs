pub const DEFAULT_COLUMN_SPACING: usize = 2;
pub const DEFAULT_LINE_WIDTH: usize = 72;
pub const MAX_COLUMN_SPACING: usize = 32;
pub const MAX_LINE_WIDTH: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Column spacing must be between 1 and {MAX_COLUMN_SPACING}, got {0}")]
    InvalidColumnSpacing(i64),
    #[error("Line width must be between 1 and {MAX_LINE_WIDTH}, got {0}")]
    InvalidLineWidth(i64),
    #[error("Layout value is not a number: {0:?}")]
    NotANumber(String),
}

/// Spacing and width settings that drive the layout engine.
///
/// Both values are at least 1 and bounded by [`MAX_COLUMN_SPACING`] and
/// [`MAX_LINE_WIDTH`]; the setters reject anything else and leave the previous
/// value in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParameters {
    column_spacing: usize,
    line_width: usize,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            column_spacing: DEFAULT_COLUMN_SPACING,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl LayoutParameters {
    pub fn new(column_spacing: i64, line_width: i64) -> Result<Self, LayoutError> {
        let mut params = Self::default();
        params.set_column_spacing(column_spacing)?;
        params.set_line_width(line_width)?;
        Ok(params)
    }

    /// Minimum dash fill between tokens
    pub fn column_spacing(&self) -> usize {
        self.column_spacing
    }

    /// Maximum characters per rendered line, including the `E|--` prefix
    pub fn line_width(&self) -> usize {
        self.line_width
    }

    pub fn set_column_spacing(&mut self, value: i64) -> Result<(), LayoutError> {
        self.column_spacing = bounded(value, MAX_COLUMN_SPACING)
            .ok_or(LayoutError::InvalidColumnSpacing(value))?;
        Ok(())
    }

    pub fn set_line_width(&mut self, value: i64) -> Result<(), LayoutError> {
        self.line_width =
            bounded(value, MAX_LINE_WIDTH).ok_or(LayoutError::InvalidLineWidth(value))?;
        Ok(())
    }
}

/// Parse a layout value typed by the user (e.g. from a settings field)
pub fn parse_layout_value(text: &str) -> Result<i64, LayoutError> {
    text.trim()
        .parse()
        .map_err(|_| LayoutError::NotANumber(text.to_string()))
}

fn bounded(value: i64, max: usize) -> Option<usize> {
    usize::try_from(value)
        .ok()
        .filter(|value| (1..=max).contains(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let params = LayoutParameters::default();
        assert_eq!(params.column_spacing(), 2);
        assert_eq!(params.line_width(), 72);
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    #[case(33)]
    #[case(i64::MAX)]
    fn test_invalid_spacing_keeps_previous(#[case] value: i64) {
        let mut params = LayoutParameters::new(4, 40).unwrap();
        let err = params.set_column_spacing(value).unwrap_err();

        assert_eq!(err, LayoutError::InvalidColumnSpacing(value));
        assert_eq!(params.column_spacing(), 4);
    }

    #[rstest]
    #[case(0)]
    #[case(-72)]
    #[case(4097)]
    #[case(i64::MAX)]
    fn test_invalid_width_keeps_previous(#[case] value: i64) {
        let mut params = LayoutParameters::default();
        let err = params.set_line_width(value).unwrap_err();

        assert_eq!(err, LayoutError::InvalidLineWidth(value));
        assert_eq!(params.line_width(), DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_minimum_values_accepted() {
        let params = LayoutParameters::new(1, 1).unwrap();
        assert_eq!(params.column_spacing(), 1);
        assert_eq!(params.line_width(), 1);
    }

    #[test]
    fn test_maximum_values_accepted() {
        let params = LayoutParameters::new(32, 4096).unwrap();
        assert_eq!(params.column_spacing(), MAX_COLUMN_SPACING);
        assert_eq!(params.line_width(), MAX_LINE_WIDTH);
    }

    #[rstest]
    #[case("3", Ok(3))]
    #[case(" 80 ", Ok(80))]
    #[case("-1", Ok(-1))]
    #[case("wide", Err(LayoutError::NotANumber("wide".to_string())))]
    #[case("", Err(LayoutError::NotANumber(String::new())))]
    fn test_parse_layout_value(#[case] text: &str, #[case] expected: Result<i64, LayoutError>) {
        assert_eq!(parse_layout_value(text), expected);
    }
}
