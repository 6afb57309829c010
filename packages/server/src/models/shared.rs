use serde::Serialize;

use crate::error::AppError;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Largest allowed page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// One page of a list result.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total_elements: u64,
    /// Total number of pages at the current size.
    #[schema(example = 3)]
    pub total_pages: u64,
    /// Current page number (zero-based).
    #[schema(example = 0)]
    pub page: u64,
    /// Page size in effect.
    #[schema(example = 20)]
    pub size: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, page: u64, size: u64) -> Self {
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(size),
            page,
            size,
        }
    }
}

/// Resolve optional page/size query values to effective values.
///
/// Page is zero-based and defaults to 0; size defaults to 20, clamped to
/// 1-100.
pub fn page_params(page: Option<u64>, size: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(0);
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, size)
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain,
/// no whitespace. Deliverability is not our problem.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

/// Validate a required free-text field: non-blank after trimming, bounded.
pub fn validate_text(value: &str, name: &str, max_chars: usize) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{name} must not be blank")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{name} must be at most {max_chars} characters"
        )));
    }
    Ok(())
}
