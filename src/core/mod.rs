/// Offset/limit pagination types
pub mod pagination;

/// Promotion queries and mutations
pub mod promotion;

/// Field, business-rule and request-parameter validation
pub mod validation;
