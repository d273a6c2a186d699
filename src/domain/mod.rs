// Model input layout
pub mod ml;

// Nutritional features, validation and prediction values
pub mod nutrition;

// Domain-specific error types
pub mod errors;
