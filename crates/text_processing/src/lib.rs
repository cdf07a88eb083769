//! Text processing for loan application autofill
//!
//! This crate turns free-form Korean chat transcripts into entity records:
//! - **Field Recognizers**: phone, email, registration number, term, purpose, person name
//! - **Business Name**: label-anchored recognizer scanning messages newest first
//! - **Amount Normalizer**: "2억 3천만원" style expressions to whole won
//! - **Extraction Engine**: assembles the record and its confidence map
//!
//! # Example
//!
//! ```ignore
//! use loan_autofill_text_processing::{EntityExtractor, ExtractionRequest};
//!
//! let request = ExtractionRequest::from_slice(body)?;
//! let record = EntityExtractor::default().extract_request(&request);
//! println!("{}", serde_json::to_string(&record)?);
//! ```

pub mod amount;
pub mod business_name;
pub mod extraction;
pub mod patterns;

pub use amount::normalize_amount;
pub use business_name::recognize_business_name;
pub use extraction::{EntityExtractor, ExtractionRequest};
