//! Form hydration for loan application autofill
//!
//! Consumes an [`EntityRecord`](loan_autofill_core::EntityRecord) and writes
//! its values into form fields:
//! - **Policy**: fill-empty-only by default, overwrite only at strong confidence
//! - **Normalizers**: kind-keyed registry with per-path overrides
//! - **Selects**: option matching with a synonym dictionary
//! - **Marks**: confirmed/caution tiers and registration number review

pub mod hydrator;
pub mod marks;
pub mod normalize;
pub mod policy;
pub mod synonyms;

pub use hydrator::Hydrator;
pub use marks::{confidence_mark, NOTE_CAUTION, NOTE_CONFIRMED, NOTE_REG_NO_REVIEW};
pub use normalize::{FieldNormalizer, NormalizerRegistry, PathMatch, SelectResolver};
pub use policy::{decide, FillDecision};
pub use synonyms::SynonymDictionary;
