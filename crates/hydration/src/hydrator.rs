//! Hydration: writing an entity record into form fields

use loan_autofill_config::{FillPolicy, HydrationConfig};
use loan_autofill_core::{EntityRecord, FieldKind, FormField};

use crate::marks::apply_marks;
use crate::normalize::{NormalizerRegistry, SelectResolver};
use crate::policy::decide;
use crate::synonyms::SynonymDictionary;

/// Applies entity records to form fields under a [`FillPolicy`]
#[derive(Debug, Clone)]
pub struct Hydrator {
    policy: FillPolicy,
    normalizers: NormalizerRegistry,
    selects: SelectResolver,
}

impl Default for Hydrator {
    fn default() -> Self {
        Self::new(FillPolicy::default())
    }
}

impl Hydrator {
    /// Hydrator with the loan application normalizers and synonyms
    pub fn new(policy: FillPolicy) -> Self {
        Self {
            policy,
            normalizers: NormalizerRegistry::loan_application(),
            selects: SelectResolver::new(SynonymDictionary::loan_application()),
        }
    }

    pub fn from_config(config: &HydrationConfig) -> Self {
        Self::new(config.policy.clone())
    }

    pub fn with_normalizers(mut self, normalizers: NormalizerRegistry) -> Self {
        self.normalizers = normalizers;
        self
    }

    pub fn with_synonyms(mut self, synonyms: SynonymDictionary) -> Self {
        self.selects = SelectResolver::new(synonyms);
        self
    }

    pub fn policy(&self) -> &FillPolicy {
        &self.policy
    }

    /// Fill every eligible field; returns how many were written
    pub fn hydrate(&self, record: &EntityRecord, fields: &mut [FormField]) -> usize {
        let mut filled = 0;
        for field in fields.iter_mut() {
            if self.hydrate_field(record, field) {
                filled += 1;
            }
        }

        tracing::debug!(fields = fields.len(), filled, "Hydration pass complete");
        filled
    }

    /// Fill a single field; returns whether it was written
    pub fn hydrate_field(&self, record: &EntityRecord, field: &mut FormField) -> bool {
        let candidate = record.value_at(&field.path);
        let confidence = record.confidence(&field.path);

        let decision = decide(&self.policy, field, candidate.as_deref(), confidence);
        let Some(value) = candidate.filter(|_| decision.should_fill()) else {
            tracing::debug!(path = %field.path, ?decision, "Field not filled");
            return false;
        };

        let next = match &field.kind {
            FieldKind::Select { options } => {
                match self.selects.resolve(&field.path, &value, options) {
                    Some(option) => option,
                    None => {
                        tracing::debug!(path = %field.path, "No select option for value");
                        return false;
                    }
                }
            }
            kind => self.normalizers.normalize(&field.path, &value, kind),
        };

        field.assign(next);
        apply_marks(&self.policy, field, confidence);
        true
    }
}
