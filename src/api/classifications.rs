//! Classification toggles
//!
//! Any element kind the classification applies to may carry it. Setting a
//! classification that is already present replaces its properties.

use super::require_guid;
use crate::context::LineageIntegratorContext;
use crate::error::LineageResult;
use crate::graph::{Classification, ClassificationKind, ElementId, KeyPattern};
use chrono::{DateTime, Utc};

impl LineageIntegratorContext {
    fn classify(
        &self,
        operation: &'static str,
        element_guid: &ElementId,
        classification: Classification,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(element_guid, "element_guid")?;
        self.mutate(operation, effective_time, |store, call| {
            store.set_classification(call, element_guid, classification)
        })?;
        self.record_updated(element_guid.as_str());
        Ok(())
    }

    fn declassify(
        &self,
        operation: &'static str,
        element_guid: &ElementId,
        kind: ClassificationKind,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(element_guid, "element_guid")?;
        self.mutate(operation, effective_time, |store, call| {
            store.clear_classification(call, element_guid, kind)
        })?;
        self.record_updated(element_guid.as_str());
        Ok(())
    }

    pub fn set_reference_data(
        &self,
        element_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.classify(
            "set_reference_data",
            element_guid,
            Classification::ReferenceData,
            effective_time,
        )
    }

    pub fn clear_reference_data(
        &self,
        element_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.declassify(
            "clear_reference_data",
            element_guid,
            ClassificationKind::ReferenceData,
            effective_time,
        )
    }

    pub fn set_business_significant(
        &self,
        element_guid: &ElementId,
        description: Option<String>,
        scope: Option<String>,
        business_capability_guid: Option<String>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.classify(
            "set_business_significant",
            element_guid,
            Classification::BusinessSignificant {
                description,
                scope,
                business_capability_guid,
            },
            effective_time,
        )
    }

    pub fn clear_business_significant(
        &self,
        element_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.declassify(
            "clear_business_significant",
            element_guid,
            ClassificationKind::BusinessSignificant,
            effective_time,
        )
    }

    /// Mark a schema attribute as derived by `formula`
    pub fn set_calculated_value(
        &self,
        schema_attribute_guid: &ElementId,
        formula: Option<String>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.classify(
            "set_calculated_value",
            schema_attribute_guid,
            Classification::CalculatedValue { formula },
            effective_time,
        )
    }

    pub fn clear_calculated_value(
        &self,
        schema_attribute_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.declassify(
            "clear_calculated_value",
            schema_attribute_guid,
            ClassificationKind::CalculatedValue,
            effective_time,
        )
    }

    pub fn set_primary_key(
        &self,
        schema_attribute_guid: &ElementId,
        name: Option<String>,
        key_pattern: KeyPattern,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.classify(
            "set_primary_key",
            schema_attribute_guid,
            Classification::PrimaryKey { name, key_pattern },
            effective_time,
        )
    }

    pub fn clear_primary_key(
        &self,
        schema_attribute_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.declassify(
            "clear_primary_key",
            schema_attribute_guid,
            ClassificationKind::PrimaryKey,
            effective_time,
        )
    }

    /// Soft-delete an element. Archived elements stay in the store and
    /// remain visible while `for_lineage` is on.
    pub fn archive_element(
        &self,
        element_guid: &ElementId,
        archive_process: Option<String>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        let classification = Classification::Memento {
            archive_date: Utc::now(),
            archive_user: self.user_id().to_string(),
            archive_process,
        };
        self.classify("archive_element", element_guid, classification, effective_time)
    }

    /// Undo [`archive_element`](Self::archive_element)
    pub fn restore_element(
        &self,
        element_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.declassify(
            "restore_element",
            element_guid,
            ClassificationKind::Memento,
            effective_time,
        )
    }

    /// Flag a process or asset whose description is known to be partial
    pub fn set_incomplete(
        &self,
        element_guid: &ElementId,
        notes: Option<String>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.classify(
            "set_incomplete",
            element_guid,
            Classification::Incomplete { notes },
            effective_time,
        )
    }

    pub fn clear_incomplete(
        &self,
        element_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.declassify(
            "clear_incomplete",
            element_guid,
            ClassificationKind::Incomplete,
            effective_time,
        )
    }
}
