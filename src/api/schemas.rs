//! Schema types and schema attributes

use super::require_guid;
use crate::context::LineageIntegratorContext;
use crate::error::LineageResult;
use crate::graph::{
    EffectiveWindow, ElementId, ElementKind, ExternalIdentifierProperties, LineageElement, Paging,
    RelatedElement, RelationshipEnd, RelationshipId, RelationshipKind, RelationshipProperties,
    SchemaAttributeProperties, SchemaTypeProperties, TemplateProperties,
};
use crate::store::{NewElement, NewElementFromTemplate, NewRelationship};
use chrono::{DateTime, Utc};

impl LineageIntegratorContext {
    /// Create a schema type, optionally anchored to the element it
    /// describes
    pub fn create_schema_type(
        &self,
        asset_manager_is_home: bool,
        anchor_guid: Option<&ElementId>,
        external_identifier: Option<ExternalIdentifierProperties>,
        properties: SchemaTypeProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<ElementId> {
        let mut element = NewElement::new(properties, asset_manager_is_home)
            .with_external_identifier(external_identifier);
        if let Some(anchor) = anchor_guid {
            element = element.with_anchor(anchor.clone());
        }
        self.create_element_as("create_schema_type", element, effective_time)
    }

    pub fn create_schema_type_from_template(
        &self,
        asset_manager_is_home: bool,
        template_guid: &ElementId,
        anchor_guid: Option<&ElementId>,
        external_identifier: Option<ExternalIdentifierProperties>,
        template: TemplateProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<ElementId> {
        let request = NewElementFromTemplate {
            kind: ElementKind::SchemaType,
            template_guid: template_guid.clone(),
            overrides: template,
            is_home: asset_manager_is_home,
            anchor: anchor_guid.cloned(),
            external_identifier,
            zone_membership: None,
        };
        self.create_from_template_as("create_schema_type_from_template", request, effective_time)
    }

    pub fn update_schema_type(
        &self,
        schema_type_guid: &ElementId,
        external_identifier: Option<&str>,
        is_merge_update: bool,
        properties: SchemaTypeProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.update_element_as(
            "update_schema_type",
            schema_type_guid,
            external_identifier,
            is_merge_update,
            properties.into(),
            effective_time,
        )
    }

    /// Remove a schema type together with the attributes anchored to it
    pub fn remove_schema_type(
        &self,
        schema_type_guid: &ElementId,
        external_identifier: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.remove_element_as(
            "remove_schema_type",
            ElementKind::SchemaType,
            schema_type_guid,
            external_identifier,
            effective_time,
        )
    }

    pub fn find_schema_types(
        &self,
        search_string: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.find_as(ElementKind::SchemaType, search_string, paging, effective_time)
    }

    pub fn get_schema_types_by_name(
        &self,
        name: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.by_name_as(ElementKind::SchemaType, name, paging, effective_time)
    }

    pub fn get_schema_type_by_guid(
        &self,
        schema_type_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<LineageElement> {
        self.by_guid_as(ElementKind::SchemaType, schema_type_guid, effective_time)
    }

    /// Attach a schema type to the element (asset, port, ...) it describes
    pub fn setup_schema_type_parent(
        &self,
        asset_manager_is_home: bool,
        schema_type_guid: &ElementId,
        parent_element_guid: &ElementId,
        effective: EffectiveWindow,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_guid(schema_type_guid, "schema_type_guid")?;
        require_guid(parent_element_guid, "parent_element_guid")?;
        let relationship = NewRelationship::new(
            parent_element_guid,
            schema_type_guid,
            RelationshipProperties::SchemaTypeParent(effective),
            asset_manager_is_home,
        );
        self.link("setup_schema_type_parent", relationship, effective_time)
    }

    pub fn clear_schema_type_parent(
        &self,
        schema_type_guid: &ElementId,
        parent_element_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(schema_type_guid, "schema_type_guid")?;
        require_guid(parent_element_guid, "parent_element_guid")?;
        self.unlink(
            "clear_schema_type_parent",
            RelationshipKind::SchemaTypeParent,
            parent_element_guid,
            schema_type_guid,
            effective_time,
        )
    }

    /// The schema type attached to an element, if any
    pub fn get_schema_type_for_element(
        &self,
        parent_element_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Option<RelatedElement>> {
        require_guid(parent_element_guid, "parent_element_guid")?;
        self.single_related(
            RelationshipKind::SchemaTypeParent,
            parent_element_guid,
            RelationshipEnd::One,
            effective_time,
        )
    }

    /// The element a schema type is attached to, if any
    pub fn get_schema_type_parent(
        &self,
        schema_type_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Option<RelatedElement>> {
        require_guid(schema_type_guid, "schema_type_guid")?;
        self.single_related(
            RelationshipKind::SchemaTypeParent,
            schema_type_guid,
            RelationshipEnd::Two,
            effective_time,
        )
    }

    // === Schema attributes ===

    /// Create a schema attribute anchored to its parent schema type or
    /// attribute. It is removed along with the parent.
    pub fn create_schema_attribute(
        &self,
        asset_manager_is_home: bool,
        schema_element_guid: &ElementId,
        external_identifier: Option<ExternalIdentifierProperties>,
        properties: SchemaAttributeProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<ElementId> {
        require_guid(schema_element_guid, "schema_element_guid")?;
        let element = NewElement::new(properties, asset_manager_is_home)
            .with_anchor(schema_element_guid.clone())
            .with_external_identifier(external_identifier);
        self.create_element_as("create_schema_attribute", element, effective_time)
    }

    pub fn create_schema_attribute_from_template(
        &self,
        asset_manager_is_home: bool,
        schema_element_guid: &ElementId,
        template_guid: &ElementId,
        external_identifier: Option<ExternalIdentifierProperties>,
        template: TemplateProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<ElementId> {
        require_guid(schema_element_guid, "schema_element_guid")?;
        let request = NewElementFromTemplate {
            kind: ElementKind::SchemaAttribute,
            template_guid: template_guid.clone(),
            overrides: template,
            is_home: asset_manager_is_home,
            anchor: Some(schema_element_guid.clone()),
            external_identifier,
            zone_membership: None,
        };
        self.create_from_template_as("create_schema_attribute_from_template", request, effective_time)
    }

    pub fn update_schema_attribute(
        &self,
        schema_attribute_guid: &ElementId,
        external_identifier: Option<&str>,
        is_merge_update: bool,
        properties: SchemaAttributeProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.update_element_as(
            "update_schema_attribute",
            schema_attribute_guid,
            external_identifier,
            is_merge_update,
            properties.into(),
            effective_time,
        )
    }

    pub fn remove_schema_attribute(
        &self,
        schema_attribute_guid: &ElementId,
        external_identifier: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.remove_element_as(
            "remove_schema_attribute",
            ElementKind::SchemaAttribute,
            schema_attribute_guid,
            external_identifier,
            effective_time,
        )
    }

    pub fn find_schema_attributes(
        &self,
        search_string: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.find_as(ElementKind::SchemaAttribute, search_string, paging, effective_time)
    }

    pub fn get_schema_attributes_by_name(
        &self,
        name: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.by_name_as(ElementKind::SchemaAttribute, name, paging, effective_time)
    }

    pub fn get_schema_attribute_by_guid(
        &self,
        schema_attribute_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<LineageElement> {
        self.by_guid_as(ElementKind::SchemaAttribute, schema_attribute_guid, effective_time)
    }

    /// Attributes anchored directly to a schema type or attribute, in
    /// creation order
    pub fn get_nested_attributes(
        &self,
        parent_schema_element_guid: &ElementId,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        require_guid(parent_schema_element_guid, "parent_schema_element_guid")?;
        let paging = self.resolve_paging(paging)?;
        self.read(effective_time, |store, call| {
            store.get_anchored_elements(
                call,
                parent_schema_element_guid,
                ElementKind::SchemaAttribute,
                paging,
            )
        })
    }
}
