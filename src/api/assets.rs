//! Assets and the relationships between them

use super::{require_guid, require_text};
use crate::context::LineageIntegratorContext;
use crate::error::{LineageError, LineageResult};
use crate::graph::{
    AssetProperties, AssetRelationshipProperties, ElementId, ElementKind,
    ExternalIdentifierProperties, LineageElement, Paging, RelatedElement, RelationshipEnd,
    RelationshipId, RelationshipKind, RelationshipProperties, TemplateProperties,
};
use crate::store::{NewElement, NewElementFromTemplate, NewRelationship};
use chrono::{DateTime, Utc};

impl LineageIntegratorContext {
    /// Create an asset. New assets start in the configured default zones.
    pub fn create_asset(
        &self,
        asset_manager_is_home: bool,
        external_identifier: Option<ExternalIdentifierProperties>,
        properties: AssetProperties,
    ) -> LineageResult<ElementId> {
        let element = NewElement::new(properties, asset_manager_is_home)
            .with_external_identifier(external_identifier);
        self.create_element_as("create_asset", element, None)
    }

    pub fn create_asset_from_template(
        &self,
        asset_manager_is_home: bool,
        template_guid: &ElementId,
        external_identifier: Option<ExternalIdentifierProperties>,
        template: TemplateProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<ElementId> {
        let request = NewElementFromTemplate {
            kind: ElementKind::Asset,
            template_guid: template_guid.clone(),
            overrides: template,
            is_home: asset_manager_is_home,
            anchor: None,
            external_identifier,
            zone_membership: None,
        };
        self.create_from_template_as("create_asset_from_template", request, effective_time)
    }

    pub fn update_asset(
        &self,
        asset_guid: &ElementId,
        external_identifier: Option<&str>,
        is_merge_update: bool,
        properties: AssetProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.update_element_as(
            "update_asset",
            asset_guid,
            external_identifier,
            is_merge_update,
            properties.into(),
            effective_time,
        )
    }

    /// Move the asset into the configured publish zones
    pub fn publish_asset(
        &self,
        asset_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        let zones = self.config().publish_zones.clone();
        self.set_zones_as("publish_asset", ElementKind::Asset, asset_guid, zones, effective_time)
    }

    /// Move the asset back into the configured default zones
    pub fn withdraw_asset(
        &self,
        asset_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        let zones = self.config().default_zones.clone();
        self.set_zones_as("withdraw_asset", ElementKind::Asset, asset_guid, zones, effective_time)
    }

    pub fn remove_asset(
        &self,
        asset_guid: &ElementId,
        external_identifier: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        self.remove_element_as(
            "remove_asset",
            ElementKind::Asset,
            asset_guid,
            external_identifier,
            effective_time,
        )
    }

    /// Assets whose qualified name, display name or description fully
    /// matches the regular expression
    pub fn find_assets(
        &self,
        search_string: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.find_as(ElementKind::Asset, search_string, paging, effective_time)
    }

    pub fn get_assets_by_name(
        &self,
        name: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        self.by_name_as(ElementKind::Asset, name, paging, effective_time)
    }

    pub fn get_asset_by_guid(
        &self,
        asset_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<LineageElement> {
        self.by_guid_as(ElementKind::Asset, asset_guid, effective_time)
    }

    // === Related assets ===

    /// Link two assets with a typed relationship. The relationship type
    /// is required.
    pub fn setup_related_asset(
        &self,
        asset_manager_is_home: bool,
        from_asset_guid: &ElementId,
        to_asset_guid: &ElementId,
        properties: AssetRelationshipProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_guid(from_asset_guid, "from_asset_guid")?;
        require_guid(to_asset_guid, "to_asset_guid")?;
        match properties.relationship_type.as_deref() {
            Some(type_name) => require_text(type_name, "relationship_type")?,
            None => return Err(LineageError::invalid("relationship_type", "must be supplied")),
        }
        let relationship = NewRelationship::new(
            from_asset_guid,
            to_asset_guid,
            RelationshipProperties::AssetRelationship(properties),
            asset_manager_is_home,
        );
        self.link("setup_related_asset", relationship, effective_time)
    }

    /// Remove the relationships of the given type between two assets
    pub fn clear_related_asset(
        &self,
        relationship_type: &str,
        from_asset_guid: &ElementId,
        to_asset_guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_text(relationship_type, "relationship_type")?;
        require_guid(from_asset_guid, "from_asset_guid")?;
        require_guid(to_asset_guid, "to_asset_guid")?;
        self.check_write_permitted("clear_related_asset")?;
        let Some(relationship) = self.find_link(
            RelationshipKind::AssetRelationship,
            from_asset_guid,
            to_asset_guid,
            Some(relationship_type),
            effective_time,
        )?
        else {
            return Ok(());
        };
        self.unlink_by_guid(
            "clear_related_asset",
            RelationshipKind::AssetRelationship,
            &relationship.guid,
            effective_time,
        )
    }

    /// Assets linked from this one, optionally only through one
    /// relationship type
    pub fn get_related_assets(
        &self,
        asset_guid: &ElementId,
        relationship_type: Option<&str>,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        require_guid(asset_guid, "asset_guid")?;
        let paging = self.resolve_paging(paging)?;
        let related = self.related(
            RelationshipKind::AssetRelationship,
            asset_guid,
            RelationshipEnd::One,
            Paging::default(),
            effective_time,
        )?;
        let matching: Vec<RelatedElement> = related
            .into_iter()
            .filter(|r| {
                relationship_type.is_none()
                    || r.relationship.properties.qualifier() == relationship_type
            })
            .collect();
        Ok(paging.apply(matching))
    }
}
