//! Graph mutation façade
//!
//! Operations are grouped by the element or edge family they act on. Each
//! one validates its parameters, snapshots the caller's attribution and
//! forwards to the metadata store, mapping store errors onto
//! [`LineageError`].
//!
//! Operations that refer to existing elements take an `effective_time`;
//! `None` means "at any time".

mod assets;
mod classifications;
mod flows;
mod ports;
mod processes;
mod schemas;

use crate::context::{CallAttribution, LineageIntegratorContext};
use crate::error::{LineageError, LineageResult};
use crate::graph::{
    ElementId, ElementKind, ElementProperties, HasEffectiveWindow, HasQualifiedName,
    LineageElement, LineageRelationship, Paging, RelatedElement, RelationshipEnd, RelationshipId,
    RelationshipKind, RelationshipProperties,
};
use crate::store::{MetadataStore, NewElement, NewElementFromTemplate, NewRelationship, StoreResult};
use chrono::{DateTime, Utc};

pub(crate) fn require_text(value: &str, parameter: &str) -> LineageResult<()> {
    if value.trim().is_empty() {
        return Err(LineageError::invalid(parameter, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_guid(guid: &ElementId, parameter: &str) -> LineageResult<()> {
    require_text(guid.as_str(), parameter)
}

pub(crate) fn require_relationship_guid(guid: &RelationshipId, parameter: &str) -> LineageResult<()> {
    require_text(guid.as_str(), parameter)
}

pub(crate) fn require_qualified_name(properties: &dyn HasQualifiedName) -> LineageResult<()> {
    match properties.qualified_name() {
        Some(name) => require_text(name, "qualified_name"),
        None => Err(LineageError::invalid("qualified_name", "must be supplied")),
    }
}

pub(crate) fn require_valid_window(properties: &dyn HasEffectiveWindow) -> LineageResult<()> {
    if !properties.effective_window().is_valid() {
        return Err(LineageError::invalid("effective_to", "must be later than effective_from"));
    }
    Ok(())
}

impl LineageIntegratorContext {
    /// Run a store update under the caller's attribution.
    fn mutate<T>(
        &self,
        operation: &'static str,
        effective_time: Option<DateTime<Utc>>,
        action: impl FnOnce(&dyn MetadataStore, &CallAttribution) -> StoreResult<T>,
    ) -> LineageResult<T> {
        self.check_write_permitted(operation)?;
        let call = self.attribution(effective_time);
        action(self.store(), &call).map_err(|e| {
            tracing::debug!(operation, error = %e, "Metadata store rejected update");
            LineageError::from(e)
        })
    }

    fn read<T>(
        &self,
        effective_time: Option<DateTime<Utc>>,
        action: impl FnOnce(&dyn MetadataStore, &CallAttribution) -> StoreResult<T>,
    ) -> LineageResult<T> {
        let call = self.attribution(effective_time);
        Ok(action(self.store(), &call)?)
    }

    /// When the caller names an external identifier it must be bound to
    /// `guid` for the calling source.
    fn check_external_identifier(
        store: &dyn MetadataStore,
        call: &CallAttribution,
        kind: ElementKind,
        guid: &ElementId,
        external_identifier: Option<&str>,
    ) -> StoreResult<()> {
        let Some(identifier) = external_identifier else {
            return Ok(());
        };
        match store.resolve_external_identifier(call, kind, identifier)? {
            Some(bound) if &bound == guid => Ok(()),
            _ => Err(crate::store::StoreError::invalid(
                "external_identifier",
                format!("'{}' is not bound to {} {}", identifier, kind, guid),
            )),
        }
    }

    // === Elements ===

    fn create_element_as(
        &self,
        operation: &'static str,
        mut element: NewElement,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<ElementId> {
        require_qualified_name(&element.properties)?;
        require_valid_window(&element.properties)?;
        if let Some(identifier) = &element.external_identifier {
            require_text(&identifier.external_identifier, "external_identifier")?;
        }
        if let Some(anchor) = &element.anchor {
            require_guid(anchor, "anchor_guid")?;
        }
        if element.properties.kind().is_zoned() {
            element.zone_membership = self.config().default_zones.clone();
        }

        let guid = self.mutate(operation, effective_time, |store, call| {
            store.create_element(call, element)
        })?;
        self.record_created(guid.as_str());
        Ok(guid)
    }

    fn create_from_template_as(
        &self,
        operation: &'static str,
        mut request: NewElementFromTemplate,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<ElementId> {
        require_guid(&request.template_guid, "template_guid")?;
        match request.overrides.qualified_name.as_deref() {
            Some(name) => require_text(name, "qualified_name")?,
            None => return Err(LineageError::invalid("qualified_name", "must be supplied")),
        }
        if request.kind.is_zoned() {
            request.zone_membership = Some(self.config().default_zones.clone());
        }

        let guid = self.mutate(operation, effective_time, |store, call| {
            store.create_element_from_template(call, request)
        })?;
        self.record_created(guid.as_str());
        Ok(guid)
    }

    fn update_element_as(
        &self,
        operation: &'static str,
        guid: &ElementId,
        external_identifier: Option<&str>,
        is_merge_update: bool,
        properties: ElementProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        let kind = properties.kind();
        require_guid(guid, kind.guid_parameter())?;
        if !is_merge_update {
            require_qualified_name(&properties)?;
        }
        require_valid_window(&properties)?;

        self.mutate(operation, effective_time, |store, call| {
            Self::check_external_identifier(store, call, kind, guid, external_identifier)?;
            store.update_element(call, kind, guid, is_merge_update, properties)
        })?;
        self.record_updated(guid.as_str());
        Ok(())
    }

    fn remove_element_as(
        &self,
        operation: &'static str,
        kind: ElementKind,
        guid: &ElementId,
        external_identifier: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(guid, kind.guid_parameter())?;
        let removed = self.mutate(operation, effective_time, |store, call| {
            Self::check_external_identifier(store, call, kind, guid, external_identifier)?;
            store.remove_element(call, kind, guid)
        })?;
        for guid in &removed {
            self.record_deleted(guid.as_str());
        }
        Ok(())
    }

    fn set_zones_as(
        &self,
        operation: &'static str,
        kind: ElementKind,
        guid: &ElementId,
        zones: Vec<String>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_guid(guid, kind.guid_parameter())?;
        self.mutate(operation, effective_time, |store, call| {
            store.set_zone_membership(call, kind, guid, zones)
        })?;
        self.record_updated(guid.as_str());
        Ok(())
    }

    fn find_as(
        &self,
        kind: ElementKind,
        search_string: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        require_text(search_string, "search_string")?;
        let paging = self.resolve_paging(paging)?;
        self.read(effective_time, |store, call| {
            store.find_elements(call, kind, search_string, paging)
        })
    }

    fn by_name_as(
        &self,
        kind: ElementKind,
        name: &str,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<LineageElement>> {
        require_text(name, "name")?;
        let paging = self.resolve_paging(paging)?;
        self.read(effective_time, |store, call| {
            store.get_elements_by_name(call, kind, name, paging)
        })
    }

    fn by_guid_as(
        &self,
        kind: ElementKind,
        guid: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<LineageElement> {
        require_guid(guid, kind.guid_parameter())?;
        self.read(effective_time, |store, call| store.get_element(call, kind, guid))
    }

    /// Look up the element bound to `external_identifier` for this
    /// context's external source.
    pub fn get_element_guid_by_external_identifier(
        &self,
        kind: ElementKind,
        external_identifier: &str,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Option<ElementId>> {
        require_text(external_identifier, "external_identifier")?;
        self.read(effective_time, |store, call| {
            store.resolve_external_identifier(call, kind, external_identifier)
        })
    }

    // === Relationships ===

    fn link(
        &self,
        operation: &'static str,
        relationship: NewRelationship,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<RelationshipId> {
        require_valid_window(&relationship.properties)?;
        let setup = self.mutate(operation, effective_time, |store, call| {
            store.setup_relationship(call, relationship)
        })?;
        if setup.created {
            self.record_created(setup.guid.as_str());
        } else {
            self.record_updated(setup.guid.as_str());
        }
        Ok(setup.guid)
    }

    fn update_link(
        &self,
        operation: &'static str,
        guid: &RelationshipId,
        is_merge_update: bool,
        properties: RelationshipProperties,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_relationship_guid(guid, "relationship_guid")?;
        require_valid_window(&properties)?;
        let kind = properties.kind();
        self.mutate(operation, effective_time, |store, call| {
            store.update_relationship(call, kind, guid, is_merge_update, properties)
        })?;
        self.record_updated(guid.as_str());
        Ok(())
    }

    fn unlink(
        &self,
        operation: &'static str,
        kind: RelationshipKind,
        end_one: &ElementId,
        end_two: &ElementId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        let removed = self.mutate(operation, effective_time, |store, call| {
            store.clear_relationship(call, kind, end_one, end_two)
        })?;
        for guid in &removed {
            self.record_deleted(guid.as_str());
        }
        Ok(())
    }

    fn unlink_by_guid(
        &self,
        operation: &'static str,
        kind: RelationshipKind,
        guid: &RelationshipId,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<()> {
        require_relationship_guid(guid, "relationship_guid")?;
        self.mutate(operation, effective_time, |store, call| {
            store.clear_relationship_by_guid(call, kind, guid)
        })?;
        self.record_deleted(guid.as_str());
        Ok(())
    }

    /// The relationship of `kind` between two elements whose qualifier is
    /// `qualified_name`, or the first one when no name is given.
    fn find_link(
        &self,
        kind: RelationshipKind,
        end_one: &ElementId,
        end_two: &ElementId,
        qualified_name: Option<&str>,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Option<LineageRelationship>> {
        let relationships = self.read(effective_time, |store, call| {
            store.get_relationships(call, kind, end_one, end_two)
        })?;
        Ok(relationships.into_iter().find(|rel| {
            qualified_name.is_none() || rel.properties.qualifier() == qualified_name
        }))
    }

    fn related(
        &self,
        kind: RelationshipKind,
        from: &ElementId,
        start: RelationshipEnd,
        paging: Paging,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Vec<RelatedElement>> {
        let paging = self.resolve_paging(paging)?;
        self.read(effective_time, |store, call| {
            store.get_related_elements(call, kind, from, start, paging)
        })
    }

    /// For kinds where an element has at most one partner on the far end
    fn single_related(
        &self,
        kind: RelationshipKind,
        from: &ElementId,
        start: RelationshipEnd,
        effective_time: Option<DateTime<Utc>>,
    ) -> LineageResult<Option<RelatedElement>> {
        Ok(self
            .related(kind, from, start, Paging::first(1), effective_time)?
            .into_iter()
            .next())
    }
}
